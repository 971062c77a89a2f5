//! Public façade: ties the gate library, operation table, constraint
//! resolver and search engine together behind one external interface.

use std::collections::HashMap;

use crate::{
    constraints::Constraints,
    error::{Result, SolverError},
    gate::{self, Gate},
    math::{N, R},
    operation::{self, Operation},
    search::{self, SearchResult},
    state::State,
};

/// A fixed operation to pin at a given layer: a gate name plus its ordered
/// target qubits.
#[derive(Clone, Debug)]
pub struct FixedOperation {
    pub gate: String,
    pub targets: Vec<N>,
}

/// Construction-time configuration. All fields besides `allowed_gates`
/// have sensible defaults (see `Default` below).
#[derive(Clone, Debug)]
pub struct SolverConfig {
    pub allowed_gates: Option<Vec<String>>,
    pub tolerance: R,
    pub quantization_decimals: u32,
    pub fixed_operations: HashMap<N, FixedOperation>,
    pub layer_gate_allowlists: HashMap<N, Vec<String>>,
    pub default_layer_gate_allowlist: Option<Vec<String>>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            allowed_gates: None,
            tolerance: 1e-6,
            quantization_decimals: 8,
            fixed_operations: HashMap::new(),
            layer_gate_allowlists: HashMap::new(),
            default_layer_gate_allowlist: None,
        }
    }
}

/// An immutable solver instance: a gate alphabet, operation table and
/// resolved layer constraints for a fixed qubit count.
pub struct Solver {
    num_qubits: N,
    tolerance: R,
    quantization_decimals: u32,
    table: Vec<Operation>,
    constraints: Constraints,
}

fn resolve_alphabet(names: &Option<Vec<String>>) -> Result<Vec<&'static Gate>> {
    match names {
        None => Ok(gate::all_names().into_iter().map(|n| gate::lookup(n).unwrap()).collect()),
        Some(names) => names
            .iter()
            .map(|name| gate::lookup(name).ok_or_else(|| SolverError::UnsupportedGate { name: name.clone() }))
            .collect(),
    }
}

fn resolve_fixed_operations(
    fixed: &HashMap<N, FixedOperation>,
    alphabet_names: &std::collections::HashSet<&str>,
) -> Result<HashMap<N, Operation>> {
    let mut out = HashMap::with_capacity(fixed.len());
    for (&layer, fixed_op) in fixed {
        if !alphabet_names.contains(fixed_op.gate.as_str()) {
            return Err(SolverError::UnsupportedGate { name: fixed_op.gate.clone() });
        }
        let gate = gate::lookup(&fixed_op.gate)
            .ok_or_else(|| SolverError::UnsupportedGate { name: fixed_op.gate.clone() })?;
        out.insert(layer, Operation::new(gate, &fixed_op.targets)?);
    }
    Ok(out)
}

impl Solver {
    /// Builds a solver for `num_qubits` qubits. Validates the alphabet,
    /// builds the operation table, and validates every constraint
    /// (fixed-operation targets, allowlist membership, and fixed/allowlist
    /// conflicts at the same layer).
    pub fn new(num_qubits: N, config: SolverConfig) -> Result<Self> {
        if num_qubits == 0 {
            return Err(SolverError::DimensionMismatch { len: 0, expected_qubits: 0 });
        }

        let alphabet = resolve_alphabet(&config.allowed_gates)?;
        let alphabet_names: std::collections::HashSet<&str> =
            alphabet.iter().map(|g| g.name()).collect();

        let fixed_operations = resolve_fixed_operations(&config.fixed_operations, &alphabet_names)?;

        let table = operation::build_table(&alphabet, num_qubits)?;

        let constraints = Constraints::new(
            fixed_operations,
            config.layer_gate_allowlists,
            config.default_layer_gate_allowlist,
            num_qubits,
            &alphabet,
        )?;

        Ok(Self {
            num_qubits,
            tolerance: config.tolerance,
            quantization_decimals: config.quantization_decimals,
            table,
            constraints,
        })
    }

    #[inline]
    pub fn num_qubits(&self) -> N {
        self.num_qubits
    }

    #[inline]
    pub fn tolerance(&self) -> R {
        self.tolerance
    }

    /// The full enumerated operation table for this solver's alphabet and
    /// qubit count, in stable enumeration order.
    #[inline]
    pub fn operations(&self) -> &[Operation] {
        &self.table
    }

    /// Searches for a sequence of at most `max_layers` operations taking
    /// `start` to within `tolerance` of `target`. Exhaustion is not an
    /// error, it is `SearchResult { success: false, .. }`.
    pub fn solve(&self, start: &State, target: &State, max_layers: N) -> Result<SearchResult> {
        if start.num_qubits() != self.num_qubits || target.num_qubits() != self.num_qubits {
            return Err(SolverError::QubitMismatch {
                lhs: start.num_qubits(),
                rhs: self.num_qubits,
            });
        }

        search::solve(
            start,
            target,
            max_layers,
            &self.table,
            &self.constraints,
            self.tolerance,
            self.quantization_decimals,
        )
    }
}
