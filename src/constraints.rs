//! Constraint resolver: for each layer depth, decides the admissible
//! operation set, combining fixed pins, per-layer allowlists, a default
//! allowlist and the global operation table.
//!
//! Per the Design Notes, the search loop never branches on these rules
//! directly — `admissible()` is called once per depth to build a read-only
//! table ahead of the search (see `search::solve`), keeping the hot path
//! free of map lookups beyond one per depth.

use std::collections::HashMap;

use crate::{
    error::{Result, SolverError},
    gate::Gate,
    math::N,
    operation::Operation,
};

#[derive(Clone, Debug, Default)]
pub struct Constraints {
    fixed_operations: HashMap<N, Operation>,
    layer_gate_allowlists: HashMap<N, Vec<String>>,
    default_layer_gate_allowlist: Option<Vec<String>>,
}

fn dedup_order(names: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    names.iter().filter(|n| seen.insert((*n).clone())).cloned().collect()
}

fn filter_by_allowlist(table: &[Operation], allowlist: &[String]) -> Vec<Operation> {
    let mut result = Vec::new();
    for name in dedup_order(allowlist) {
        result.extend(table.iter().filter(|op| op.gate().name() == name).copied());
    }
    result
}

impl Constraints {
    /// Validates and builds the resolver. Checks, in order:
    /// - every fixed operation's targets are valid for `num_qubits`;
    /// - every allowlist (per-layer and default) is non-empty and names
    ///   only gates present in `alphabet`;
    /// - a fixed operation sharing a layer with a per-layer allowlist has a
    ///   gate that is a member of that allowlist.
    pub fn new(
        fixed_operations: HashMap<N, Operation>,
        layer_gate_allowlists: HashMap<N, Vec<String>>,
        default_layer_gate_allowlist: Option<Vec<String>>,
        num_qubits: N,
        alphabet: &[&'static Gate],
    ) -> Result<Self> {
        for op in fixed_operations.values() {
            for target in op.targets() {
                if target >= num_qubits {
                    return Err(SolverError::InvalidTarget {
                        target: target as isize,
                        num_qubits,
                    });
                }
            }
        }

        let alphabet_names: std::collections::HashSet<&str> =
            alphabet.iter().map(|g| g.name()).collect();

        let check_allowlist = |layer: N, names: &[String]| -> Result<()> {
            if names.is_empty() {
                return Err(SolverError::ConstraintConflict {
                    layer,
                    gate: "<empty allowlist>".to_string(),
                });
            }
            for name in names {
                if !alphabet_names.contains(name.as_str()) {
                    return Err(SolverError::UnsupportedGate { name: name.clone() });
                }
            }
            Ok(())
        };

        for (&layer, names) in &layer_gate_allowlists {
            check_allowlist(layer, names)?;
        }
        if let Some(names) = &default_layer_gate_allowlist {
            check_allowlist(N::MAX, names)?;
        }

        for (&layer, op) in &fixed_operations {
            if let Some(allowlist) = layer_gate_allowlists.get(&layer) {
                if !allowlist.iter().any(|n| n == op.gate().name()) {
                    return Err(SolverError::ConstraintConflict {
                        layer,
                        gate: op.gate().name().to_string(),
                    });
                }
            }
        }

        Ok(Self {
            fixed_operations,
            layer_gate_allowlists,
            default_layer_gate_allowlist,
        })
    }

    /// Fails with `OutOfRangeLayer` if any constraint references a layer at
    /// or beyond `max_layers`.
    pub fn check_within(&self, max_layers: N) -> Result<()> {
        for &layer in self.fixed_operations.keys() {
            if layer >= max_layers {
                return Err(SolverError::OutOfRangeLayer { layer, max_layers });
            }
        }
        for &layer in self.layer_gate_allowlists.keys() {
            if layer >= max_layers {
                return Err(SolverError::OutOfRangeLayer { layer, max_layers });
            }
        }
        Ok(())
    }

    /// The admissible operation set at depth `d`: a fixed operation (if
    /// any) takes priority, then a per-layer allowlist, then the default
    /// allowlist, then the full table.
    pub fn admissible(&self, layer: N, table: &[Operation]) -> Vec<Operation> {
        if let Some(op) = self.fixed_operations.get(&layer) {
            return vec![*op];
        }
        if let Some(allow) = self.layer_gate_allowlists.get(&layer) {
            return filter_by_allowlist(table, allow);
        }
        if let Some(allow) = &self.default_layer_gate_allowlist {
            return filter_by_allowlist(table, allow);
        }
        table.to_vec()
    }

    /// The greatest fixed-layer index, if any.
    pub fn max_fixed_layer(&self) -> Option<N> {
        self.fixed_operations.keys().copied().max()
    }

    pub fn has_fixed_layers(&self) -> bool {
        !self.fixed_operations.is_empty()
    }

    /// The operation to use when padding layer `d` to reach `max_layers`:
    /// fixed operation, then per-layer allowlist's `I`, then default
    /// allowlist's `I`, then the table's `I`. `None` means padding stops
    /// here.
    pub fn identity_for(&self, layer: N, table: &[Operation]) -> Option<Operation> {
        if let Some(op) = self.fixed_operations.get(&layer) {
            return Some(*op);
        }
        self.admissible(layer, table)
            .into_iter()
            .find(|op| op.gate().name() == "I")
    }
}
