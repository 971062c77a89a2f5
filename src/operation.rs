//! Operation: a concrete placement of a `Gate` over an ordered tuple of
//! target qubits, plus the table builder that enumerates every operation a
//! solver may select at a layer.
//!
//! Represented as a small tagged variant rather than a gate reference plus a
//! target `Vec`: it pattern-matches cleanly for the `CNOT q0->q1` formatter
//! and keeps single-qubit operations allocation-free.

use crate::{
    error::{Result, SolverError},
    gate::Gate,
    math::N,
};

/// A gate pinned to concrete target qubits.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Operation {
    Unary { gate: &'static Gate, target: N },
    Binary { gate: &'static Gate, control: N, target: N },
}

impl Operation {
    pub fn unary(gate: &'static Gate, target: N) -> Self {
        Self::Unary { gate, target }
    }

    pub fn binary(gate: &'static Gate, control: N, target: N) -> Self {
        Self::Binary { gate, control, target }
    }

    /// Builds an operation from a gate and its ordered targets, checking
    /// that the target count matches the gate's arity and that targets are
    /// unique (range-checking against a qubit count is the caller's job —
    /// see `constraints::Constraints::new`).
    pub fn new(gate: &'static Gate, targets: &[N]) -> Result<Self> {
        if targets.len() != gate.arity() {
            return Err(SolverError::InvalidTarget {
                target: -1,
                num_qubits: targets.len(),
            });
        }
        if targets.iter().collect::<std::collections::HashSet<_>>().len() != targets.len() {
            return Err(SolverError::InvalidTarget {
                target: targets.first().copied().map(|t| t as isize).unwrap_or(-1),
                num_qubits: targets.len(),
            });
        }

        match gate.arity() {
            1 => Ok(Self::unary(gate, targets[0])),
            2 => Ok(Self::binary(gate, targets[0], targets[1])),
            arity => Err(SolverError::UnsupportedArity {
                name: gate.name().to_string(),
                arity,
            }),
        }
    }

    #[inline]
    pub fn gate(&self) -> &'static Gate {
        match self {
            Operation::Unary { gate, .. } => gate,
            Operation::Binary { gate, .. } => gate,
        }
    }

    /// Ordered target qubits, as the kernel expects them.
    pub fn targets(&self) -> Vec<N> {
        match self {
            Operation::Unary { target, .. } => vec![*target],
            Operation::Binary { control, target, .. } => vec![*control, *target],
        }
    }

    /// Human-readable description, e.g. `"X q0"` or `"CNOT q0->q1"`.
    pub fn describe(&self) -> String {
        match self {
            Operation::Unary { gate, target } => format!("{} q{target}", gate.name()),
            Operation::Binary { gate, control, target } if gate.name().eq_ignore_ascii_case("CNOT") => {
                format!("{} q{control}->q{target}", gate.name())
            }
            Operation::Binary { gate, control, target } => {
                format!("{} (q{control},q{target})", gate.name())
            }
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Enumerates every concrete `(gate, target-tuple)` operation available for
/// `num_qubits` qubits, for each gate in `alphabet`, in stable order: gates
/// in alphabet order; for arity 1, targets ascending; for arity 2, ordered
/// `(control, target)` pairs with control outer, target inner.
pub fn build_table(alphabet: &[&'static Gate], num_qubits: N) -> Result<Vec<Operation>> {
    let mut operations = Vec::new();

    for &gate in alphabet {
        match gate.arity() {
            1 => {
                for target in 0..num_qubits {
                    operations.push(Operation::unary(gate, target));
                }
            }
            2 => {
                for control in 0..num_qubits {
                    for target in 0..num_qubits {
                        if control == target {
                            continue;
                        }
                        operations.push(Operation::binary(gate, control, target));
                    }
                }
            }
            arity => {
                return Err(SolverError::UnsupportedArity {
                    name: gate.name().to_string(),
                    arity,
                })
            }
        }
    }

    Ok(operations)
}
