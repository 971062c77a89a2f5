//! Error handling logic
//!
//! Every structural failure the solver can report lives in one enum. Each
//! variant carries the structured fields that caused it rather than a
//! free-form message, so callers can match on the cause instead of parsing
//! text.

use std::fmt;

use crate::math::N;

/// Errors surfaced by gate construction, operation building, state
/// construction, constraint validation and solving. Search exhaustion is
/// *not* one of these — it is a successful call with `success: false`.
#[derive(Clone, Debug, PartialEq)]
pub enum SolverError {
    /// A gate's matrix is non-square, of the wrong dimension for its arity,
    /// or not unitary within tolerance.
    InvalidGate { name: String, reason: &'static str },

    /// `allowed_gates` (or an allowlist) named a gate absent from the
    /// library.
    UnsupportedGate { name: String },

    /// The operation table builder encountered a gate of arity > 2.
    UnsupportedArity { name: String, arity: N },

    /// A target qubit is out of `[0, n)`, or an operation's targets repeat
    /// an index.
    InvalidTarget { target: isize, num_qubits: N },

    /// An amplitude vector's length isn't `2^n`, or disagrees with an
    /// expected qubit count.
    DimensionMismatch { len: usize, expected_qubits: N },

    /// Normalization was requested on a (numerically) null vector.
    ZeroVector,

    /// Two states, or a state and a solver, disagree on qubit count.
    QubitMismatch { lhs: N, rhs: N },

    /// A fixed operation at a layer names a gate absent from that layer's
    /// allowlist.
    ConstraintConflict { layer: N, gate: String },

    /// A fixed operation or allowlist references a layer ≥ `max_layers`.
    OutOfRangeLayer { layer: N, max_layers: N },
}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverError::InvalidGate { name, reason } => {
                write!(f, "gate '{name}' is invalid: {reason}")
            }
            SolverError::UnsupportedGate { name } => {
                write!(f, "gate '{name}' is not in the solver's alphabet")
            }
            SolverError::UnsupportedArity { name, arity } => {
                write!(f, "gate '{name}' has unsupported arity {arity}")
            }
            SolverError::InvalidTarget { target, num_qubits } => {
                write!(f, "target qubit {target} is invalid for {num_qubits} qubits")
            }
            SolverError::DimensionMismatch { len, expected_qubits } => write!(
                f,
                "amplitude vector of length {len} is not consistent with {expected_qubits} qubits"
            ),
            SolverError::ZeroVector => write!(f, "cannot normalize the zero vector"),
            SolverError::QubitMismatch { lhs, rhs } => {
                write!(f, "qubit count mismatch: {lhs} vs {rhs}")
            }
            SolverError::ConstraintConflict { layer, gate } => write!(
                f,
                "fixed operation at layer {layer} uses gate '{gate}' which is not in that layer's allowlist"
            ),
            SolverError::OutOfRangeLayer { layer, max_layers } => write!(
                f,
                "constraint references layer {layer}, but max_layers is {max_layers}"
            ),
        }
    }
}

impl std::error::Error for SolverError {}

pub type Result<T> = std::result::Result<T, SolverError>;
