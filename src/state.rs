//! State wrapper: an amplitude vector plus its qubit count, with
//! construction (optionally renormalizing), L2 distance and probability
//! projection.

use crate::{
    error::{Result, SolverError},
    kernel,
    math::{C, N, R},
    operation::Operation,
};

/// An immutable `n`-qubit pure state.
#[derive(Clone, Debug, PartialEq)]
pub struct State {
    amplitudes: Vec<C>,
    num_qubits: N,
}

fn qubits_for_len(len: usize) -> Result<N> {
    if len == 0 || !len.is_power_of_two() {
        return Err(SolverError::DimensionMismatch {
            len,
            expected_qubits: 0,
        });
    }
    Ok(len.trailing_zeros() as N)
}

impl State {
    /// Builds a state from an amplitude vector. `len` must be a nonzero
    /// power of two. If `normalize` is set, divides by `sqrt(sum |a_i|^2)`;
    /// fails with `ZeroVector` if that sum is ~0.
    pub fn new(amplitudes: Vec<C>, normalize: bool) -> Result<Self> {
        let num_qubits = qubits_for_len(amplitudes.len())?;

        let amplitudes = if normalize {
            let norm_sq: R = amplitudes.iter().map(C::norm_sqr).sum();
            if norm_sq < 1e-12 {
                return Err(SolverError::ZeroVector);
            }
            let scale = norm_sq.sqrt();
            amplitudes.into_iter().map(|a| a / scale).collect()
        } else {
            amplitudes
        };

        Ok(Self { amplitudes, num_qubits })
    }

    /// Builds a state from `(real, imag)` pairs, one per amplitude.
    pub fn from_real_imag_pairs(pairs: &[(R, R)], normalize: bool) -> Result<Self> {
        let amplitudes = pairs.iter().map(|&(re, im)| C::new(re, im)).collect();
        Self::new(amplitudes, normalize)
    }

    #[inline]
    pub fn num_qubits(&self) -> N {
        self.num_qubits
    }

    #[inline]
    pub fn amplitudes(&self) -> &[C] {
        &self.amplitudes
    }

    /// L2 norm of the componentwise complex difference.
    pub fn distance(&self, other: &State) -> Result<R> {
        if self.num_qubits != other.num_qubits {
            return Err(SolverError::QubitMismatch {
                lhs: self.num_qubits,
                rhs: other.num_qubits,
            });
        }

        let sum_sq: R = self
            .amplitudes
            .iter()
            .zip(&other.amplitudes)
            .map(|(a, b)| (a - b).norm_sqr())
            .sum();
        Ok(sum_sq.sqrt())
    }

    /// `|a_i|^2` for each basis state.
    pub fn probabilities(&self) -> Vec<R> {
        self.amplitudes.iter().map(C::norm_sqr).collect()
    }

    /// Applies an operation, returning a new (renormalized) state.
    pub fn apply(&self, op: &Operation) -> Result<State> {
        let targets = op.targets();
        let new_amplitudes = kernel::apply(&self.amplitudes, op.gate().matrix(), &targets, self.num_qubits)?;
        State::new(new_amplitudes, true)
    }
}
