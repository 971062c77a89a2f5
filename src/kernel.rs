//! State-vector kernel: applies a `k`-qubit unitary at specified target
//! qubit positions to a `2^n`-length complex amplitude vector.
//!
//! Index convention (bit-exact): basis index `i` encodes qubit
//! `q` at bit position `q`. For a `k`-qubit gate with targets
//! `(t0, ..., t_{k-1})`, sub-vector index `pattern` maps into the full
//! index by OR-ing `1 << t_j` whenever bit `(k-1-j)` of `pattern` is set —
//! this reverses target order relative to `pattern`'s bit order, so that
//! for `CNOT` with targets `(control, target)` the control lands on
//! `pattern`'s high bit, matching the 4x4 literal in `gate::build_library`.

use crate::{
    error::{Result, SolverError},
    math::{C, N},
};

#[cfg(feature = "cpu")]
use rayon::prelude::*;

/// Maps a `k`-bit `pattern` into the full state index relative to `base`,
/// under the reversed-target convention described above.
#[inline]
fn spread(base: N, pattern: N, targets: &[N]) -> N {
    let k = targets.len();
    let mut idx = base;
    for (offset, &t) in targets.iter().rev().enumerate() {
        if (pattern >> offset) & 1 != 0 {
            idx |= 1 << t;
        }
    }
    idx
}

fn validate(state: &[C], matrix: &[C], targets: &[N], n: N) -> Result<(usize, usize)> {
    if state.len() != 1usize << n {
        return Err(SolverError::DimensionMismatch {
            len: state.len(),
            expected_qubits: n,
        });
    }

    let k = targets.len();
    let dim = 1usize << k;
    if matrix.len() != dim * dim {
        return Err(SolverError::DimensionMismatch {
            len: matrix.len(),
            expected_qubits: k,
        });
    }

    for &t in targets {
        if t >= n {
            return Err(SolverError::InvalidTarget {
                target: t as isize,
                num_qubits: n,
            });
        }
    }

    let mut seen = 0usize;
    for &t in targets {
        let bit = 1usize << t;
        if seen & bit != 0 {
            return Err(SolverError::InvalidTarget {
                target: t as isize,
                num_qubits: n,
            });
        }
        seen |= bit;
    }

    Ok((dim, seen))
}

/// Applies a `dim x dim` (`dim = 2^targets.len()`) unitary `matrix`
/// (row-major) to `state`, a `2^n`-length vector, acting on `targets`, and
/// returns the resulting `2^n`-length vector.
pub fn apply(state: &[C], matrix: &[C], targets: &[N], n: N) -> Result<Vec<C>> {
    let (dim, mask) = validate(state, matrix, targets, n)?;

    let complements: Vec<N> = (0..(1usize << n)).filter(|b| b & mask == 0).collect();

    let scatter = |base: N| -> Vec<(N, C)> {
        let indices: Vec<N> = (0..dim).map(|pattern| spread(base, pattern, targets)).collect();
        let vector: Vec<C> = indices.iter().map(|&idx| state[idx]).collect();

        let mut out = Vec::with_capacity(dim);
        for row in 0..dim {
            let mut total = C::new(0.0, 0.0);
            for (col, &amp) in vector.iter().enumerate() {
                total += matrix[row * dim + col] * amp;
            }
            out.push((indices[row], total));
        }
        out
    };

    let mut result = state.to_vec();

    #[cfg(feature = "cpu")]
    {
        let blocks: Vec<Vec<(N, C)>> = complements.into_par_iter().map(scatter).collect();
        for block in blocks {
            for (idx, amp) in block {
                result[idx] = amp;
            }
        }
    }

    #[cfg(not(feature = "cpu"))]
    {
        for base in complements {
            for (idx, amp) in scatter(base) {
                result[idx] = amp;
            }
        }
    }

    Ok(result)
}
