//! Generic unitarity check for dense `dim x dim` complex matrices.
//!
//! The gate library is generic over arity, so this is written once against
//! a `dim`-sized loop rather than hand-unrolled per fixed arity.

use super::{approx_cmp::approx_eq_real, types::*};

/// `matrix` is `dim * dim` entries, row-major. Checks `U U* ≈ I` within the
/// shared 1e-9 tolerance, both on the diagonal (≈1) and off-diagonal (≈0).
pub fn is_unitary(matrix: &[C], dim: N) -> bool {
    if matrix.len() != dim * dim {
        return false;
    }

    for i in 0..dim {
        for j in 0..dim {
            let mut total = C::new(0.0, 0.0);
            for k in 0..dim {
                total += matrix[i * dim + k] * matrix[j * dim + k].conj();
            }

            let expected = if i == j { 1.0 } else { 0.0 };
            if !approx_eq_real(total.re, expected) || !approx_eq_real(total.im, 0.0) {
                return false;
            }
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[inline]
    fn c(re: R, im: R) -> C {
        C::new(re, im)
    }

    #[test]
    fn identity_is_unitary() {
        let i = [c(1., 0.), c(0., 0.), c(0., 0.), c(1., 0.)];
        assert!(is_unitary(&i, 2));
    }

    #[test]
    fn hadamard_is_unitary() {
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let h = [c(s, 0.), c(s, 0.), c(s, 0.), c(-s, 0.)];
        assert!(is_unitary(&h, 2));
    }

    #[test]
    fn non_unitary_rejected() {
        let m = [c(1., 0.), c(1., 0.), c(0., 0.), c(1., 0.)];
        assert!(!is_unitary(&m, 2));
    }

    #[test]
    fn mismatched_length_rejected() {
        let m = [c(1., 0.), c(0., 0.)];
        assert!(!is_unitary(&m, 2));
    }
}
