pub(in crate::math) use float_cmp::*;

use super::types::*;

/// Matches the unitarity/normalization tolerance used throughout the search engine (1e-9).
const EPSILON: R = 1e-9;

#[inline]
pub(in crate::math) fn approx_eq_real(x: R, y: R) -> bool {
    approx_eq!(R, x, y, epsilon = EPSILON)
}

#[inline]
pub(in crate::math) fn approx_eq(a: &C, b: &C) -> bool {
    approx_eq_real(a.re, b.re) && approx_eq_real(a.im, b.im)
}
