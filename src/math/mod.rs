pub use self::{consts::*, types::*};

pub mod approx_cmp;
pub mod unitary;

mod consts {
    use super::types::*;

    pub const C_ONE: C = C { re: 1., im: 0. };
    pub const C_ZERO: C = C { re: 0., im: 0. };
}

mod types {
    pub type N = usize;
    pub type R = f64;
    pub type C = num_complex::Complex<R>;
}

#[inline]
pub fn count_bits(n: N) -> N {
    n.count_ones() as N
}
