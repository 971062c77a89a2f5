//! Gate library: immutable unitary matrices keyed by symbolic name.
//!
//! This is the crate's one piece of process-wide state, held behind
//! `lazy_static` and built eagerly, since every solve depends on it.

use std::collections::HashMap;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

use crate::{
    error::{Result, SolverError},
    math::{unitary::is_unitary, C, N},
};

/// A named unitary operator of a fixed arity (qubit count it acts on).
///
/// `matrix` is `dim * dim` complex entries in row-major order, where
/// `dim = 2^arity`.
#[derive(Clone, Debug, PartialEq)]
pub struct Gate {
    name: String,
    arity: N,
    matrix: Vec<C>,
}

impl Gate {
    /// Builds and validates a gate. `matrix` must be square with
    /// `dim = 2^arity` rows/columns, row-major, and unitary within 1e-9.
    pub fn new(name: impl Into<String>, arity: N, matrix: Vec<C>) -> Result<Self> {
        let name = name.into();
        let dim = 1usize << arity;

        if matrix.len() != dim * dim {
            return Err(SolverError::InvalidGate {
                name,
                reason: "matrix dimension does not match 2^arity",
            });
        }

        if !is_unitary(&matrix, dim) {
            return Err(SolverError::InvalidGate {
                name,
                reason: "matrix is not unitary within tolerance",
            });
        }

        Ok(Self { name, arity, matrix })
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn arity(&self) -> N {
        self.arity
    }

    /// `dim = 2^arity`, the side length of `matrix()`.
    #[inline]
    pub fn dim(&self) -> N {
        1usize << self.arity
    }

    /// `dim * dim` row-major entries.
    #[inline]
    pub fn matrix(&self) -> &[C] {
        &self.matrix
    }
}

fn gate1(name: &str, m00: C, m01: C, m10: C, m11: C) -> Gate {
    Gate::new(name, 1, vec![m00, m01, m10, m11])
        .unwrap_or_else(|e| panic!("built-in gate '{name}' failed validation: {e}"))
}

fn zero() -> C {
    C::new(0.0, 0.0)
}

fn one() -> C {
    C::new(1.0, 0.0)
}

fn build_library() -> HashMap<&'static str, Gate> {
    let mut lib = HashMap::new();

    lib.insert("I", gate1("I", one(), zero(), zero(), one()));
    lib.insert("X", gate1("X", zero(), one(), one(), zero()));
    lib.insert("Y", gate1("Y", zero(), C::new(0.0, -1.0), C::new(0.0, 1.0), zero()));
    lib.insert("Z", gate1("Z", one(), zero(), zero(), C::new(-1.0, 0.0)));

    let s = FRAC_1_SQRT_2;
    lib.insert("H", gate1("H", C::new(s, 0.0), C::new(s, 0.0), C::new(s, 0.0), C::new(-s, 0.0)));

    lib.insert("S", gate1("S", one(), zero(), zero(), C::new(0.0, 1.0)));
    lib.insert("T", gate1("T", one(), zero(), zero(), C::from_polar(1.0, PI / 4.0)));

    // Control at the higher tensor position: targets (control, target) map
    // pattern bit 1 (high) -> control, bit 0 (low) -> target, matching the
    // kernel's index convention (see `kernel::apply`). |10> <-> |11> swap.
    #[rustfmt::skip]
    let cnot = vec![
        one(),  zero(), zero(), zero(),
        zero(), one(),  zero(), zero(),
        zero(), zero(), zero(), one(),
        zero(), zero(), one(),  zero(),
    ];
    lib.insert(
        "CNOT",
        Gate::new("CNOT", 2, cnot).unwrap_or_else(|e| panic!("built-in gate 'CNOT' failed validation: {e}")),
    );

    lib
}

lazy_static::lazy_static! {
    static ref LIBRARY: HashMap<&'static str, Gate> = build_library();
}

/// Looks up a gate by its uppercase symbolic name in the built-in library.
pub fn lookup(name: &str) -> Option<&'static Gate> {
    LIBRARY.get(name)
}

/// All gate names in the built-in library, in a stable (insertion-derived)
/// order matching the declarations above.
pub fn all_names() -> Vec<&'static str> {
    ["I", "X", "Y", "Z", "H", "S", "T", "CNOT"]
        .into_iter()
        .filter(|n| LIBRARY.contains_key(n))
        .collect()
}
