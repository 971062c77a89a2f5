//! Crate-level property tests: scenario and unit coverage lives beside the
//! code it exercises, while cross-cutting properties that span several
//! modules live here.

use std::collections::HashMap;

use num_complex::Complex;

use crate::{
    gate, operation,
    operation::Operation,
    search,
    solver::{Solver, SolverConfig},
    state::State,
};

fn c(re: f64, im: f64) -> Complex<f64> {
    Complex::new(re, im)
}

fn basis(bit: usize, n: usize) -> State {
    let mut amps = vec![c(0.0, 0.0); 1 << n];
    amps[bit] = c(1.0, 0.0);
    State::new(amps, false).unwrap()
}

/// Property 1: every operation applied to a normalized state produces a
/// normalized state, within 1e-9.
#[test]
fn unitarity_preservation_across_the_alphabet() {
    let alphabet = gate::all_names().into_iter().map(|n| gate::lookup(n).unwrap()).collect::<Vec<_>>();
    let table = operation::build_table(&alphabet, 2).unwrap();

    for bit in 0..4 {
        let start = basis(bit, 2);
        for op in &table {
            let out = start.apply(op).unwrap();
            let norm_sq: f64 = out.amplitudes().iter().map(Complex::norm_sqr).sum();
            assert!((norm_sq - 1.0).abs() < 1e-9, "{op} broke normalization from basis {bit}");
        }
    }
}

/// Property 2: applying a self-inverse gate twice returns the original
/// state, for every basis state of a 2-qubit register.
#[test]
fn round_trip_for_self_inverse_gates() {
    let pairs: &[(&str, &[usize])] = &[("X", &[0]), ("Y", &[0]), ("Z", &[0]), ("H", &[0]), ("CNOT", &[0, 1])];

    for &(name, targets) in pairs {
        let gate = gate::lookup(name).unwrap();
        let op = Operation::new(gate, targets).unwrap();

        for bit in 0..4 {
            let start = basis(bit, 2);
            let once = start.apply(&op).unwrap();
            let twice = once.apply(&op).unwrap();
            let distance = twice.distance(&start).unwrap();
            assert!(distance < 1e-9, "{name} is not self-inverse from basis {bit}: distance {distance}");
        }
    }
}

/// Property 4: two solves with identical inputs produce identical
/// sequences and final states.
#[test]
fn determinism_across_repeated_solves() {
    let config = SolverConfig {
        allowed_gates: Some(vec!["H".to_string(), "CNOT".to_string()]),
        ..Default::default()
    };
    let solver = Solver::new(2, config).unwrap();

    let start = basis(0, 2);
    let amp = std::f64::consts::FRAC_1_SQRT_2;
    let target = State::new(vec![c(amp, 0.0), c(0.0, 0.0), c(0.0, 0.0), c(amp, 0.0)], false).unwrap();

    let first = solver.solve(&start, &target, 3).unwrap();
    let second = solver.solve(&start, &target, 3).unwrap();

    assert_eq!(first.success, second.success);
    assert_eq!(
        first.sequence.iter().map(Operation::describe).collect::<Vec<_>>(),
        second.sequence.iter().map(Operation::describe).collect::<Vec<_>>(),
    );
    assert_eq!(first.final_state.amplitudes(), second.final_state.amplitudes());
}

/// Property 9: two amplitude vectors differing by less than
/// `10^(-decimals-1)` elementwise quantize to the same key.
#[test]
fn quantization_soundness() {
    let decimals = 8;
    let a = State::new(vec![c(0.5, 0.0), c(0.5, 0.0), c(0.5, 0.0), c(0.5, 0.0)], false).unwrap();

    let epsilon = 10f64.powi(-(decimals as i32) - 1) * 0.4;
    let b = State::new(
        vec![c(0.5 + epsilon, 0.0), c(0.5 - epsilon, 0.0), c(0.5, epsilon), c(0.5, -epsilon)],
        false,
    )
    .unwrap();

    assert_eq!(search::quantize(&a, decimals), search::quantize(&b, decimals));
}

/// Property 6: success implies the distance is within tolerance and every
/// fixed layer lies strictly before the sequence's end.
#[test]
fn fixed_operations_survive_into_the_returned_sequence() {
    let mut fixed = HashMap::new();
    fixed.insert(0, crate::solver::FixedOperation { gate: "X".to_string(), targets: vec![0] });
    let config = SolverConfig {
        allowed_gates: Some(vec!["X".to_string()]),
        fixed_operations: fixed,
        ..Default::default()
    };
    let solver = Solver::new(1, config).unwrap();

    let start = basis(0, 1);
    let target = basis(1, 1);
    let result = solver.solve(&start, &target, 1).unwrap();

    assert!(result.success);
    assert_eq!(result.sequence[0].describe(), "X q0");
    assert!(result.layers_used <= result.sequence.len());
}
