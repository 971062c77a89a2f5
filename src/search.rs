//! Search engine: layer-indexed breadth-first search over gate-operation
//! sequences, with quantized-state dedup, best-so-far tracking, and
//! post-success identity padding to `max_layers`.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::{
    constraints::Constraints,
    error::{Result, SolverError},
    math::{N, R},
    operation::Operation,
    state::State,
};

/// Hash/equality proxy for a state vector: each amplitude's real and
/// imaginary parts, rounded to `decimals` places and scaled to an integer.
/// Two amplitude vectors differing by less than `10^(-decimals-1)`
/// elementwise map to the same key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AmplitudeKey(Vec<i64>);

pub fn quantize(state: &State, decimals: u32) -> AmplitudeKey {
    let scale = 10f64.powi(decimals as i32);
    let mut parts = Vec::with_capacity(state.amplitudes().len() * 2);
    for amp in state.amplitudes() {
        parts.push((amp.re * scale).round() as i64);
        parts.push((amp.im * scale).round() as i64);
    }
    AmplitudeKey(parts)
}

/// Outcome of a solve call.
#[derive(Clone, Debug)]
pub struct SearchResult {
    pub success: bool,
    pub sequence: Vec<Operation>,
    pub layers_used: N,
    pub states: Vec<State>,
    pub final_state: State,
    pub distance: R,
}

fn evolve(start: &State, sequence: &[Operation]) -> Result<Vec<State>> {
    let mut states = Vec::with_capacity(sequence.len());
    let mut current = start.clone();
    for op in sequence {
        current = current.apply(op)?;
        states.push(current.clone());
    }
    Ok(states)
}

/// Runs a layer-indexed breadth-first search from `start` towards `target`,
/// bounded to `max_layers` layers, restricted at each layer by
/// `constraints` out of the full `table` of candidate operations.
#[allow(clippy::too_many_arguments)]
pub fn solve(
    start: &State,
    target: &State,
    max_layers: N,
    table: &[Operation],
    constraints: &Constraints,
    tolerance: R,
    quantization_decimals: u32,
) -> Result<SearchResult> {
    if start.num_qubits() != target.num_qubits() {
        return Err(SolverError::QubitMismatch {
            lhs: start.num_qubits(),
            rhs: target.num_qubits(),
        });
    }
    if max_layers == 0 {
        return Err(SolverError::OutOfRangeLayer { layer: 0, max_layers });
    }
    constraints.check_within(max_layers)?;

    let admissible: Vec<Vec<Operation>> =
        (0..max_layers).map(|d| constraints.admissible(d, table)).collect();

    let initial_distance = start.distance(target)?;
    if initial_distance <= tolerance && !constraints.has_fixed_layers() {
        return Ok(SearchResult {
            success: true,
            sequence: Vec::new(),
            layers_used: 0,
            states: Vec::new(),
            final_state: start.clone(),
            distance: initial_distance,
        });
    }

    let mut frontier: VecDeque<(State, Vec<Operation>)> = VecDeque::new();
    frontier.push_back((start.clone(), Vec::new()));

    let mut visited: HashMap<N, HashSet<AmplitudeKey>> = HashMap::new();
    visited.entry(0).or_default().insert(quantize(start, quantization_decimals));

    let margin = tolerance * 0.1;
    let mut best_distance = initial_distance;
    let mut best_sequence: Vec<Operation> = Vec::new();

    while let Some((state, sequence)) = frontier.pop_front() {
        let depth = sequence.len();
        if depth >= max_layers {
            continue;
        }

        for op in &admissible[depth] {
            let new_state = state.apply(op)?;
            let new_distance = new_state.distance(target)?;
            let mut new_sequence = sequence.clone();
            new_sequence.push(*op);
            let new_depth = new_sequence.len();

            if new_distance < best_distance - margin {
                best_distance = new_distance;
                best_sequence = new_sequence.clone();
            }

            let fixed_satisfied = constraints.max_fixed_layer().map_or(true, |m| m < new_depth);

            if new_distance <= tolerance && fixed_satisfied {
                let layers_used = new_depth;
                let mut final_sequence = new_sequence;
                let mut d = final_sequence.len();
                while d < max_layers {
                    match constraints.identity_for(d, table) {
                        Some(pad_op) => {
                            final_sequence.push(pad_op);
                            d += 1;
                        }
                        None => break,
                    }
                }

                let states = evolve(start, &final_sequence)?;
                let final_state = states.last().cloned().unwrap_or_else(|| start.clone());
                let distance = final_state.distance(target)?;

                return Ok(SearchResult {
                    success: true,
                    sequence: final_sequence,
                    layers_used,
                    states,
                    final_state,
                    distance,
                });
            }

            let key = quantize(&new_state, quantization_decimals);
            if visited.entry(new_depth).or_default().insert(key) {
                frontier.push_back((new_state, new_sequence));
            }
        }
    }

    let states = evolve(start, &best_sequence)?;
    let final_state = states.last().cloned().unwrap_or_else(|| start.clone());

    Ok(SearchResult {
        success: false,
        layers_used: best_sequence.len(),
        sequence: best_sequence,
        states,
        final_state,
        distance: best_distance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{constraints::Constraints, gate, operation::build_table, state::State};
    use std::collections::HashMap as Map;

    fn alphabet(names: &[&str]) -> Vec<&'static crate::gate::Gate> {
        names.iter().map(|n| gate::lookup(n).unwrap()).collect()
    }

    fn basis(bit: u64, n: N) -> State {
        let dim = 1usize << n;
        let mut amps = vec![num_complex::Complex::new(0.0, 0.0); dim];
        amps[bit as usize] = num_complex::Complex::new(1.0, 0.0);
        State::new(amps, false).unwrap()
    }

    #[test]
    fn s1_x_flip() {
        let alpha = alphabet(&["X"]);
        let table = build_table(&alpha, 1).unwrap();
        let constraints = Constraints::new(Map::new(), Map::new(), None, 1, &alpha).unwrap();
        let start = basis(0, 1);
        let target = basis(1, 1);
        let result = solve(&start, &target, 1, &table, &constraints, 1e-6, 8).unwrap();
        assert!(result.success);
        assert_eq!(result.sequence.len(), 1);
        assert_eq!(result.sequence[0].describe(), "X q0");
        assert!(result.distance < 1e-6);
    }

    #[test]
    fn s2_bell_state() {
        let alpha = alphabet(&["H", "CNOT"]);
        let table = build_table(&alpha, 2).unwrap();
        let constraints = Constraints::new(Map::new(), Map::new(), None, 2, &alpha).unwrap();
        let start = basis(0, 2);
        let amp = std::f64::consts::FRAC_1_SQRT_2;
        let target = State::new(
            vec![
                num_complex::Complex::new(amp, 0.0),
                num_complex::Complex::new(0.0, 0.0),
                num_complex::Complex::new(0.0, 0.0),
                num_complex::Complex::new(amp, 0.0),
            ],
            false,
        )
        .unwrap();
        let result = solve(&start, &target, 3, &table, &constraints, 1e-6, 8).unwrap();
        assert!(result.success);
        assert!(result.sequence.len() <= 2);
        assert!(result.distance < 1e-6);
        assert_eq!(result.sequence[0].describe(), "H q0");
        assert_eq!(result.sequence[1].describe(), "CNOT q0->q1");
    }

    #[test]
    fn s3_depth_starved_bell_fails() {
        let alpha = alphabet(&["H", "CNOT"]);
        let table = build_table(&alpha, 2).unwrap();
        let constraints = Constraints::new(Map::new(), Map::new(), None, 2, &alpha).unwrap();
        let start = basis(0, 2);
        let amp = std::f64::consts::FRAC_1_SQRT_2;
        let target = State::new(
            vec![
                num_complex::Complex::new(amp, 0.0),
                num_complex::Complex::new(0.0, 0.0),
                num_complex::Complex::new(0.0, 0.0),
                num_complex::Complex::new(amp, 0.0),
            ],
            false,
        )
        .unwrap();
        let result = solve(&start, &target, 1, &table, &constraints, 1e-6, 8).unwrap();
        assert!(!result.success);
        assert!(result.distance > 1e-6);
    }

    #[test]
    fn s4_fixed_gate_compensation() {
        let alpha = alphabet(&["X"]);
        let table = build_table(&alpha, 1).unwrap();
        let mut fixed = Map::new();
        fixed.insert(1, Operation::unary(gate::lookup("X").unwrap(), 0));
        let constraints = Constraints::new(fixed, Map::new(), None, 1, &alpha).unwrap();
        let start = basis(0, 1);
        let target = basis(0, 1);
        let result = solve(&start, &target, 2, &table, &constraints, 1e-6, 8).unwrap();
        assert!(result.success);
        assert_eq!(result.sequence.len(), 2);
        assert_eq!(result.layers_used, 2);
        assert!(result.distance < 1e-6);
    }

    #[test]
    fn s5_fixed_beyond_depth_rejected() {
        let alpha = alphabet(&["X"]);
        let mut fixed = Map::new();
        fixed.insert(2, Operation::unary(gate::lookup("X").unwrap(), 0));
        let constraints = Constraints::new(fixed, Map::new(), None, 1, &alpha).unwrap();
        let table = build_table(&alpha, 1).unwrap();
        let start = basis(0, 1);
        let target = basis(0, 1);
        let result = solve(&start, &target, 2, &table, &constraints, 1e-6, 8);
        assert!(matches!(result, Err(SolverError::OutOfRangeLayer { .. })));
    }

    /// Property 7: when the target is reached strictly before
    /// `max_layers` and `I` is in the alphabet, the returned sequence is
    /// padded out with `I` to exactly `max_layers`.
    #[test]
    fn padding_extends_an_early_success_to_max_layers() {
        let alpha = alphabet(&["X", "I"]);
        let table = build_table(&alpha, 1).unwrap();
        let mut fixed = Map::new();
        fixed.insert(0, Operation::unary(gate::lookup("X").unwrap(), 0));
        let constraints = Constraints::new(fixed, Map::new(), None, 1, &alpha).unwrap();
        let start = basis(0, 1);
        let target = basis(1, 1);
        let result = solve(&start, &target, 3, &table, &constraints, 1e-6, 8).unwrap();

        assert!(result.success);
        assert_eq!(result.layers_used, 1);
        assert_eq!(result.sequence.len(), 3);
        assert_eq!(result.sequence[0].describe(), "X q0");
        assert_eq!(result.sequence[1].describe(), "I q0");
        assert_eq!(result.sequence[2].describe(), "I q0");
        assert!(result.distance < 1e-6);
    }
}
