#![cfg(feature = "cli")]

use std::{collections::HashMap, fs, io::Read, path::PathBuf};

use clap::Parser;
use serde::{Deserialize, Serialize};

use qsynth::{
    error::SolverError,
    operation::Operation,
    search::SearchResult,
    solver::{FixedOperation, Solver, SolverConfig},
    state::State,
};

#[derive(Parser)]
#[clap(name = "qsynth", about = "Search for a gate sequence mapping one quantum state to another")]
struct Args {
    /// Path to a JSON job description, or '-' to read from stdin.
    #[clap(long)]
    config: String,

    /// Overrides the job's `max_layers`.
    #[clap(long)]
    max_layers: Option<usize>,

    /// Disables the ASCII timeline after the result summary.
    #[clap(long)]
    no_timeline: bool,
}

#[derive(Deserialize)]
struct FixedOperationJson {
    gate: String,
    targets: Vec<usize>,
}

#[derive(Deserialize)]
struct Job {
    num_qubits: usize,
    allowed_gates: Option<Vec<String>>,
    #[serde(default = "default_tolerance")]
    tolerance: f64,
    #[serde(default = "default_decimals")]
    quantization_decimals: u32,
    #[serde(default)]
    fixed_operations: HashMap<String, FixedOperationJson>,
    #[serde(default)]
    layer_gate_allowlists: HashMap<String, Vec<String>>,
    #[serde(default)]
    default_layer_gate_allowlist: Option<Vec<String>>,
    start: Vec<(f64, f64)>,
    target: Vec<(f64, f64)>,
    max_layers: usize,
}

fn default_tolerance() -> f64 {
    1e-6
}

fn default_decimals() -> u32 {
    8
}

fn load_job(path: &str) -> Result<Job, Box<dyn std::error::Error>> {
    let raw = if path == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(PathBuf::from(path))?
    };
    Ok(serde_json::from_str(&raw)?)
}

fn parse_layer_keys<T>(raw: HashMap<String, T>) -> Result<HashMap<usize, T>, Box<dyn std::error::Error>> {
    raw.into_iter()
        .map(|(k, v)| Ok((k.parse::<usize>()?, v)))
        .collect()
}

fn format_complex(re: f64, im: f64) -> String {
    let sign = if im >= 0.0 { '+' } else { '-' };
    format!("{re:.6}{sign}{:.6}i", im.abs())
}

/// Wire schema for a single operation: `{gate, targets}`, matching the
/// original persistence layer's `serialize_sequence`.
#[derive(Serialize)]
struct OperationPayload {
    gate: String,
    targets: Vec<usize>,
}

impl From<&Operation> for OperationPayload {
    fn from(op: &Operation) -> Self {
        OperationPayload { gate: op.gate().name().to_string(), targets: op.targets() }
    }
}

/// Wire schema for a state: `{num_qubits, amplitudes, probabilities}`.
#[derive(Serialize)]
struct StatePayload {
    num_qubits: usize,
    amplitudes: Vec<(f64, f64)>,
    probabilities: Vec<f64>,
}

impl From<&State> for StatePayload {
    fn from(state: &State) -> Self {
        StatePayload {
            num_qubits: state.num_qubits(),
            amplitudes: state.amplitudes().iter().map(|a| (a.re, a.im)).collect(),
            probabilities: state.probabilities(),
        }
    }
}

/// One step of the timeline: the 1-based layer, the operation applied, and
/// the state reached after it.
#[derive(Serialize)]
struct StepPayload {
    layer: usize,
    operation: OperationPayload,
    state: StatePayload,
}

/// The top-level result envelope: `{success, distance, layers_used,
/// sequence, steps, final_state}`.
#[derive(Serialize)]
struct ResultPayload {
    success: bool,
    distance: f64,
    layers_used: usize,
    sequence: Vec<OperationPayload>,
    steps: Vec<StepPayload>,
    final_state: StatePayload,
}

fn result_payload(result: &SearchResult) -> ResultPayload {
    let sequence: Vec<OperationPayload> = result.sequence.iter().map(OperationPayload::from).collect();

    let steps: Vec<StepPayload> = result
        .sequence
        .iter()
        .zip(&result.states)
        .enumerate()
        .map(|(idx, (op, state))| StepPayload {
            layer: idx + 1,
            operation: op.into(),
            state: state.into(),
        })
        .collect();

    ResultPayload {
        success: result.success,
        distance: result.distance,
        layers_used: result.layers_used,
        sequence,
        steps,
        final_state: (&result.final_state).into(),
    }
}

fn print_result(result: &SearchResult, num_qubits: usize, max_layers: usize) {
    if result.success {
        println!("Solved target state in {} layer(s).", result.layers_used);
    } else {
        println!("Failed to reach target within {max_layers} layer(s).");
    }
    println!("Final distance: {:.6e}", result.distance);

    if result.sequence.is_empty() {
        println!("Gate sequence: (empty)");
    } else {
        println!("Gate sequence:");
        for (idx, op) in result.sequence.iter().enumerate() {
            println!("  {}. {}", idx + 1, op.describe());
        }
    }

    println!("Final state amplitudes:");
    for (index, amp) in result.final_state.amplitudes().iter().enumerate() {
        println!("  |{index:0width$b}> = {}", format_complex(amp.re, amp.im), width = num_qubits);
    }
}

/// Reproduces the wire-per-qubit ASCII rendering of the original solver's
/// timeline tool: one block per layer, a circuit diagram line per qubit,
/// then the amplitude dump of the state after that layer.
fn render_timeline(start: &State, result: &SearchResult) {
    println!();
    println!("Initial state:");
    dump_state(start);
    println!();

    if result.sequence.is_empty() {
        println!("Timeline: (no operations)");
        println!();
        println!("Final state:");
        dump_state(&result.final_state);
        return;
    }

    println!("Timeline:");
    for (layer_index, (op, state)) in result.sequence.iter().zip(&result.states).enumerate() {
        println!("Layer {}: {}", layer_index + 1, op.describe());
        for line in render_layer(op, start.num_qubits()) {
            println!("    {line}");
        }
        println!("    State after layer {}:", layer_index + 1);
        for line in state_lines(state) {
            println!("        {line}");
        }
        println!();
    }

    println!("Final state:");
    dump_state(&result.final_state);
}

fn render_layer(op: &Operation, num_qubits: usize) -> Vec<String> {
    const WIDTH: usize = 7;
    let center = WIDTH / 2;
    let mut wires: Vec<Vec<char>> = vec![vec!['─'; WIDTH]; num_qubits];

    match op {
        Operation::Unary { gate, target } => {
            let symbol = gate.name().chars().next().unwrap_or('?');
            wires[*target][center] = symbol;
        }
        Operation::Binary { gate, control, target } if gate.name().eq_ignore_ascii_case("CNOT") => {
            let (top, bottom) = (control.min(target), control.max(target));
            wires[*control][center] = '●';
            wires[*target][center] = 'X';
            for wire in wires.iter_mut().take(*bottom).skip(top + 1) {
                wire[center] = '│';
            }
        }
        Operation::Binary { gate, control, target } => {
            let symbol = gate.name().chars().next().unwrap_or('?');
            wires[*control][center] = symbol;
            wires[*target][center] = symbol;
        }
    }

    wires
        .into_iter()
        .enumerate()
        .map(|(idx, chars)| format!("q{idx} {}", chars.into_iter().collect::<String>()))
        .collect()
}

fn state_lines(state: &State) -> Vec<String> {
    let width = state.num_qubits();
    state
        .amplitudes()
        .iter()
        .enumerate()
        .map(|(index, amp)| {
            let prob = amp.norm_sqr();
            format!(
                "|{index:0width$b}> amplitude={}, prob={prob:.6}",
                format_complex(amp.re, amp.im),
                width = width
            )
        })
        .collect()
}

fn dump_state(state: &State) {
    for line in state_lines(state) {
        println!("{line}");
    }
}

fn build_solver(job: &Job) -> Result<Solver, Box<dyn std::error::Error>> {
    let fixed_operations = parse_layer_keys(
        job.fixed_operations
            .iter()
            .map(|(k, v)| (k.clone(), FixedOperation { gate: v.gate.clone(), targets: v.targets.clone() }))
            .collect(),
    )?;
    let layer_gate_allowlists = parse_layer_keys(job.layer_gate_allowlists.clone())?;

    let config = SolverConfig {
        allowed_gates: job.allowed_gates.clone(),
        tolerance: job.tolerance,
        quantization_decimals: job.quantization_decimals,
        fixed_operations,
        layer_gate_allowlists,
        default_layer_gate_allowlist: job.default_layer_gate_allowlist.clone(),
    };

    Solver::new(job.num_qubits, config).map_err(|e: SolverError| e.into())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let job = load_job(&args.config)?;

    let solver = build_solver(&job)?;
    let start = State::from_real_imag_pairs(&job.start, false)?;
    let target = State::from_real_imag_pairs(&job.target, false)?;
    let max_layers = args.max_layers.unwrap_or(job.max_layers);

    let result = solver.solve(&start, &target, max_layers)?;

    println!("{}", serde_json::to_string_pretty(&result_payload(&result))?);
    println!();
    print_result(&result, job.num_qubits, max_layers);

    if !args.no_timeline {
        render_timeline(&start, &result);
    }

    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}
