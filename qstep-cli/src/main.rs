//! qstep - replayable state-vector simulator
//! Command-line interface for simulating, stepping and inspecting circuits

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use qstep_core::{CircuitSimulator, GateKind, SimulationResult, reduce_qubit};
use qstep_timeline::{Frame, Session, SessionConfig};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{CliConfig, LoadedCircuit, RunOverrides};

#[derive(Parser)]
#[command(name = "qstep")]
#[command(author, version)]
#[command(about = "qstep - replayable single-qubit state-vector simulator", long_about = None)]
struct Cli {
    /// Config file (defaults to ./qstep.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by commands that sample measurements
#[derive(clap::Args)]
struct RunArgs {
    /// Circuit file (JSON gate array or {"numQubits", "gates"})
    #[arg(value_name = "CIRCUIT")]
    circuit: PathBuf,

    /// Register size (defaults to the file, then to the circuit's qubits)
    #[arg(short, long)]
    qubits: Option<usize>,

    /// Measurement shots
    #[arg(short, long, env = "QSTEP_SHOTS")]
    shots: Option<usize>,

    /// Seed for reproducible sampling
    #[arg(long, env = "QSTEP_SEED")]
    seed: Option<u64>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl RunArgs {
    fn overrides(&self) -> RunOverrides {
        RunOverrides {
            qubits: self.qubits,
            shots: self.shots,
            seed: self.seed,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a circuit and print outcome probabilities and counts
    Simulate(RunArgs),

    /// Bloch sphere angles for one qubit
    Bloch {
        #[arg(value_name = "CIRCUIT")]
        circuit: PathBuf,

        /// Qubit to reduce
        #[arg(long, default_value_t = 0)]
        qubit: usize,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Step through every frame from 0 to the last step
    Replay(RunArgs),

    /// Print the final state vector
    State {
        #[arg(value_name = "CIRCUIT")]
        circuit: PathBuf,

        /// Register size
        #[arg(short, long)]
        qubits: Option<usize>,
    },

    /// Show supported gates and defaults
    Info,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "qstep=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = CliConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Simulate(args) => simulate_command(&config, &args),
        Commands::Bloch { circuit, qubit, json } => bloch_command(&circuit, qubit, json),
        Commands::Replay(args) => replay_command(&config, &args),
        Commands::State { circuit, qubits } => state_command(&config, &circuit, qubits),
        Commands::Info => {
            print_info(&config);
            Ok(())
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

fn simulate_command(config: &CliConfig, args: &RunArgs) -> Result<()> {
    let loaded = LoadedCircuit::from_file(&args.circuit)?;
    let run = config.controller_for(&loaded, args.overrides());
    let (num_qubits, shots) = (run.num_qubits, run.shots);

    let result = CircuitSimulator::with_config(config.simulator_for(args.overrides()))
        .simulate(&loaded.circuit, num_qubits, shots)
        .context("Simulation failed")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!(
        "{} {} ({} gates, {} qubits, {} shots)",
        "Simulating".green().bold(),
        args.circuit.display().to_string().cyan(),
        loaded.circuit.len(),
        num_qubits,
        shots
    );
    print_result(&result);
    Ok(())
}

fn bloch_command(path: &Path, qubit: usize, json: bool) -> Result<()> {
    let loaded = LoadedCircuit::from_file(path)?;
    let angles = reduce_qubit(&loaded.circuit, qubit).context("Bloch reduction failed")?;
    let vector = angles.to_vector();

    if json {
        let value = serde_json::json!({
            "qubit": qubit,
            "theta": angles.theta,
            "phi": angles.phi,
            "vector": vector,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{} qubit {}", "Bloch".green().bold(), qubit.to_string().cyan());
    println!("  θ = {:.4} rad ({:.1}°)", angles.theta, angles.theta.to_degrees());
    println!("  φ = {:.4} rad ({:.1}°)", angles.phi, angles.phi.to_degrees());
    println!("  (x, y, z) = ({:.4}, {:.4}, {:.4})", vector.x, vector.y, vector.z);
    Ok(())
}

fn replay_command(config: &CliConfig, args: &RunArgs) -> Result<()> {
    let loaded = LoadedCircuit::from_file(&args.circuit)?;

    let session_config = SessionConfig {
        controller: config.controller_for(&loaded, args.overrides()),
        ..config.session.clone()
    };
    let tick = session_config.tick_interval;

    let mut session = Session::new(session_config)?;
    session.load(loaded.circuit).context("Circuit rejected")?;

    let mut frames = vec![session.frame().clone()];
    session.play()?;
    while session.controller().is_playing() {
        session.advance(tick)?;
        if frames.last().map(|f| f.step) != Some(session.frame().step) {
            frames.push(session.frame().clone());
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&frames)?);
        return Ok(());
    }

    println!(
        "{} {} ({} steps)",
        "Replaying".green().bold(),
        args.circuit.display().to_string().cyan(),
        frames.len()
    );
    for frame in &frames {
        print_frame(frame);
    }
    Ok(())
}

fn state_command(config: &CliConfig, path: &Path, qubits: Option<usize>) -> Result<()> {
    let loaded = LoadedCircuit::from_file(path)?;
    let num_qubits = loaded.register_size(qubits);

    let state = CircuitSimulator::with_config(config.simulator_for(RunOverrides::default()))
        .final_state(&loaded.circuit, num_qubits)
        .context("Simulation failed")?;

    println!("{} {} qubits", "State".green().bold(), num_qubits);
    println!("  |ψ⟩ = {}", state);
    println!("  entropy = {:.4} bits", state.entropy());
    for q in 0..num_qubits {
        println!("  P(q{} = 1) = {:.4}", q, state.qubit_probability(q, true)?);
    }
    Ok(())
}

// ============================================================================
// Output
// ============================================================================

fn print_result(result: &SimulationResult) {
    if result.probabilities.is_empty() {
        println!("  {}", "(empty circuit)".dimmed());
        return;
    }

    println!("  {:<width$}  {:>9}  {:>8}", "outcome", "prob", "count", width = result.num_qubits.max(7));
    let most_likely = result.most_likely().map(|(label, _)| label.to_string());
    for (label, p) in &result.probabilities {
        let count = result.counts.get(label).copied().unwrap_or(0);
        let line = format!(
            "  {:<width$}  {:>9.4}  {:>8}",
            format!("|{label}⟩"),
            p,
            count,
            width = result.num_qubits.max(7)
        );
        if most_likely.as_deref() == Some(label.as_str()) {
            println!("{}", line.bold());
        } else {
            println!("{line}");
        }
    }
    if result.skipped_gates > 0 {
        println!(
            "  {} {} gate(s) not evolved (measurement markers or two-qubit gates)",
            "note:".yellow().bold(),
            result.skipped_gates
        );
    }
}

fn print_frame(frame: &Frame) {
    println!();
    println!(
        "{} {} ({} visible gate(s))",
        "Step".bold(),
        frame.step.to_string().cyan(),
        frame.visible_gates.len()
    );
    print_result(&frame.result);
}

fn print_info(config: &CliConfig) {
    println!("{}", "qstep - replayable state-vector simulator".bold());
    println!();
    println!("{}", "Gates:".bold());
    for kind in GateKind::SUPPORTED {
        println!("  • {}", kind);
    }
    println!();
    println!("{}", "Defaults:".bold());
    let controller = &config.session.controller;
    println!("  shots            {}", controller.shots);
    println!("  max qubits       {}", controller.simulator.max_qubits);
    println!("  max shots        {}", controller.simulator.max_shots);
    println!("  debounce delay   {}", config.session.debounce_delay);
    println!("  tick interval    {}", config.session.tick_interval);
    println!("  history limit    {}", config.session.history.max_snapshots);
    println!();
    println!("{}", "Commands:".bold());
    println!("  qstep simulate circuit.json -s 4096     # Probabilities and counts");
    println!("  qstep simulate circuit.json --json      # JSON output");
    println!("  qstep bloch circuit.json --qubit 1      # Bloch angles");
    println!("  qstep replay circuit.json --seed 7      # Frame by frame");
    println!("  qstep state circuit.json                # Final state vector");
    println!();
    println!(
        "{} two-qubit gates (CNOT, CZ, SWAP) are accepted but not simulated",
        "note:".yellow().bold()
    );
}
