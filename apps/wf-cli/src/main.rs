mod error;
mod report;
mod scenario;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use wf_solver::{SolveOptions, solve_batch, solve_network_with_progress};

use crate::error::CliResult;
use crate::report::SolutionReport;
use crate::scenario::CompiledScenario;

#[derive(Parser)]
#[command(name = "wf-cli")]
#[command(about = "Wellflow CLI - steady-state wellhead to flare hydraulics", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Copy)]
struct SolveArgs {
    /// Override the iteration limit
    #[arg(long)]
    max_iterations: Option<usize>,
    /// Override the convergence tolerance
    #[arg(long)]
    tolerance: Option<f64>,
    /// Override the relaxation factor, in (0, 1]
    #[arg(long)]
    relaxation: Option<f64>,
    /// Print the solution as JSON instead of a table
    #[arg(long)]
    json: bool,
}

impl SolveArgs {
    fn apply(&self, mut options: SolveOptions) -> SolveOptions {
        if let Some(v) = self.max_iterations {
            options = options.with_max_iterations(v);
        }
        if let Some(v) = self.tolerance {
            options = options.with_tolerance(v);
        }
        if let Some(v) = self.relaxation {
            options = options.with_relaxation(v);
        }
        options
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a scenario file and show its flow path
    Check {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
    },
    /// Solve one scenario
    Solve {
        /// Path to the scenario YAML or JSON file
        scenario_path: PathBuf,
        #[command(flatten)]
        args: SolveArgs,
        /// Show iteration progress on stderr
        #[arg(long)]
        progress: bool,
    },
    /// Solve several scenarios in parallel
    Batch {
        /// Paths to scenario files
        #[arg(required = true)]
        scenario_paths: Vec<PathBuf>,
        #[command(flatten)]
        args: SolveArgs,
    },
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check { scenario_path } => cmd_check(&scenario_path),
        Commands::Solve {
            scenario_path,
            args,
            progress,
        } => cmd_solve(&scenario_path, args, progress),
        Commands::Batch {
            scenario_paths,
            args,
        } => cmd_batch(&scenario_paths, args),
    }
}

fn compile(path: &Path) -> CliResult<CompiledScenario> {
    scenario::load(path)?.compile()
}

fn cmd_check(path: &Path) -> CliResult<()> {
    println!("Checking scenario: {}", path.display());
    let compiled = compile(path)?;
    compiled.options.validate()?;
    let network = compiled.network()?;
    let flow_path = network.flow_path();

    let names: Vec<&str> = flow_path
        .nodes
        .iter()
        .filter_map(|id| network.node(*id))
        .map(|n| n.name.as_str())
        .collect();
    println!("✓ Scenario '{}' is valid", compiled.scenario.name);
    println!("  Flow path: {}", names.join(" -> "));
    for issue in &flow_path.issues {
        println!("  warning: {issue}");
    }
    Ok(())
}

fn cmd_solve(path: &Path, args: SolveArgs, progress: bool) -> CliResult<()> {
    let compiled = compile(path)?;
    let options = args.apply(compiled.options);
    let network = compiled.network()?;

    let started = Instant::now();
    let solution = solve_network_with_progress(
        &network,
        &compiled.scenario.fluid,
        &options,
        |event| {
            if progress {
                eprint!(
                    "\riter={:<4} dP={:.3e} kPa  mismatch={:.3e}",
                    event.iteration, event.max_pressure_change_kpa, event.flow_mismatch
                );
                let _ = io::stderr().flush();
            }
        },
    )?;
    if progress {
        eprintln!();
    }
    let elapsed = started.elapsed().as_secs_f64();

    let report = SolutionReport::new(&compiled.scenario.name, &solution);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_table());
        println!("Solve time: {elapsed:.3}s");
    }
    Ok(())
}

fn cmd_batch(paths: &[PathBuf], args: SolveArgs) -> CliResult<()> {
    let compiled = paths
        .iter()
        .map(|p| compile(p))
        .collect::<CliResult<Vec<_>>>()?;

    // One option set for the whole batch: the first file's, with CLI overrides.
    let base = compiled
        .first()
        .map(|c| c.options)
        .unwrap_or_default();
    let options = args.apply(base);
    let scenarios: Vec<_> = compiled.into_iter().map(|c| c.scenario).collect();

    let results = solve_batch(&scenarios, &options);

    let mut reports = Vec::new();
    for (scenario, result) in scenarios.iter().zip(results) {
        match result {
            Ok(solution) => reports.push(SolutionReport::new(&scenario.name, &solution)),
            Err(e) => eprintln!("✗ {}: {e}", scenario.name),
        }
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            print!("{}", report.render_table());
            println!();
        }
        println!(
            "✓ Solved {}/{} scenarios",
            reports.len(),
            scenarios.len()
        );
    }
    Ok(())
}
