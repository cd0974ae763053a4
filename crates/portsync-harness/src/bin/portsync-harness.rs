//! Conformance harness CLI.
//!
//! `run` executes selected scenarios (all of them by default), prints a
//! PASS/FAIL line per scenario, optionally appends a JSONL evidence
//! record per scenario, and exits nonzero if anything did not pass.
//! `list` prints the scenario registry.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use portsync_harness::scenarios::SCENARIOS;
use portsync_harness::structured_log::{LogEmitter, LogEntry, Outcome};
use portsync_harness::{HarnessError, Runner, ScenarioConfig};

#[derive(Parser)]
#[command(name = "portsync-harness")]
#[command(about = "Conformance scenarios for the portsync shim")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run scenarios and report PASS/FAIL per scenario.
    Run {
        /// Scenario name; repeatable. Omit to run every scenario.
        #[arg(long = "scenario")]
        scenarios: Vec<String>,

        /// Append JSONL evidence records to this file.
        #[arg(long)]
        log: Option<PathBuf>,

        /// Worker threads for contention scenarios.
        #[arg(long, default_value_t = 4)]
        threads: usize,

        /// Iterations per worker.
        #[arg(long, default_value_t = 200)]
        iterations: usize,
    },
    /// List the registered scenarios.
    List,
}

fn run(
    scenarios: &[String],
    log: Option<&PathBuf>,
    config: ScenarioConfig,
) -> Result<bool, HarnessError> {
    let mut emitter = match log {
        Some(path) => Some(LogEmitter::to_file(path)?),
        None => None,
    };
    let runner = Runner::new(config);
    let results = runner.run(scenarios)?;

    let mut all_passed = true;
    for result in &results {
        let tag = match result.outcome {
            Outcome::Pass => "PASS",
            Outcome::Fail => "FAIL",
            Outcome::Error => "ERROR",
        };
        println!(
            "{tag:<5} {name:<18} {ms:>6} ms  {detail}",
            name = result.name,
            ms = result.duration_ms,
            detail = result.detail,
        );
        if let Some(emitter) = emitter.as_mut() {
            emitter.emit(&LogEntry::scenario_result(
                result.name.clone(),
                result.outcome,
                result.duration_ms,
                result.detail.clone(),
            ))?;
        }
        all_passed &= result.passed();
    }
    println!(
        "{passed}/{total} scenarios passed",
        passed = results.iter().filter(|r| r.passed()).count(),
        total = results.len(),
    );
    Ok(all_passed)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            scenarios,
            log,
            threads,
            iterations,
        } => {
            let config = ScenarioConfig {
                threads,
                iterations,
            };
            match run(&scenarios, log.as_ref(), config) {
                Ok(true) => ExitCode::SUCCESS,
                Ok(false) => ExitCode::FAILURE,
                Err(err) => {
                    eprintln!("error: {err}");
                    ExitCode::FAILURE
                }
            }
        }
        Command::List => {
            for (name, _) in SCENARIOS {
                println!("{name}");
            }
            ExitCode::SUCCESS
        }
    }
}
