use clap::Parser;
use log::info;
use ntur::loader::{tokenize, MachineLoader};
use ntur::{RunOutcome, TuringMachineError, MAX_EXECUTION_STEPS};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[clap(author, version, about, long_about = None, arg_required_else_help = true)]
struct Cli {
    /// The JSON machine description to execute
    #[clap(short, long)]
    machine: PathBuf,

    /// The input word (`[B]` is a blank, `"xy"` a multi-character symbol, `epsilon` the empty word)
    #[clap(short, long, default_value = "")]
    input: String,

    /// Maximum number of steps before giving up
    #[clap(short = 's', long, env = "NTUR_MAX_STEPS", default_value_t = MAX_EXECUTION_STEPS)]
    max_steps: usize,

    /// Remove unreachable and sink states before running
    #[clap(long)]
    prune: bool,

    /// Print a summary of the machine before running
    #[clap(long)]
    summary: bool,

    /// Print every generation of the execution
    #[clap(short = 'd', long)]
    debug: bool,
}

fn execute(cli: &Cli) -> Result<RunOutcome, TuringMachineError> {
    let mut machine = MachineLoader::load(&cli.machine)?;

    if cli.prune {
        let unreachable = machine.remove_unreachable()?;
        let sinks = machine.remove_sink_states()?;
        info!(
            "pruned {} unreachable and {} sink state(s)",
            unreachable, sinks
        );
    }

    if cli.summary {
        println!("{}\n", machine);
    }

    let input = tokenize(&cli.input, machine.blank_label());
    let mut run = machine
        .run_stepwise(&input)?
        .with_max_steps(Some(cli.max_steps));

    if cli.debug {
        for (step, generation) in run.by_ref().enumerate() {
            println!("Step: {}, Configurations: {}", step, machine.describe_set(&generation));
        }
    }

    Ok(run.finish())
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match execute(&cli) {
        Ok(outcome) => {
            let code = match &outcome {
                RunOutcome::Accepted { steps, .. } => {
                    println!("Accepted after {} step(s).", steps);
                    0
                }
                RunOutcome::Rejected { steps } => {
                    println!("Rejected after {} step(s).", steps);
                    1
                }
                RunOutcome::BudgetExceeded { steps, configurations } => {
                    println!(
                        "Undetermined: {} configuration(s) still alive after {} step(s).",
                        configurations.len(),
                        steps
                    );
                    2
                }
                RunOutcome::Cancelled { steps, .. } => {
                    println!("Cancelled after {} step(s).", steps);
                    2
                }
            };
            ExitCode::from(code)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(3)
        }
    }
}
