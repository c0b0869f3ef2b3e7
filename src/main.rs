// Taskkeeper - single-process task scheduler with persisted state
// Main entry point

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use taskkeeper::cli::{describe_origin, handle_command, Command, Repl};
use taskkeeper::config::load_config;
use taskkeeper::logging::init_tracing;
use taskkeeper::persistence::StateStore;
use taskkeeper::scheduling::TaskScheduler;

#[derive(Parser, Debug)]
#[command(name = "taskkeeper", version, about)]
struct CliArgs {
    /// Configuration file (default: ~/.taskkeeper/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// State file to load and save (overrides config and environment)
    #[arg(long, global = true)]
    state_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Run a single command; without one, start the interactive loop
    #[command(subcommand)]
    command: Option<Command>,
}

fn main() -> Result<()> {
    let args = CliArgs::parse();

    let mut config = load_config(args.config.as_deref())?;
    if let Some(state_file) = args.state_file {
        config.state_file = state_file;
    }
    init_tracing(args.debug || config.debug_logging);

    let store = StateStore::new(config.state_file.clone(), config.initial_capacity);
    let (mut scheduler, origin) = TaskScheduler::open(store);
    let origin_message = describe_origin(&origin, &config.state_file);

    match args.command {
        Some(command) => {
            eprintln!("{}", origin_message);
            println!("{}", handle_command(&command, &mut scheduler, &config));
        }
        None => {
            println!("{}", origin_message);
            Repl::new(&mut scheduler, &config).run()?;
        }
    }

    Ok(())
}
