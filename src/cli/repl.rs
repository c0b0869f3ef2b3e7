// Interactive command loop
//
// Each line is split shell-style and parsed with the same clap definitions
// the one-shot subcommands use.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use super::commands::{handle_command, Command};
use crate::config::Config;
use crate::scheduling::TaskScheduler;

const PROMPT: &str = "taskkeeper> ";

#[derive(Parser, Debug)]
#[command(
    name = "taskkeeper",
    no_binary_name = true,
    disable_version_flag = true
)]
struct ReplLine {
    #[command(subcommand)]
    command: ReplCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum ReplCommand {
    #[command(flatten)]
    Run(Command),
    /// Leave the interactive loop
    #[command(alias = "quit")]
    Exit,
}

/// Parse one input line. `Err` holds text to show the user (including
/// clap's help output for `help`).
fn parse_line(line: &str) -> std::result::Result<ReplCommand, String> {
    let args = shlex::split(line)
        .unwrap_or_else(|| line.split_whitespace().map(String::from).collect());
    ReplLine::try_parse_from(args)
        .map(|parsed| parsed.command)
        .map_err(|e| e.render().to_string())
}

pub struct Repl<'a> {
    scheduler: &'a mut TaskScheduler,
    config: &'a Config,
}

impl<'a> Repl<'a> {
    pub fn new(scheduler: &'a mut TaskScheduler, config: &'a Config) -> Self {
        Self { scheduler, config }
    }

    pub fn run(&mut self) -> Result<()> {
        let mut editor = DefaultEditor::new().context("Failed to initialise line editor")?;

        println!("Type 'help' for available commands, 'quit' to exit.");
        loop {
            let line = match editor.readline(PROMPT) {
                Ok(line) => line,
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(e) => return Err(e).context("Failed to read input"),
            };
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let _ = editor.add_history_entry(line);

            match parse_line(line) {
                Ok(ReplCommand::Exit) => break,
                Ok(ReplCommand::Run(command)) => {
                    println!("{}", handle_command(&command, self.scheduler, self.config));
                }
                Err(message) => eprintln!("{}", message.trim_end()),
            }
        }

        println!("Goodbye!");
        Ok(())
    }
}
