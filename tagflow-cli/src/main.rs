//! Tagflow CLI
//!
//! Parse, query and edit markup from the command line.

use std::process::ExitCode;

use clap::Parser;
use owo_colors::OwoColorize;
use tagflow_cli::{Cli, run};

#[allow(clippy::print_stderr)]
fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
