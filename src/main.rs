use clap::Parser;
use std::process::ExitCode;

use logscan::cli::Cli;

fn main() -> ExitCode {
    Cli::parse().run()
}
