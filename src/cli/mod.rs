//! Command-line interface for logscan
//!
//! Argument parsing (clap), logging setup and console output. The scanning
//! engine itself lives in [`crate::scanner`].

pub mod commands;
mod output;

pub use commands::Cli;
pub use output::Output;
