use clap::Parser;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::cli::Output;

pub mod scan;

#[derive(Parser, Debug)]
#[command(
    name = "logscan",
    version = crate::VERSION,
    about = "LogScan: A tool for scanning log files for specific activities.",
    long_about = "Scores every line of the given log files against a weighted keyword list \
                  and reports the flagged lines, most important first."
)]
pub struct Cli {
    /// Increase verbosity (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except for errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Use custom configuration file
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub scan: scan::ScanArgs,
}

impl Cli {
    /// Run the scan, reporting any fatal error on stderr
    pub fn run(self) -> ExitCode {
        setup_logging(self.verbose, self.quiet);

        let output = Output::new(self.verbose > 0, self.quiet);
        match scan::execute(self.scan, &output, self.config.as_deref()) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                output.error(&format!("{e:#}"));
                ExitCode::FAILURE
            }
        }
    }
}

fn setup_logging(verbose: u8, quiet: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            return tracing_subscriber::EnvFilter::new("error");
        }
        match verbose {
            0 => tracing_subscriber::EnvFilter::new("warn"),
            1 => tracing_subscriber::EnvFilter::new("info"),
            2 => tracing_subscriber::EnvFilter::new("debug"),
            _ => tracing_subscriber::EnvFilter::new("trace"),
        }
    });

    let stderr = std::io::stderr();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(stderr.is_terminal())
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ReportFormat;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_original_flags() {
        let cli = Cli::try_parse_from([
            "logscan",
            "-k",
            "words.txt",
            "-i",
            "-q",
            "-s",
            "--max-weight",
            "5",
            "--log-files",
            "a.log",
            "b.log",
            "--exclude-keywords",
            "debug",
            "info",
            "--format",
            "json",
        ])
        .unwrap();

        assert!(cli.quiet);
        assert!(cli.scan.ignore_case);
        assert!(cli.scan.summary);
        assert_eq!(cli.scan.keywords, Some(PathBuf::from("words.txt")));
        assert_eq!(cli.scan.max_weight, Some(5));
        assert_eq!(cli.scan.log_files.len(), 2);
        assert_eq!(cli.scan.exclude_keywords, vec!["debug", "info"]);
        assert_eq!(cli.scan.format, Some(ReportFormat::Json));
    }

    #[test]
    fn test_max_weight_range() {
        assert!(Cli::try_parse_from(["logscan", "--max-weight", "0"]).is_err());
        assert!(Cli::try_parse_from(["logscan", "--max-weight", "11"]).is_err());
        assert!(Cli::try_parse_from(["logscan", "--max-weight", "10"]).is_ok());
    }

    #[test]
    fn test_verbosity_counts() {
        let cli = Cli::try_parse_from(["logscan", "-vv", "--keyword", "error,fail"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.scan.inline_keywords, vec!["error", "fail"]);
    }
}
