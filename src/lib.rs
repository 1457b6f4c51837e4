//! # LogScan - weighted keyword scanning for log files
//!
//! LogScan reads log files line by line, scores every line against an
//! ordered list of weighted keyword rules and reports the flagged lines,
//! most important first.
//!
//! - **Whole-word matching**: keywords never match inside a larger token
//! - **Bounded scores**: each line's score is capped at a configured maximum
//! - **Parallel scoring**: lines are fanned out to a bounded worker pool
//! - **Fault isolation**: a missing file or a bad line never ends the run
//!
//! ## Library usage
//!
//! ```rust,no_run
//! use logscan::report::aggregate;
//! use logscan::rules::Rule;
//! use logscan::scanner::{ScanOptions, scan};
//! use std::path::Path;
//!
//! let rules = vec![Rule::new("error", 2), Rule::new("attack", 5)];
//! let options = ScanOptions::new(true, 10, ["debug"])?;
//!
//! let results = ["/var/log/syslog", "/var/log/auth.log"]
//!     .iter()
//!     .map(|p| scan(Path::new(p), &rules, &options));
//! let report = aggregate(results);
//!
//! for line in &report.lines {
//!     println!("{}:{} [{}] {}", line.path.display(), line.line_number, line.score, line.text);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod parallel;
pub mod report;
pub mod rules;
pub mod scanner;

pub use config::LogscanConfig;
pub use report::{Report, aggregate};
pub use rules::Rule;
pub use scanner::{ScanOptions, ScanResult, Scanner, ScoredLine, scan};

/// Result type alias for logscan operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
