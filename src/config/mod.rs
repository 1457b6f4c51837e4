//! Configuration management for logscan
//!
//! Settings are layered with figment (embedded defaults, user config, project
//! config, environment) and extracted into the typed structures below. CLI
//! flags are applied on top by the caller.

mod core;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::report::ReportFormat;

/// Main configuration structure for logscan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogscanConfig {
    pub scan: ScanConfig,
    pub parallel: ParallelConfig,
    pub report: ReportConfig,
}

/// What to scan and how lines are scored
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Keyword file with one `keyword = weight` entry per line
    pub keywords: PathBuf,

    pub ignore_case: bool,

    /// Cap on the score of any single line
    pub max_weight: u32,

    pub exclude_keywords: Vec<String>,

    /// Log files scanned when none are given on the command line
    pub log_files: Vec<PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            keywords: PathBuf::from("keywords.txt"),
            ignore_case: false,
            max_weight: 10,
            exclude_keywords: Vec::new(),
            log_files: Vec::new(),
        }
    }
}

/// Worker pool sizing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParallelConfig {
    /// Maximum number of worker threads (0 = auto-detect)
    pub max_threads: usize,
    /// Percentage of CPU cores to use (1-100)
    pub thread_percentage: u8,
    /// Files with fewer lines are scored without spawning workers
    pub min_lines_for_parallel: usize,
    /// Channel buffer size multiplier (buffer = workers * multiplier)
    pub channel_buffer_multiplier: usize,
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            max_threads: 0,
            thread_percentage: 75,
            min_lines_for_parallel: 256,
            channel_buffer_multiplier: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub output_file: PathBuf,
    pub format: ReportFormat,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_file: PathBuf::from("output.html"),
            format: ReportFormat::Html,
        }
    }
}
