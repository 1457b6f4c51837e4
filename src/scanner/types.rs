use anyhow::{Result, ensure};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Options for a single scan invocation
///
/// Fields are read-only once constructed; every worker shares the same
/// instance for the whole scan.
#[derive(Debug, Clone)]
pub struct ScanOptions {
    ignore_case: bool,
    max_weight: u32,
    excluded_keywords: HashSet<String>,
}

impl ScanOptions {
    pub fn new<I, S>(ignore_case: bool, max_weight: u32, excluded_keywords: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ensure!(max_weight > 0, "max weight must be greater than zero");
        Ok(Self {
            ignore_case,
            max_weight,
            excluded_keywords: excluded_keywords.into_iter().map(Into::into).collect(),
        })
    }

    pub fn ignore_case(&self) -> bool {
        self.ignore_case
    }

    pub fn max_weight(&self) -> u32 {
        self.max_weight
    }

    pub fn is_excluded(&self, keyword: &str) -> bool {
        self.excluded_keywords.contains(keyword)
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            ignore_case: false,
            max_weight: 10,
            excluded_keywords: HashSet::new(),
        }
    }
}

/// A log line whose importance score is above zero
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoredLine {
    pub path: PathBuf,
    pub line_number: usize,
    pub text: String,
    pub score: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WarningCategory {
    FileNotFound,
    PermissionDenied,
    DecodeError,
    InvalidRule,
    WorkerFailure,
    Io,
}

/// Recoverable problem met while loading rules or scanning a file
#[derive(Debug, Clone, Serialize)]
pub struct Warning {
    pub message: String,
    pub category: WarningCategory,
}

impl Warning {
    pub fn new(category: WarningCategory, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            category,
        }
    }
}

/// Statistics for one scanned file
#[derive(Debug, Default, Clone, Serialize)]
pub struct ScanStats {
    pub lines_read: usize,
    pub lines_skipped: usize,
    pub lines_flagged: usize,
    pub scan_duration_ms: u64,
}

/// Flagged lines for one file, plus anything that went wrong along the way
#[derive(Debug, Clone)]
pub struct ScanResult {
    pub path: PathBuf,
    pub lines: Vec<ScoredLine>,
    pub warnings: Vec<Warning>,
    pub stats: ScanStats,
}

impl ScanResult {
    pub fn empty(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
            lines: Vec::new(),
            warnings: Vec::new(),
            stats: ScanStats::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
