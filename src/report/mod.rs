//! Report aggregation and export
//!
//! [`aggregate`] merges per-file scan results into one ranked [`Report`].
//! The `html` and `json` submodules turn a report into files on disk.

pub mod html;
pub mod json;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::scanner::{ScanResult, ScoredLine, Warning};

/// Report file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Standalone HTML table
    Html,
    /// Machine-readable JSON
    Json,
    /// Print flagged lines, write no file
    Console,
}

/// Every flagged line of a run, highest score first
#[derive(Debug, Default, Clone, Serialize)]
pub struct Report {
    pub lines: Vec<ScoredLine>,
    pub files_scanned: usize,
    pub lines_read: usize,
    pub warnings: Vec<Warning>,
}

impl Report {
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Concatenate results in the given order and rank by descending score
///
/// The sort is stable: equal scores keep file order, then line order.
pub fn aggregate<I>(results: I) -> Report
where
    I: IntoIterator<Item = ScanResult>,
{
    let mut report = Report::default();

    for result in results {
        report.files_scanned += 1;
        report.lines_read += result.stats.lines_read;
        report.lines.extend(result.lines);
        report.warnings.extend(result.warnings);
    }

    report.lines.sort_by(|a, b| b.score.cmp(&a.score));
    report
}

/// Write `report` to `path` in the requested format
pub fn write_report(report: &Report, format: ReportFormat, path: &Path) -> Result<()> {
    let content = match format {
        ReportFormat::Html => html::render(report, chrono::Local::now()),
        ReportFormat::Json => json::render(report)?,
        ReportFormat::Console => return Ok(()),
    };

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    tracing::info!("Report written to {}", path.display());
    Ok(())
}
