use anyhow::Result;
use serde_json::json;

use super::Report;

/// Render a report as pretty-printed JSON
pub fn render(report: &Report) -> Result<String> {
    let value = json!({
        "report_metadata": {
            "generated_at": chrono::Local::now().to_rfc3339(),
            "logscan_version": crate::VERSION,
            "files_scanned": report.files_scanned,
            "lines_read": report.lines_read,
        },
        "summary": {
            "flagged_lines": report.len(),
            "warnings": report.warnings.len(),
        },
        "flagged": report.lines.iter().map(|l| json!({
            "file": l.path.display().to_string(),
            "line": l.line_number,
            "content": l.text,
            "importance": l.score,
        })).collect::<Vec<_>>(),
        "warnings": report.warnings,
    });

    Ok(serde_json::to_string_pretty(&value)?)
}
