use chrono::{DateTime, TimeZone};
use std::fmt::Display;

use super::Report;

const STYLE: &str = r#"
        body { font-family: Arial, sans-serif; margin: 20px; }
        table { border-collapse: collapse; width: 100%; }
        th, td { border: 1px solid #dddddd; text-align: left; padding: 8px; }
        th { background-color: #f2f2f2; }
        tr:nth-child(even) { background-color: #f9f9f9; }
        tr:hover { background-color: #f1f1f1; }
        td.content { font-family: monospace; white-space: pre-wrap; }"#;

/// Render the report as a standalone HTML page
pub fn render<Tz>(report: &Report, generated_at: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut rows = String::new();
    for line in &report.lines {
        rows.push_str(&format!(
            r#"
        <tr>
            <td>{}</td>
            <td>{}</td>
            <td class="content">{}</td>
            <td>{}</td>
        </tr>"#,
            escape(&line.path.display().to_string()),
            line.line_number,
            escape(&line.text),
            line.score
        ));
    }

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>LogScan Report</title>
    <style>{STYLE}
    </style>
</head>
<body>
    <h1>LogScan Report</h1>
    <p>Generated on {generated}</p>
    <p>{flagged} flagged line(s) across {files} file(s)</p>
    <table>
        <tr>
            <th>File</th>
            <th>Line Number</th>
            <th>Content</th>
            <th>Importance</th>
        </tr>{rows}
    </table>
</body>
</html>
"#,
        generated = generated_at.format("%Y-%m-%d %H:%M:%S"),
        flagged = report.len(),
        files = report.files_scanned,
    )
}

/// Escape text for use inside HTML element content
fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
