//! Console output for logscan
//!
//! Status messages go to stdout and honour `--quiet`; errors always go to
//! stderr.

use console::style;

use crate::report::Report;
use crate::scanner::ScoredLine;

const BANNER: &str = r#"
██╗      ██████╗  ██████╗ ███████╗ ██████╗ █████╗ ███╗   ██╗
██║     ██╔═══██╗██╔════╝ ██╔════╝██╔════╝██╔══██╗████╗  ██║
██║     ██║   ██║██║  ███╗███████╗██║     ███████║██╔██╗ ██║
██║     ██║   ██║██║   ██║╚════██║██║     ██╔══██║██║╚██╗██║
███████╗╚██████╔╝╚██████╔╝███████║╚██████╗██║  ██║██║ ╚████║
╚══════╝ ╚═════╝  ╚═════╝ ╚══════╝ ╚═════╝╚═╝  ╚═╝╚═╝  ╚═══╝
"#;

/// Output handler for consistent CLI formatting
pub struct Output {
    verbose: bool,
    quiet: bool,
}

impl Output {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self { verbose, quiet }
    }

    pub fn banner(&self) {
        if !self.quiet {
            println!("{}", style(BANNER).blue());
            println!("{}\n", style(format!("Version {}", crate::VERSION)).blue());
        }
    }

    pub fn success(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("✔").green(), message);
        }
    }

    /// Errors are always shown, even in quiet mode
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✖").red(), message);
    }

    pub fn warning(&self, message: &str) {
        if !self.quiet {
            println!("{} {}", style("⚠").yellow(), message);
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// One flagged line as `path:line [score] text`
    pub fn flagged_line(&self, line: &ScoredLine) {
        if self.quiet {
            return;
        }
        let score = match line.score {
            s if s >= 8 => style(format!("[{s:>2}]")).red().bold(),
            s if s >= 4 => style(format!("[{s:>2}]")).yellow().bold(),
            s => style(format!("[{s:>2}]")).dim(),
        };
        println!(
            "  {} {}:{} {}",
            score,
            style(line.path.display()).underlined(),
            style(line.line_number).yellow(),
            line.text
        );
    }

    pub fn flagged_lines(&self, report: &Report) {
        for line in &report.lines {
            self.flagged_line(line);
        }
    }

    /// Printed even in quiet mode
    pub fn summary(&self, report: &Report) {
        println!(
            "\n{} {} lines flagged.",
            style("Summary:").bold(),
            style(report.len()).bold()
        );
    }
}
