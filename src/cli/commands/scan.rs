use anyhow::{Result, bail};
use clap::Args;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::cli::Output;
use crate::config::LogscanConfig;
use crate::report::{self, ReportFormat};
use crate::rules::{self, Rule};
use crate::scanner::{ScanOptions, Scanner};

#[derive(Args, Debug, Default)]
pub struct ScanArgs {
    /// Keyword file: one keyword per line, optionally `keyword = weight`
    #[arg(short = 'k', long, value_name = "FILE")]
    pub keywords: Option<PathBuf>,

    /// Inline keywords with weight 1 (comma-separated or repeated)
    #[arg(long = "keyword", value_delimiter = ',', value_name = "WORD")]
    pub inline_keywords: Vec<String>,

    /// Ignore case when searching for keywords
    #[arg(short = 'i', long)]
    pub ignore_case: bool,

    /// Where to save the report
    #[arg(short = 'o', long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Display a summary of the results
    #[arg(short, long)]
    pub summary: bool,

    /// Maximum importance of any single log line, 1-10
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=10))]
    pub max_weight: Option<u32>,

    /// Log files to scan (defaults to the configured system logs)
    #[arg(long, num_args = 1.., value_name = "PATH")]
    pub log_files: Vec<PathBuf>,

    /// Keywords to leave out of this scan
    #[arg(long, num_args = 1.., value_name = "WORD")]
    pub exclude_keywords: Vec<String>,

    /// Report format
    #[arg(long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Maximum number of worker threads
    #[arg(long, value_name = "N")]
    pub threads: Option<usize>,
}

impl ScanArgs {
    /// Apply command-line overrides on top of the loaded configuration
    fn apply_to(&self, config: &mut LogscanConfig) {
        if self.ignore_case {
            config.scan.ignore_case = true;
        }
        if let Some(max_weight) = self.max_weight {
            config.scan.max_weight = max_weight;
        }
        if !self.log_files.is_empty() {
            config.scan.log_files = self.log_files.clone();
        }
        config
            .scan
            .exclude_keywords
            .extend(self.exclude_keywords.iter().cloned());
        if let Some(output_file) = &self.output_file {
            config.report.output_file = output_file.clone();
        }
        if let Some(format) = self.format {
            config.report.format = format;
        }
        if let Some(threads) = self.threads {
            config.parallel.max_threads = threads;
            config.parallel.thread_percentage = 100;
        }
    }

    /// Keyword file rules first, then inline keywords
    ///
    /// The configured keyword file is only used when neither `--keywords`
    /// nor `--keyword` was given.
    fn load_rules(&self, config: &LogscanConfig) -> Result<Vec<Rule>> {
        let keyword_file = match (&self.keywords, self.inline_keywords.is_empty()) {
            (Some(path), _) => Some(path.as_path()),
            (None, true) => Some(config.scan.keywords.as_path()),
            (None, false) => None,
        };

        let mut loaded = match keyword_file {
            Some(path) => rules::load_keyword_file(path)?,
            None => Vec::new(),
        };
        for rule in rules::rules_from_keywords(&self.inline_keywords) {
            rules::push_rule(&mut loaded, rule);
        }
        Ok(loaded)
    }
}

pub fn execute(args: ScanArgs, output: &Output, config_path: Option<&Path>) -> Result<()> {
    let mut config = LogscanConfig::load_with_custom_config(config_path)?;
    args.apply_to(&mut config);

    let rules = args.load_rules(&config)?;
    if rules.is_empty() {
        bail!("No keywords loaded; pass --keywords FILE or --keyword WORD");
    }

    let options = ScanOptions::new(
        config.scan.ignore_case,
        config.scan.max_weight,
        config.scan.exclude_keywords.iter().cloned(),
    )?;

    output.banner();

    let scanner = Scanner::new(&rules, &options, config.parallel.clone());
    if scanner.scorer().rule_count() == 0 {
        bail!("Every keyword was excluded or invalid; nothing to scan for");
    }

    let paths = &config.scan.log_files;
    if paths.is_empty() {
        bail!("No log files to scan; pass --log-files or set scan.log_files");
    }

    let start_time = Instant::now();
    let report = scan_report(&scanner, paths);
    tracing::info!(
        "Scanned {} file(s), {} line(s) in {:.2}s",
        report.files_scanned,
        report.lines_read,
        start_time.elapsed().as_secs_f64()
    );

    if report.is_empty() {
        output.success("Everything looks good! No flagged activity detected.");
    } else {
        let format = config.report.format;
        let output_file = &config.report.output_file;
        match format {
            ReportFormat::Console => output.warning(&format!(
                "Flagged activity found in {} line(s).",
                report.len()
            )),
            _ => {
                report::write_report(&report, format, output_file)?;
                output.warning(&format!(
                    "Flagged activity found and saved to {}.",
                    output_file.display()
                ));
            }
        }

        if output.is_verbose() || format == ReportFormat::Console {
            output.flagged_lines(&report);
        }
    }

    if args.summary {
        output.summary(&report);
    }

    Ok(())
}

/// Scan every path and rank the results; rule warnings lead the list
fn scan_report(scanner: &Scanner, paths: &[PathBuf]) -> report::Report {
    let mut report = report::aggregate(scanner.scan_paths(paths));
    let mut warnings = scanner.rule_warnings().to_vec();
    warnings.append(&mut report.warnings);
    report.warnings = warnings;
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::WarningCategory;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_cli_overrides_config() {
        let mut config = LogscanConfig::default();
        config.scan.exclude_keywords = vec!["debug".to_string()];

        let args = ScanArgs {
            ignore_case: true,
            max_weight: Some(4),
            log_files: vec![PathBuf::from("app.log")],
            exclude_keywords: vec!["info".to_string()],
            format: Some(ReportFormat::Json),
            threads: Some(3),
            ..ScanArgs::default()
        };
        args.apply_to(&mut config);

        assert!(config.scan.ignore_case);
        assert_eq!(config.scan.max_weight, 4);
        assert_eq!(config.scan.log_files, vec![PathBuf::from("app.log")]);
        assert_eq!(config.scan.exclude_keywords, vec!["debug", "info"]);
        assert_eq!(config.report.format, ReportFormat::Json);
        assert_eq!(config.parallel.max_threads, 3);
    }

    #[test]
    fn test_inline_keywords_skip_default_file() {
        let config = LogscanConfig::default();
        let args = ScanArgs {
            inline_keywords: vec!["error".to_string(), "attack".to_string()],
            ..ScanArgs::default()
        };

        let rules = args.load_rules(&config).unwrap();
        assert_eq!(rules, vec![Rule::keyword("error"), Rule::keyword("attack")]);
    }

    #[test]
    fn test_keyword_file_and_inline_keywords_merge() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("keywords.txt");
        fs::write(&path, "error = 2\nattack = 5\n").unwrap();

        let args = ScanArgs {
            keywords: Some(path),
            inline_keywords: vec!["error".to_string(), "sudo".to_string()],
            ..ScanArgs::default()
        };

        let rules = args.load_rules(&LogscanConfig::default()).unwrap();
        assert_eq!(
            rules,
            vec![Rule::new("error", 1), Rule::new("attack", 5), Rule::keyword("sudo")]
        );
    }

    #[test]
    fn test_report_carries_rule_warnings() {
        let temp_dir = TempDir::new().unwrap();
        let log = temp_dir.path().join("app.log");
        fs::write(&log, "system error detected\n").unwrap();

        let rules = vec![Rule::new("", 3), Rule::new("error", 2)];
        let scanner = Scanner::new(
            &rules,
            &ScanOptions::default(),
            crate::config::ParallelConfig::default(),
        );
        let missing = temp_dir.path().join("missing.log");
        let report = scan_report(&scanner, &[log, missing]);

        assert_eq!(report.len(), 1);
        let categories: Vec<WarningCategory> =
            report.warnings.iter().map(|w| w.category).collect();
        assert_eq!(
            categories,
            vec![WarningCategory::InvalidRule, WarningCategory::FileNotFound]
        );
    }
}
