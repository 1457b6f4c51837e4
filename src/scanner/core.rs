use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::Instant;

use super::score::LineScorer;
use super::types::{ScanOptions, ScanResult, ScoredLine, Warning, WarningCategory};
use crate::config::ParallelConfig;
use crate::parallel::{ExecutionStrategy, WorkResult};
use crate::rules::Rule;

/// Scans log files and collects every line with a non-zero score
#[derive(Debug, Clone)]
pub struct Scanner {
    scorer: LineScorer,
    parallel: ParallelConfig,
    rule_warnings: Vec<Warning>,
}

/// Lines read from one file, before scoring
#[derive(Debug, Default)]
struct LineBatch {
    /// (1-based line number, text without trailing whitespace)
    lines: Vec<(usize, String)>,
    lines_read: usize,
    undecodable: Vec<usize>,
    read_error: Option<io::Error>,
}

impl Scanner {
    pub fn new(rules: &[Rule], options: &ScanOptions, parallel: ParallelConfig) -> Self {
        let (scorer, rule_warnings) = LineScorer::new(rules, options);
        tracing::debug!(
            "Scanner ready with {} of {} rules (max weight {})",
            scorer.rule_count(),
            rules.len(),
            scorer.max_weight()
        );
        Self {
            scorer,
            parallel,
            rule_warnings,
        }
    }

    pub fn scorer(&self) -> &LineScorer {
        &self.scorer
    }

    /// Warnings produced while compiling the rules, reported once per run
    pub fn rule_warnings(&self) -> &[Warning] {
        &self.rule_warnings
    }

    /// Scan each path in order; a failing file never stops the others
    pub fn scan_paths(&self, paths: &[PathBuf]) -> Vec<ScanResult> {
        paths.iter().map(|path| self.scan(path)).collect()
    }

    /// Scan a single log file
    ///
    /// Missing or unreadable files produce an empty result carrying one
    /// warning. Lines that are not valid UTF-8 are skipped.
    pub fn scan(&self, path: &Path) -> ScanResult {
        let start_time = Instant::now();
        let mut result = ScanResult::empty(path);

        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                result.warnings.push(open_failure(path, &e));
                return result;
            }
        };

        let batch = read_lines(BufReader::new(file));
        result.stats.lines_read = batch.lines_read;
        result.stats.lines_skipped = batch.undecodable.len();

        if !batch.undecodable.is_empty() {
            tracing::warn!(
                "Skipped {} undecodable line(s) in {} (first at line {})",
                batch.undecodable.len(),
                path.display(),
                batch.undecodable[0]
            );
            result.warnings.push(Warning::new(
                WarningCategory::DecodeError,
                format!(
                    "{}: skipped {} line(s) that are not valid UTF-8",
                    path.display(),
                    batch.undecodable.len()
                ),
            ));
        }

        if let Some(e) = &batch.read_error {
            tracing::warn!(
                "Read of {} stopped after line {}: {}",
                path.display(),
                batch.lines_read,
                e
            );
            result.warnings.push(Warning::new(
                WarningCategory::Io,
                format!(
                    "Error reading {} after line {}: {}",
                    path.display(),
                    batch.lines_read,
                    e
                ),
            ));
        }

        self.score_lines(path, batch.lines, &mut result);

        result.stats.lines_flagged = result.lines.len();
        result.stats.scan_duration_ms = start_time.elapsed().as_millis() as u64;
        tracing::debug!(
            "Scanned {}: {} lines, {} flagged in {}ms",
            path.display(),
            result.stats.lines_read,
            result.stats.lines_flagged,
            result.stats.scan_duration_ms
        );
        result
    }

    fn execution_strategy(&self, line_count: usize) -> ExecutionStrategy {
        let workers = ExecutionStrategy::calculate_optimal_workers(
            self.parallel.max_threads,
            self.parallel.thread_percentage,
        );
        ExecutionStrategy::auto(
            line_count,
            self.parallel.min_lines_for_parallel,
            workers,
            self.parallel.channel_buffer_multiplier,
        )
    }

    fn score_lines(&self, path: &Path, lines: Vec<(usize, String)>, result: &mut ScanResult) {
        let strategy = self.execution_strategy(lines.len());
        tracing::trace!("Scoring {} lines of {} with {:?}", lines.len(), path.display(), strategy);

        let scorer = &self.scorer;
        let outcomes = strategy.execute(
            lines,
            |(line_number, text), _worker_id| {
                scorer.score(text).map(|score| ScoredLine {
                    path: path.to_path_buf(),
                    line_number: *line_number,
                    text: text.clone(),
                    score,
                })
            },
            Some(|current: usize, total: usize, worker_id: usize| {
                tracing::trace!("{}: {}/{} lines [worker-{}]", path.display(), current, total, worker_id);
            }),
        );

        let outcomes = match outcomes {
            Ok(outcomes) => outcomes,
            Err(e) => {
                tracing::error!("Scoring {} failed: {}", path.display(), e);
                result.warnings.push(Warning::new(
                    WarningCategory::WorkerFailure,
                    format!("{}: {}", path.display(), e),
                ));
                return;
            }
        };

        collect_outcomes(path, outcomes, result);
    }
}

/// Scan one file with the default worker pool settings
pub fn scan(path: &Path, rules: &[Rule], options: &ScanOptions) -> ScanResult {
    Scanner::new(rules, options, ParallelConfig::default()).scan(path)
}

/// Keep the flagged lines and fold scoring panics into one warning
fn collect_outcomes(
    path: &Path,
    outcomes: Vec<WorkResult<Option<ScoredLine>>>,
    result: &mut ScanResult,
) {
    let mut failures = 0usize;
    let mut first_failure = None;
    for work in outcomes {
        match work.outcome {
            Ok(Some(line)) => result.lines.push(line),
            Ok(None) => {}
            Err(message) => {
                failures += 1;
                first_failure.get_or_insert(message);
            }
        }
    }

    if let Some(message) = first_failure {
        tracing::warn!(
            "{} line(s) of {} could not be scored: {}",
            failures,
            path.display(),
            message
        );
        result.warnings.push(Warning::new(
            WarningCategory::WorkerFailure,
            format!(
                "{}: {} line(s) could not be scored ({})",
                path.display(),
                failures,
                message
            ),
        ));
    }
}

fn open_failure(path: &Path, error: &io::Error) -> Warning {
    match error.kind() {
        io::ErrorKind::NotFound => {
            tracing::warn!("Log file not found at {}", path.display());
            Warning::new(
                WarningCategory::FileNotFound,
                format!("Log file not found at {}", path.display()),
            )
        }
        io::ErrorKind::PermissionDenied => {
            tracing::error!("Permission denied to access {}", path.display());
            Warning::new(
                WarningCategory::PermissionDenied,
                format!("Permission denied to access {}", path.display()),
            )
        }
        _ => {
            tracing::error!("Error opening {}: {}", path.display(), error);
            Warning::new(
                WarningCategory::Io,
                format!("Error opening {}: {}", path.display(), error),
            )
        }
    }
}

/// Read lines as raw bytes so one bad line does not end the file
fn read_lines<R: BufRead>(mut reader: R) -> LineBatch {
    let mut batch = LineBatch::default();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf) {
            Ok(0) => break,
            Ok(_) => {
                batch.lines_read += 1;
                let line_number = batch.lines_read;
                match std::str::from_utf8(&buf) {
                    Ok(text) => {
                        let text = text.trim_end();
                        if !text.is_empty() {
                            batch.lines.push((line_number, text.to_string()));
                        }
                    }
                    Err(_) => batch.undecodable.push(line_number),
                }
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                batch.read_error = Some(e);
                break;
            }
        }
    }

    batch
}
