// LogTally - app/analysis.rs
//
// Batch orchestration: read every input file in order, tally the records,
// and produce the report. Each call is independent; nothing is kept between
// runs.
//
// A file that cannot be read contributes an empty tally. Its error is logged
// and returned alongside the report, never raised.

use crate::app::reader;
use crate::core::model::Dialect;
use crate::core::report::Report;
use crate::core::tally::aggregate;
use crate::util::constants;
use crate::util::error::ReadError;
use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

/// Parameters of one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub dialect: Dialect,
    pub csv_delimiter: u8,
}

impl AnalysisOptions {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            csv_delimiter: constants::DEFAULT_CSV_DELIMITER,
        }
    }
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self::new(Dialect::default())
    }
}

/// Outcome of one analysis run.
#[derive(Debug)]
pub struct AnalysisRun {
    /// Tallies for every supplied file (failed files included, empty).
    pub report: Report,
    /// Files that could not be read, in input order.
    pub failures: Vec<ReadError>,
}

impl AnalysisRun {
    /// Render the report text.
    pub fn render(&self) -> String {
        self.report.render()
    }
}

/// Lexical form used to spot repeated inputs: `.` components are dropped so
/// `./a.txt` and `a.txt` compare equal. The filesystem is not consulted.
fn normalise(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

/// Drop repeated paths, keeping each at its first position (and in the form
/// it was first given).
fn unique_paths(paths: &[PathBuf]) -> Vec<&Path> {
    let mut seen = HashSet::new();
    paths
        .iter()
        .filter(|p| {
            let fresh = seen.insert(normalise(p));
            if !fresh {
                tracing::debug!(file = %p.display(), "Skipping repeated input path");
            }
            fresh
        })
        .map(PathBuf::as_path)
        .collect()
}

/// Read every path with `read`, substituting an empty record list (and
/// recording the error) for any file that fails.
fn collect_records<R>(
    paths: &[&Path],
    failures: &mut Vec<ReadError>,
    read: impl Fn(&Path) -> Result<Vec<R>, ReadError>,
) -> Vec<(PathBuf, Vec<R>)> {
    paths
        .iter()
        .map(|path| {
            let records = match read(path) {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "Skipping unreadable file");
                    failures.push(e);
                    Vec::new()
                }
            };
            (path.to_path_buf(), records)
        })
        .collect()
}

/// Analyse `paths` (in the given order) under `options`.
///
/// An empty path list yields the dialect's "no files analyzed" report.
pub fn analyze(paths: &[PathBuf], options: &AnalysisOptions) -> AnalysisRun {
    let paths = unique_paths(paths);
    let mut failures = Vec::new();
    let dialect = options.dialect;

    tracing::debug!(files = paths.len(), %dialect, "Analysis started");

    let report = match dialect {
        Dialect::StatusOnly => Report::Status(aggregate(collect_records(
            &paths,
            &mut failures,
            |p| reader::read_log_records(p, dialect),
        ))),
        Dialect::InlineMessage | Dialect::JsonMessage => Report::Message {
            dialect,
            analysis: aggregate(collect_records(&paths, &mut failures, |p| {
                reader::read_log_records(p, dialect)
            })),
        },
        Dialect::CsvOutcome => Report::Outcome(aggregate(collect_records(
            &paths,
            &mut failures,
            |p| reader::read_api_records(p, options.csv_delimiter),
        ))),
    };

    tracing::info!(
        files = paths.len(),
        failed = failures.len(),
        %dialect,
        "Analysis complete"
    );

    AnalysisRun { report, failures }
}
