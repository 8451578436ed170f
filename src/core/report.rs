// LogTally - core/report.rs
//
// Deterministic plain-text rendering of per-file tallies and totals.
// Core layer: returns a String; display, copy, or persistence is the
// caller's business.

use crate::core::model::Dialect;
use crate::core::tally::{Analysis, MessageTally, OutcomeTally, StatusTally, Tally};
use crate::util::constants;
use std::path::Path;

/// Result of one analysis run, tagged by the tally shape its dialect uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Status(Analysis<StatusTally>),
    Message {
        dialect: Dialect,
        analysis: Analysis<MessageTally>,
    },
    Outcome(Analysis<OutcomeTally>),
}

impl Report {
    /// Dialect the report was produced for.
    pub fn dialect(&self) -> Dialect {
        match self {
            Report::Status(_) => Dialect::StatusOnly,
            Report::Message { dialect, .. } => *dialect,
            Report::Outcome(_) => Dialect::CsvOutcome,
        }
    }

    /// Number of files the report covers.
    pub fn file_count(&self) -> usize {
        match self {
            Report::Status(a) => a.files().len(),
            Report::Message { analysis, .. } => analysis.files().len(),
            Report::Outcome(a) => a.files().len(),
        }
    }

    /// Render the report text.
    pub fn render(&self) -> String {
        match self {
            Report::Status(a) => render_status(a),
            Report::Message { analysis, .. } => render_messages(analysis),
            Report::Outcome(a) => render_outcomes(a),
        }
    }
}

/// Name shown for a file: its final path component, or the whole path when
/// there is none.
pub fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn finish(lines: Vec<String>) -> String {
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

fn message_line(message: &str, count: usize, empty_label: &str) -> String {
    let times = plural(count, "time", "times");
    if message.is_empty() {
        format!("      {empty_label} — {times}")
    } else {
        format!("      \"{message}\" — {times}")
    }
}

// =============================================================================
// Status-only
// =============================================================================

fn status_lines(lines: &mut Vec<String>, tally: &StatusTally) {
    for (code, count) in &tally.counts {
        lines.push(format!("  {code}: {count}"));
    }
}

/// Render status-only tallies: codes ascending, one line each.
pub fn render_status(analysis: &Analysis<StatusTally>) -> String {
    if analysis.files().is_empty() {
        return finish(vec![constants::NO_LOG_FILES_REPORT.to_string()]);
    }

    let mut lines = Vec::new();
    for file in analysis.files() {
        lines.push(format!("File: {}", display_name(&file.path)));
        if file.tally.is_empty() {
            lines.push("  No HttpStatus codes found.".to_string());
        } else {
            status_lines(&mut lines, &file.tally);
        }
        lines.push(String::new());
    }

    lines.push("TOTAL (all files):".to_string());
    if analysis.total().is_empty() {
        lines.push("  No HttpStatus codes found in any file.".to_string());
    } else {
        status_lines(&mut lines, analysis.total());
    }
    finish(lines)
}

// =============================================================================
// Status + message
// =============================================================================

fn message_tally_lines(lines: &mut Vec<String>, tally: &MessageTally) {
    for (code, group) in &tally.codes {
        lines.push(format!(
            "  {code}: {}",
            plural(group.count, "occurrence", "occurrences")
        ));
        for (message, count) in &group.messages {
            lines.push(message_line(message, *count, "(no error message)"));
        }
    }
}

/// Render status+message tallies: codes ascending, messages in first-seen
/// order beneath each code.
pub fn render_messages(analysis: &Analysis<MessageTally>) -> String {
    if analysis.files().is_empty() {
        return finish(vec![constants::NO_LOG_FILES_REPORT.to_string()]);
    }

    let mut lines = Vec::new();
    for file in analysis.files() {
        lines.push(format!("File: {}", display_name(&file.path)));
        if file.tally.is_empty() {
            lines.push("  No HttpStatus codes found.".to_string());
        } else {
            message_tally_lines(&mut lines, &file.tally);
        }
        lines.push(String::new());
    }

    lines.push("TOTAL (across all files):".to_string());
    if analysis.total().is_empty() {
        lines.push("  No HttpStatus codes found in any file.".to_string());
    } else {
        message_tally_lines(&mut lines, analysis.total());
    }
    finish(lines)
}

// =============================================================================
// CSV outcome
// =============================================================================

fn outcome_lines(lines: &mut Vec<String>, tally: &OutcomeTally) {
    lines.push(format!("  Success True: {}", tally.true_count));
    lines.push(format!("  Success False: {}", tally.false_count));
    if tally.false_count > 0 {
        for (message, count) in tally.ranked_false_messages() {
            lines.push(message_line(message, count, "(no msg)"));
        }
    }
}

/// Render success/failure tallies: failure messages by descending count, then
/// ascending text.
pub fn render_outcomes(analysis: &Analysis<OutcomeTally>) -> String {
    if analysis.files().is_empty() {
        return finish(vec![constants::NO_CSV_FILES_REPORT.to_string()]);
    }

    let mut lines = Vec::new();
    for file in analysis.files() {
        lines.push(format!("File: {}", display_name(&file.path)));
        outcome_lines(&mut lines, &file.tally);
        lines.push(String::new());
    }

    lines.push("TOTAL (across all files):".to_string());
    outcome_lines(&mut lines, analysis.total());
    finish(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{ApiRecord, LogRecord};
    use crate::core::tally::aggregate;
    use std::path::PathBuf;

    fn log(code: u16, message: &str) -> LogRecord {
        LogRecord {
            status_code: code,
            message: message.to_string(),
        }
    }

    fn api(success: bool, message: &str) -> ApiRecord {
        ApiRecord {
            success,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_status_report_layout() {
        let analysis = aggregate::<StatusTally>(vec![
            (
                PathBuf::from("/var/log/app/first.txt"),
                vec![log(404, ""), log(200, ""), log(200, "")],
            ),
            (PathBuf::from("second.txt"), vec![]),
        ]);
        let expected = "\
File: first.txt
  200: 2
  404: 1

File: second.txt
  No HttpStatus codes found.

TOTAL (all files):
  200: 2
  404: 1
";
        assert_eq!(render_status(&analysis), expected);
    }

    #[test]
    fn test_status_report_empty_total() {
        let analysis = aggregate::<StatusTally>(vec![(PathBuf::from("quiet.txt"), vec![])]);
        assert!(render_status(&analysis)
            .ends_with("TOTAL (all files):\n  No HttpStatus codes found in any file.\n"));
    }

    #[test]
    fn test_message_report_layout() {
        let analysis = aggregate::<MessageTally>(vec![(
            PathBuf::from("mobile.txt"),
            vec![
                log(500, "Internal error"),
                log(401, "User not authorised"),
                log(500, ""),
                log(500, "Internal error"),
            ],
        )]);
        let expected = "\
File: mobile.txt
  401: 1 occurrence
      \"User not authorised\" — 1 time
  500: 3 occurrences
      \"Internal error\" — 2 times
      (no error message) — 1 time

TOTAL (across all files):
  401: 1 occurrence
      \"User not authorised\" — 1 time
  500: 3 occurrences
      \"Internal error\" — 2 times
      (no error message) — 1 time
";
        assert_eq!(render_messages(&analysis), expected);
    }

    #[test]
    fn test_outcome_report_layout() {
        let analysis = aggregate::<OutcomeTally>(vec![
            (
                PathBuf::from("api_1.csv"),
                vec![
                    api(true, ""),
                    api(false, "Timeout waiting for upstream"),
                    api(false, ""),
                    api(false, "Disk full"),
                    api(false, "Disk full"),
                ],
            ),
            (PathBuf::from("api_2.csv"), vec![api(true, "ok")]),
        ]);
        let expected = "\
File: api_1.csv
  Success True: 1
  Success False: 4
      \"Disk full\" — 2 times
      (no msg) — 1 time
      \"Timeout waiting for upstream\" — 1 time

File: api_2.csv
  Success True: 1
  Success False: 0

TOTAL (across all files):
  Success True: 2
  Success False: 4
      \"Disk full\" — 2 times
      (no msg) — 1 time
      \"Timeout waiting for upstream\" — 1 time
";
        assert_eq!(render_outcomes(&analysis), expected);
    }

    #[test]
    fn test_no_files_reports() {
        assert_eq!(
            Report::Status(aggregate(Vec::new())).render(),
            "No log files analyzed.\n"
        );
        assert_eq!(
            Report::Message {
                dialect: Dialect::JsonMessage,
                analysis: aggregate(Vec::new()),
            }
            .render(),
            "No log files analyzed.\n"
        );
        assert_eq!(
            Report::Outcome(aggregate(Vec::new())).render(),
            "No API CSV files analyzed.\n"
        );
    }

    #[test]
    fn test_display_name_strips_directories() {
        assert_eq!(display_name(Path::new("a/b/c.log")), "c.log");
        assert_eq!(display_name(Path::new("c.log")), "c.log");
        assert_eq!(display_name(Path::new("/")), "/");
    }

    #[test]
    fn test_report_dialect_and_file_count() {
        let report = Report::Message {
            dialect: Dialect::InlineMessage,
            analysis: aggregate(vec![(PathBuf::from("x"), vec![log(200, "")])]),
        };
        assert_eq!(report.dialect(), Dialect::InlineMessage);
        assert_eq!(report.file_count(), 1);
    }
}
