// LogTally - tests/e2e_analysis.rs
//
// End-to-end tests for the read -> extract -> tally -> render pipeline.
//
// These tests exercise the real filesystem and the public library surface
// with on-disk fixtures; no mocks, no stubs.

use logtally::app::analysis::{analyze, AnalysisOptions};
use logtally::core::export::{export_csv, export_json};
use logtally::core::model::Dialect;
use logtally::core::report::Report;
use logtally::core::tally::Tally;
use logtally::util::error::ReadError;
use std::fs;
use std::path::{Path, PathBuf};

// =============================================================================
// Helpers
// =============================================================================

/// Absolute path to the on-disk fixture files.
fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

// =============================================================================
// Fixture reports
// =============================================================================

#[test]
fn e2e_status_fixture_report() {
    let run = analyze(
        &[fixture("mobile_status.txt")],
        &AnalysisOptions::new(Dialect::StatusOnly),
    );
    assert!(run.failures.is_empty(), "unexpected failures: {:?}", run.failures);
    assert_eq!(
        run.render(),
        "File: mobile_status.txt\n  200: 3\n  404: 1\n  500: 1\n\n\
         TOTAL (all files):\n  200: 3\n  404: 1\n  500: 1\n"
    );
}

#[test]
fn e2e_inline_fixture_report() {
    let run = analyze(
        &[fixture("mobile_inline.txt")],
        &AnalysisOptions::new(Dialect::InlineMessage),
    );
    let expected_section = "  200: 1 occurrence\n      (no error message) — 1 time\n\
                            \x20 406: 3 occurrences\n      \"Invalid payload format\" — 2 times\n\
                            \x20     \"Missing field 'sku'\" — 1 time\n\
                            \x20 500: 1 occurrence\n      \"Internal error\" — 1 time\n";
    let expected = format!(
        "File: mobile_inline.txt\n{expected_section}\nTOTAL (across all files):\n{expected_section}"
    );
    assert_eq!(run.render(), expected);
}

#[test]
fn e2e_json_fixture_report() {
    let run = analyze(
        &[fixture("mobile_json.txt")],
        &AnalysisOptions::new(Dialect::JsonMessage),
    );
    let text = run.render();

    assert!(
        text.contains("  401: 2 occurrences\n      \"User not authorised\" — 2 times\n"),
        "report:\n{text}"
    );
    assert!(
        text.contains("  413: 1 occurrence\n      \"Payload too large\" — 1 time\n"),
        "report:\n{text}"
    );
    assert!(
        text.contains("  500: 1 occurrence\n      \"Invalid JSON in ErrorMsg: "),
        "malformed JSON should surface as a diagnostic message:\n{text}"
    );
    assert!(text.contains("  200: 1 occurrence\n      (no error message) — 1 time\n"));
}

/// Braces inside strings, a truncated object and a multi-line object followed
/// by more status lines: every status line still yields exactly one record.
#[test]
fn e2e_json_edge_fixture_keeps_every_status_line() {
    let run = analyze(
        &[fixture("mobile_json_edge.txt")],
        &AnalysisOptions::new(Dialect::JsonMessage),
    );
    let section = "  200: 1 occurrence\n      (no error message) — 1 time\n\
                   \x20 400: 2 occurrences\n      \"missing { in body\" — 2 times\n\
                   \x20 401: 1 occurrence\n      \"Token } expired\" — 1 time\n\
                   \x20 500: 1 occurrence\n      \"{\"code\":7}\" — 1 time\n\
                   \x20 502: 1 occurrence\n      (no error message) — 1 time\n";
    assert_eq!(
        run.render(),
        format!("File: mobile_json_edge.txt\n{section}\nTOTAL (across all files):\n{section}")
    );

    // Same number of records as the status-only reading of the file.
    let status = analyze(
        &[fixture("mobile_json_edge.txt")],
        &AnalysisOptions::new(Dialect::StatusOnly),
    );
    let Report::Status(counts) = &status.report else {
        panic!("status dialect should produce a status report");
    };
    assert_eq!(counts.total().counts.values().sum::<usize>(), 6);
}

#[test]
fn e2e_csv_fixture_report() {
    let run = analyze(
        &[fixture("api_log.csv")],
        &AnalysisOptions::new(Dialect::CsvOutcome),
    );
    let section = "  Success True: 2\n  Success False: 4\n\
                   \x20     \"Timeout waiting for upstream\" — 2 times\n\
                   \x20     (no msg) — 1 time\n\
                   \x20     \"Disk full\" — 1 time\n";
    assert_eq!(
        run.render(),
        format!("File: api_log.csv\n{section}\nTOTAL (across all files):\n{section}")
    );
}

// =============================================================================
// Cross-file behaviour
// =============================================================================

/// Two files with overlapping codes: the total sums across them.
#[test]
fn e2e_total_sums_across_files() {
    let dir = tempfile::tempdir().unwrap();
    let first = write(
        dir.path(),
        "first.txt",
        "HttpStatus: 200\nHttpStatus: 200\nHttpStatus: 404\n",
    );
    let second = write(dir.path(), "second.txt", "HttpStatus: 404\nHttpStatus: 500\n");

    let run = analyze(&[first, second], &AnalysisOptions::new(Dialect::StatusOnly));
    let Report::Status(analysis) = &run.report else {
        panic!("status dialect should produce a status report");
    };

    let total: Vec<(u16, usize)> = analysis
        .total()
        .counts
        .iter()
        .map(|(c, n)| (*c, *n))
        .collect();
    assert_eq!(total, vec![(200, 2), (404, 2), (500, 1)]);
    assert!(run
        .render()
        .ends_with("TOTAL (all files):\n  200: 2\n  404: 2\n  500: 1\n"));
}

/// Per-file tallies and totals agree for every key in every dialect.
#[test]
fn e2e_total_invariant_holds_for_csv() {
    let dir = tempfile::tempdir().unwrap();
    let a = write(dir.path(), "a.csv", "success;msg\nfalse;x\nfalse;y\ntrue;\n");
    let b = write(dir.path(), "b.csv", "msg;success\nx;false\n;false\n");

    let run = analyze(&[a, b], &AnalysisOptions::new(Dialect::CsvOutcome));
    let Report::Outcome(analysis) = &run.report else {
        panic!("csv dialect should produce an outcome report");
    };

    let mut summed = logtally::core::tally::OutcomeTally::default();
    for file in analysis.files() {
        summed.merge(&file.tally);
    }
    assert_eq!(&summed, analysis.total());
    assert_eq!(analysis.total().false_count, 4);
    assert_eq!(analysis.total().false_messages["x"], 2);
}

/// Analysing the same files twice gives identical output.
#[test]
fn e2e_analysis_is_idempotent() {
    let paths = [fixture("mobile_inline.txt"), fixture("mobile_json.txt")];
    for dialect in [Dialect::StatusOnly, Dialect::InlineMessage, Dialect::JsonMessage] {
        let options = AnalysisOptions::new(dialect);
        let first = analyze(&paths, &options);
        let second = analyze(&paths, &options);
        assert_eq!(first.report, second.report, "dialect {dialect}");
        assert_eq!(first.render(), second.render(), "dialect {dialect}");
    }
}

// =============================================================================
// Failure handling
// =============================================================================

#[test]
fn e2e_no_files_gives_fixed_sentence() {
    let run = analyze(&[], &AnalysisOptions::new(Dialect::InlineMessage));
    assert_eq!(run.render(), "No log files analyzed.\n");
}

#[test]
fn e2e_bad_encoding_and_missing_files_are_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let latin1 = dir.path().join("latin1.txt");
    fs::write(&latin1, b"HttpStatus: 500 caf\xE9\n").unwrap();
    let good = write(dir.path(), "good.txt", "HttpStatus: 201\n");
    let missing = dir.path().join("nope.txt");

    let run = analyze(
        &[latin1, missing, good],
        &AnalysisOptions::new(Dialect::StatusOnly),
    );

    assert_eq!(run.failures.len(), 2);
    assert!(matches!(run.failures[0], ReadError::InvalidEncoding { .. }));
    assert!(matches!(run.failures[1], ReadError::Io { .. }));
    assert_eq!(
        run.render(),
        "File: latin1.txt\n  No HttpStatus codes found.\n\n\
         File: nope.txt\n  No HttpStatus codes found.\n\n\
         File: good.txt\n  201: 1\n\n\
         TOTAL (all files):\n  201: 1\n"
    );
}

#[test]
fn e2e_malformed_csv_file_contributes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let broken = dir.path().join("broken.csv");
    fs::write(&broken, b"success;msg\nfalse;caf\xE9\n").unwrap();
    let good = write(dir.path(), "good.csv", "success;msg\nfalse;Boom\n");

    let run = analyze(&[broken, good], &AnalysisOptions::new(Dialect::CsvOutcome));
    assert_eq!(run.failures.len(), 1);
    assert!(run
        .render()
        .starts_with("File: broken.csv\n  Success True: 0\n  Success False: 0\n\n"));
    assert!(run
        .render()
        .ends_with("TOTAL (across all files):\n  Success True: 0\n  Success False: 1\n      \"Boom\" — 1 time\n"));
}

// =============================================================================
// Export
// =============================================================================

#[test]
fn e2e_export_matches_report() {
    let run = analyze(
        &[fixture("api_log.csv")],
        &AnalysisOptions::new(Dialect::CsvOutcome),
    );

    let mut csv_out = Vec::new();
    let rows = export_csv(&run.report, &mut csv_out, Path::new("out.csv")).unwrap();
    // true + three failure messages, for the file and for the total.
    assert_eq!(rows, 8);
    let csv_text = String::from_utf8(csv_out).unwrap();
    let full_path = fixture("api_log.csv").display().to_string();
    assert!(csv_text.contains(&format!(
        "{full_path},false,Timeout waiting for upstream,2\n"
    )));
    assert!(csv_text.contains("TOTAL,true,,2\n"));

    let mut json_out = Vec::new();
    export_json(&run.report, &mut json_out, Path::new("out.json")).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&json_out).unwrap();
    assert_eq!(value["dialect"], "csv");
    assert_eq!(value["total"]["true_count"], 2);
    assert_eq!(value["total"]["false_messages"]["Disk full"], 1);
}
