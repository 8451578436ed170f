// LogTally - app/reader.rs
//
// Per-file reading: load a file, split it into logical lines or CSV rows,
// and run the extractor over each one, keeping encounter order.
//
// Errors are returned to the batch layer, which records them and carries on
// with the next file; nothing here aborts a run.

use crate::core::model::{ApiRecord, Dialect, LogRecord};
use crate::core::parser::{self, CsvColumns};
use crate::platform::fs;
use crate::util::constants;
use crate::util::error::ReadError;
use std::path::Path;

/// Split text into logical log entries.
///
/// Every physical line is one entry, except under the JSON dialect where a
/// line with an unclosed `ErrorMsg:` object absorbs the following lines
/// (joined with `\n`) until its braces balance, the file ends, the next line
/// carries its own `HttpStatus:`, or `MAX_JSON_CONTINUATION_LINES` lines have
/// been added. A line with a status marker is never swallowed, so an
/// unterminated object costs at most its own message.
pub fn logical_lines(content: &str, dialect: Dialect) -> Vec<String> {
    let mut entries = Vec::new();
    let mut lines = content.lines().peekable();

    while let Some(line) = lines.next() {
        let mut entry = line.to_string();
        if dialect == Dialect::JsonMessage {
            let mut joined = 0;
            while joined < constants::MAX_JSON_CONTINUATION_LINES
                && parser::json_message_is_open(&entry)
            {
                let Some(next) = lines.next_if(|next| !parser::starts_log_entry(next)) else {
                    break;
                };
                entry.push('\n');
                entry.push_str(next);
                joined += 1;
            }
            if joined > 0 {
                tracing::trace!(lines = joined + 1, "Joined multi-line ErrorMsg entry");
            }
        }
        entries.push(entry);
    }

    entries
}

/// Extract log records from already-loaded text.
pub fn parse_log_text(content: &str, dialect: Dialect) -> Vec<LogRecord> {
    logical_lines(content, dialect)
        .iter()
        .filter_map(|line| parser::extract_log_record(line, dialect))
        .collect()
}

/// Extract API records from already-loaded CSV text.
///
/// The header row is required; its column lookup is built once and reused
/// for every data row. Any structural CSV error fails the whole input.
pub fn parse_api_csv(content: &str, delimiter: u8) -> Result<Vec<ApiRecord>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let columns = CsvColumns::from_headers(reader.headers()?);
    if columns.success.is_none() {
        tracing::debug!("CSV header has no success column; every row will be skipped");
    }

    let mut records = Vec::new();
    for row in reader.records() {
        if let Some(record) = parser::extract_api_record(&columns, &row?) {
            records.push(record);
        }
    }
    Ok(records)
}

/// Read one text log file under a line dialect.
pub fn read_log_records(path: &Path, dialect: Dialect) -> Result<Vec<LogRecord>, ReadError> {
    let content = fs::read_text(path, false)?;
    let records = parse_log_text(&content, dialect);
    tracing::debug!(
        file = %path.display(),
        %dialect,
        records = records.len(),
        "Log file read"
    );
    Ok(records)
}

/// Read one API CSV file.
pub fn read_api_records(path: &Path, delimiter: u8) -> Result<Vec<ApiRecord>, ReadError> {
    let content = fs::read_text(path, true)?;
    let records = parse_api_csv(&content, delimiter).map_err(|e| ReadError::Csv {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(
        file = %path.display(),
        records = records.len(),
        "CSV file read"
    );
    Ok(records)
}
