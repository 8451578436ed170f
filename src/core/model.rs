// LogTally - core/model.rs
//
// Core data model types. Pure data definitions with no I/O.
//
// These types are the shared vocabulary across all layers.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Dialect
// =============================================================================

/// The log format the extractor applies to an input file.
///
/// Passed explicitly into every entry point; nothing in the core remembers a
/// selected dialect between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    /// `HttpStatus: NNN` only.
    #[default]
    StatusOnly,

    /// `HttpStatus: NNN` plus `ErrorMsg: free text` ending at `}` or `,`.
    InlineMessage,

    /// `HttpStatus: NNN` plus `ErrorMsg: {json}` whose `detail` is the message.
    JsonMessage,

    /// Delimited table with `success` and `msg` columns.
    CsvOutcome,
}

impl Dialect {
    /// Returns all variants in display order.
    pub fn all() -> &'static [Dialect] {
        &[
            Dialect::StatusOnly,
            Dialect::InlineMessage,
            Dialect::JsonMessage,
            Dialect::CsvOutcome,
        ]
    }

    /// Canonical name, accepted by `FromStr` and shown in help text.
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::StatusOnly => "status",
            Dialect::InlineMessage => "inline",
            Dialect::JsonMessage => "json",
            Dialect::CsvOutcome => "csv",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Serialised as its canonical name, the same text the CLI and config accept.
impl Serialize for Dialect {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "status" | "status-only" | "txt" => Ok(Dialect::StatusOnly),
            "inline" | "inline-message" => Ok(Dialect::InlineMessage),
            "json" | "json-message" => Ok(Dialect::JsonMessage),
            "csv" | "csv-outcome" | "api" => Ok(Dialect::CsvOutcome),
            other => {
                let names: Vec<&str> = Dialect::all().iter().map(Dialect::name).collect();
                Err(format!(
                    "unknown dialect '{other}' (expected one of: {})",
                    names.join(", ")
                ))
            }
        }
    }
}

// =============================================================================
// Records
// =============================================================================

/// One status-bearing log line.
///
/// `status_code` is always within 100..=599; the extractor never builds a
/// record outside that range. `message` is empty for the status-only dialect
/// and when no `ErrorMsg:` marker was present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecord {
    pub status_code: u16,
    pub message: String,
}

/// One row of an API CSV log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiRecord {
    pub success: bool,
    pub message: String,
}
