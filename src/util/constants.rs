// LogTally - util/constants.rs
//
// Single source of truth for named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "LogTally";

/// Application identifier used for the config directory.
pub const APP_ID: &str = "logtally";

/// Current application version.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Extraction grammar
// =============================================================================

/// Marker preceding the three-digit status code in a log line.
pub const STATUS_MARKER: &str = "HttpStatus:";

/// Marker preceding the error message (inline text or JSON object).
pub const MESSAGE_MARKER: &str = "ErrorMsg:";

/// Lowest status code accepted as a record.
pub const MIN_STATUS_CODE: u16 = 100;

/// Highest status code accepted as a record.
pub const MAX_STATUS_CODE: u16 = 599;

/// JSON field read from an `ErrorMsg:` object.
pub const JSON_DETAIL_FIELD: &str = "detail";

/// Prefix of the message recorded when an `ErrorMsg:` object is not valid JSON.
pub const INVALID_JSON_MESSAGE_PREFIX: &str = "Invalid JSON in ErrorMsg";

/// Maximum number of extra physical lines joined onto one logical entry
/// while an `ErrorMsg:` JSON object is still open.
pub const MAX_JSON_CONTINUATION_LINES: usize = 64;

// =============================================================================
// CSV dialect
// =============================================================================

/// Default field delimiter for API CSV logs.
pub const DEFAULT_CSV_DELIMITER: u8 = b';';

/// Header name of the boolean outcome column (matched case-insensitively).
pub const CSV_SUCCESS_COLUMN: &str = "success";

/// Header name of the message column (matched case-insensitively).
pub const CSV_MESSAGE_COLUMN: &str = "msg";

/// Cell values read as a successful outcome (after trim + lowercase).
pub const TRUE_VALUES: &[&str] = &["true", "1", "yes", "y"];

/// Cell values read as a failed outcome (after trim + lowercase).
pub const FALSE_VALUES: &[&str] = &["false", "0", "no", "n"];

// =============================================================================
// Input limits
// =============================================================================

/// Files above this size are reported as unreadable instead of being loaded.
pub const MAX_INPUT_FILE_SIZE: u64 = 256 * 1024 * 1024; // 256 MiB

/// Characters that mark a CLI argument as a glob pattern.
pub const GLOB_METACHARACTERS: &[char] = &['*', '?', '['];

// =============================================================================
// Report text
// =============================================================================

/// Report produced for a status or message dialect run over zero files.
pub const NO_LOG_FILES_REPORT: &str = "No log files analyzed.";

/// Report produced for a CSV dialect run over zero files.
pub const NO_CSV_FILES_REPORT: &str = "No API CSV files analyzed.";

/// Label of the aggregate rows in CSV exports.
pub const EXPORT_TOTAL_LABEL: &str = "TOTAL";

// =============================================================================
// Logging
// =============================================================================

/// Default log level. Kept at `warn` so stderr only carries read failures.
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Accepted `[logging] level` values.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";
