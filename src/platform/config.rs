// LogTally - platform/config.rs
//
// Config directory resolution and config.toml loading with validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance. The core never reads configuration; values
// resolved here are passed into it as explicit parameters.

use crate::core::model::Dialect;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Location of the default config file, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    let dirs = ProjectDirs::from("", "", constants::APP_ID)?;
    let path = dirs.config_dir().join(constants::CONFIG_FILE_NAME);
    tracing::debug!(path = %path.display(), "Default config path resolved");
    Some(path)
}

// =============================================================================
// config.toml shape
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are ignored so a newer config file still loads.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[analysis]` section.
    pub analysis: AnalysisSection,
    /// `[csv]` section.
    pub csv: CsvSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[analysis]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct AnalysisSection {
    /// Default dialect name.
    pub dialect: Option<String>,
}

/// `[csv]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct CsvSection {
    /// Single-character field delimiter.
    pub delimiter: Option<String>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Dialect used when the CLI does not name one.
    pub dialect: Dialect,
    /// CSV field delimiter.
    pub csv_delimiter: u8,
    /// Logging level string (applied before tracing is initialised).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            csv_delimiter: constants::DEFAULT_CSV_DELIMITER,
            log_level: None,
        }
    }
}

/// Parse a delimiter setting: exactly one ASCII character.
pub fn parse_delimiter(value: &str) -> Result<u8, ConfigError> {
    match value.as_bytes() {
        [byte] if byte.is_ascii() => Ok(*byte),
        _ => Err(ConfigError::InvalidValue {
            field: "delimiter".to_string(),
            value: value.to_string(),
            expected: "a single ASCII character such as ';' or ','".to_string(),
        }),
    }
}

/// Validate a raw config. Invalid values fall back to defaults and are
/// reported as warnings, so one bad key never discards the others.
pub fn validate(raw: RawConfig) -> (AppConfig, Vec<String>) {
    let mut config = AppConfig::default();
    let mut warnings = Vec::new();

    if let Some(ref name) = raw.analysis.dialect {
        match name.parse::<Dialect>() {
            Ok(dialect) => config.dialect = dialect,
            Err(e) => warnings.push(format!(
                "[analysis] dialect: {e}. Using default ({}).",
                config.dialect
            )),
        }
    }

    if let Some(ref delimiter) = raw.csv.delimiter {
        match parse_delimiter(delimiter) {
            Ok(byte) => config.csv_delimiter = byte,
            Err(e) => warnings.push(format!("[csv] {e}. Using default (';').")),
        }
    }

    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.to_lowercase());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: {}. Using default ({}).",
                constants::VALID_LOG_LEVELS.join(", "),
                constants::DEFAULT_LOG_LEVEL,
            ));
        }
    }

    (config, warnings)
}

/// Read and parse a config file.
pub fn read_config(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Load configuration.
///
/// With `explicit` set, the file must exist and parse; failures are returned
/// as errors. Otherwise the platform default location is tried: a missing
/// file silently yields defaults and an unreadable or unparseable one yields
/// defaults plus a warning.
pub fn load_config(explicit: Option<&Path>) -> Result<(AppConfig, Vec<String>), ConfigError> {
    if let Some(path) = explicit {
        let raw = read_config(path)?;
        return Ok(validate(raw));
    }

    let Some(path) = default_config_path() else {
        return Ok((AppConfig::default(), Vec::new()));
    };

    if !path.exists() {
        return Ok((AppConfig::default(), Vec::new()));
    }

    match read_config(&path) {
        Ok(raw) => Ok(validate(raw)),
        Err(e) => Ok((
            AppConfig::default(),
            vec![format!("{e}. Using defaults.")],
        )),
    }
}
