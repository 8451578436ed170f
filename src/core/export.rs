// LogTally - core/export.rs
//
// CSV and JSON export of per-file tallies and totals.
// Writers take any Write trait object and carry the path only for error
// context; export_to_file opens the destination itself.

use crate::core::model::Dialect;
use crate::core::report::Report;
use crate::core::tally::{Analysis, FileTally, MessageTally, OutcomeTally, StatusTally};
use crate::util::constants;
use crate::util::error::ExportError;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Output format chosen from an export path's extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// `.csv` or `.json` (case-insensitive); anything else is rejected.
    pub fn from_path(path: &Path) -> Result<Self, ExportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase);
        match ext.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::Json),
            _ => Err(ExportError::UnsupportedFormat {
                path: path.to_path_buf(),
            }),
        }
    }
}

/// Flattening of a tally into `(key, message, count)` CSV cells.
trait CsvRows {
    const KEY_COLUMN: &'static str;

    fn csv_rows(&self) -> Vec<[String; 3]>;
}

impl CsvRows for StatusTally {
    const KEY_COLUMN: &'static str = "code";

    fn csv_rows(&self) -> Vec<[String; 3]> {
        self.counts
            .iter()
            .map(|(code, count)| [code.to_string(), String::new(), count.to_string()])
            .collect()
    }
}

impl CsvRows for MessageTally {
    const KEY_COLUMN: &'static str = "code";

    fn csv_rows(&self) -> Vec<[String; 3]> {
        self.codes
            .iter()
            .flat_map(|(code, group)| {
                group
                    .messages
                    .iter()
                    .map(move |(message, count)| [code.to_string(), message.clone(), count.to_string()])
            })
            .collect()
    }
}

impl CsvRows for OutcomeTally {
    const KEY_COLUMN: &'static str = "success";

    fn csv_rows(&self) -> Vec<[String; 3]> {
        let mut rows = vec![[
            "true".to_string(),
            String::new(),
            self.true_count.to_string(),
        ]];
        if self.false_count > 0 {
            rows.extend(
                self.ranked_false_messages()
                    .into_iter()
                    .map(|(message, count)| ["false".to_string(), message.to_string(), count.to_string()]),
            );
        } else {
            rows.push(["false".to_string(), String::new(), "0".to_string()]);
        }
        rows
    }
}

fn write_csv_analysis<T: CsvRows, W: Write>(
    analysis: &Analysis<T>,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let csv_err = |e: csv::Error| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record(["file", T::KEY_COLUMN, "message", "count"])
        .map_err(csv_err)?;

    let sections = analysis
        .files()
        .iter()
        .map(|f| (f.path.display().to_string(), &f.tally))
        .chain(std::iter::once((
            constants::EXPORT_TOTAL_LABEL.to_string(),
            analysis.total(),
        )));

    let mut count = 0;
    for (label, tally) in sections {
        for [key, message, n] in tally.csv_rows() {
            csv_writer
                .write_record([label.as_str(), key.as_str(), message.as_str(), n.as_str()])
                .map_err(csv_err)?;
            count += 1;
        }
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(count)
}

/// Export tallies to CSV: one row per grouping key per file (labelled with
/// the file's full path), then `TOTAL` rows. Returns the number of data rows written.
pub fn export_csv<W: Write>(
    report: &Report,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    match report {
        Report::Status(a) => write_csv_analysis(a, writer, export_path),
        Report::Message { analysis, .. } => write_csv_analysis(analysis, writer, export_path),
        Report::Outcome(a) => write_csv_analysis(a, writer, export_path),
    }
}

#[derive(Serialize)]
struct JsonDocument<'a, T> {
    dialect: Dialect,
    files: &'a [FileTally<T>],
    total: &'a T,
}

fn write_json_analysis<T: Serialize, W: Write>(
    dialect: Dialect,
    analysis: &Analysis<T>,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let document = JsonDocument {
        dialect,
        files: analysis.files(),
        total: analysis.total(),
    };
    serde_json::to_writer_pretty(writer, &document).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(analysis.files().len())
}

/// Export tallies to pretty JSON. Returns the number of files exported.
pub fn export_json<W: Write>(
    report: &Report,
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    let dialect = report.dialect();
    match report {
        Report::Status(a) => write_json_analysis(dialect, a, writer, export_path),
        Report::Message { analysis, .. } => {
            write_json_analysis(dialect, analysis, writer, export_path)
        }
        Report::Outcome(a) => write_json_analysis(dialect, a, writer, export_path),
    }
}

/// Write `report` to `path` in the format its extension names.
pub fn export_to_file(report: &Report, path: &Path) -> Result<usize, ExportError> {
    let format = ExportFormat::from_path(path)?;
    let io_err = |e: std::io::Error| ExportError::Io {
        path: path.to_path_buf(),
        source: e,
    };
    let file = std::fs::File::create(path).map_err(io_err)?;
    let mut writer = std::io::BufWriter::new(file);
    let written = match format {
        ExportFormat::Csv => export_csv(report, &mut writer, path)?,
        ExportFormat::Json => export_json(report, &mut writer, path)?,
    };
    writer.flush().map_err(io_err)?;
    tracing::info!(path = %path.display(), ?format, written, "Export complete");
    Ok(written)
}
