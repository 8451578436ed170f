// LogTally - main.rs
//
// Command-line entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading and logging initialisation
// 3. Input expansion, analysis, report output, optional export

use clap::Parser;
use logtally::app::analysis::{self, AnalysisOptions};
use logtally::core::export;
use logtally::core::model::Dialect;
use logtally::platform::{config, fs};
use logtally::util;
use logtally::util::error::{LogTallyError, Result};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

/// LogTally - count HTTP status codes and error messages across log files.
///
/// Reads each file, extracts `HttpStatus:` codes (optionally with their
/// `ErrorMsg:` text) or success/msg CSV rows, and prints per-file and total
/// tallies.
#[derive(Parser, Debug)]
#[command(name = "logtally", version, about)]
struct Cli {
    /// Log files to analyse. Glob patterns such as 'logs/*.txt' are expanded.
    #[arg(required = true)]
    files: Vec<String>,

    /// Log dialect: status, inline, json, or csv.
    #[arg(short = 'm', long = "dialect")]
    dialect: Option<Dialect>,

    /// CSV field delimiter (single character, default ';').
    #[arg(long = "delimiter")]
    delimiter: Option<String>,

    /// Also export the tallies to this .json or .csv file.
    #[arg(short = 'e', long = "export")]
    export: Option<PathBuf>,

    /// Config file to use instead of the platform default.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn run(cli: Cli) -> Result<()> {
    let (app_config, config_warnings) = config::load_config(cli.config.as_deref())?;

    util::logging::init(cli.debug, app_config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "LogTally starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    let csv_delimiter = match cli.delimiter.as_deref() {
        Some(value) => config::parse_delimiter(value)?,
        None => app_config.csv_delimiter,
    };
    let options = AnalysisOptions {
        dialect: cli.dialect.unwrap_or(app_config.dialect),
        csv_delimiter,
    };

    let (paths, input_warnings) = fs::expand_inputs(&cli.files);
    for warning in &input_warnings {
        tracing::warn!(warning = %warning, "Input warning");
        eprintln!("Warning: {warning}");
    }
    if paths.is_empty() {
        return Err(LogTallyError::NoInput);
    }

    let run = analysis::analyze(&paths, &options);

    let mut stdout = std::io::stdout().lock();
    // A closed pipe (e.g. `| head`) is not worth failing over.
    let _ = stdout.write_all(run.render().as_bytes());

    for failure in &run.failures {
        eprintln!("Warning: could not read {failure}");
    }

    if let Some(ref path) = cli.export {
        export::export_to_file(&run.report, path)?;
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "LogTally failed");
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
