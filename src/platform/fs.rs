// LogTally - platform/fs.rs
//
// Filesystem access: whole-file reads with strict UTF-8 decoding, and glob
// expansion of command-line inputs.

use crate::util::constants;
use crate::util::error::ReadError;
use std::path::{Path, PathBuf};

/// UTF-8 byte-order mark.
const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Read a file into memory as UTF-8 text.
///
/// Fails on OS errors, on files larger than `MAX_INPUT_FILE_SIZE`, and on any
/// invalid UTF-8 (no lossy replacement: a mis-encoded file contributes no
/// records rather than mangled ones). A leading BOM is removed when
/// `strip_bom` is set.
pub fn read_text(path: &Path, strip_bom: bool) -> Result<String, ReadError> {
    let io_err = |e| ReadError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    let size = std::fs::metadata(path).map_err(io_err)?.len();
    if size > constants::MAX_INPUT_FILE_SIZE {
        return Err(ReadError::FileTooLarge {
            path: path.to_path_buf(),
            size,
            max_size: constants::MAX_INPUT_FILE_SIZE,
        });
    }

    let mut bytes = std::fs::read(path).map_err(io_err)?;
    if strip_bom && bytes.starts_with(UTF8_BOM) {
        bytes.drain(..UTF8_BOM.len());
    }

    String::from_utf8(bytes).map_err(|e| ReadError::InvalidEncoding {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Expand command-line inputs into file paths, preserving argument order.
///
/// Arguments containing glob metacharacters are expanded with `glob` (matches
/// in sorted order); other arguments pass through unchanged so a missing file
/// is reported by the reader rather than silently dropped here. Returns the
/// paths and a list of non-fatal warnings.
pub fn expand_inputs(args: &[String]) -> (Vec<PathBuf>, Vec<String>) {
    let mut paths = Vec::new();
    let mut warnings = Vec::new();

    for arg in args {
        if !arg.contains(constants::GLOB_METACHARACTERS) {
            paths.push(PathBuf::from(arg));
            continue;
        }

        let entries = match glob::glob(arg) {
            Ok(entries) => entries,
            Err(e) => {
                warnings.push(format!("Invalid file pattern '{arg}': {e}"));
                continue;
            }
        };

        let mut matched: Vec<PathBuf> = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => matched.push(path),
                Ok(_) => {}
                Err(e) => warnings.push(format!("Cannot read match of '{arg}': {e}")),
            }
        }

        if matched.is_empty() {
            warnings.push(format!("Pattern '{arg}' matched no files"));
        } else {
            tracing::debug!(pattern = %arg, matches = matched.len(), "Expanded file pattern");
            matched.sort();
            paths.extend(matched);
        }
    }

    (paths, warnings)
}
