// LogTally - core/tally.rs
//
// Aggregation of extracted records into per-file tallies and a cross-file
// total. Pure reduction: no I/O, no ordering decisions beyond what the
// grouping keys imply (display order belongs to core::report).

use crate::core::model::{ApiRecord, LogRecord};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

/// A mapping from grouping key to occurrence count that can be built from
/// records and summed with others of the same shape.
pub trait Tally: Default {
    /// Record type this tally consumes.
    type Record;

    /// Count one record.
    fn add(&mut self, record: &Self::Record);

    /// Add every count of `other` into `self`.
    fn merge(&mut self, other: &Self);

    /// True when no record has been counted.
    fn is_empty(&self) -> bool;

    /// Build a tally from a slice of records.
    fn from_records(records: &[Self::Record]) -> Self {
        let mut tally = Self::default();
        for record in records {
            tally.add(record);
        }
        tally
    }
}

// =============================================================================
// Status-only
// =============================================================================

/// Counts keyed by status code alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct StatusTally {
    pub counts: BTreeMap<u16, usize>,
}

impl Tally for StatusTally {
    type Record = LogRecord;

    fn add(&mut self, record: &LogRecord) {
        *self.counts.entry(record.status_code).or_insert(0) += 1;
    }

    fn merge(&mut self, other: &Self) {
        for (code, count) in &other.counts {
            *self.counts.entry(*code).or_insert(0) += count;
        }
    }

    fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

// =============================================================================
// Status + message
// =============================================================================

/// All records sharing one status code, sub-grouped by exact message text.
///
/// Messages keep first-seen order; the empty string is a valid message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CodeMessages {
    pub count: usize,
    pub messages: Vec<(String, usize)>,
}

impl CodeMessages {
    fn add_message(&mut self, message: &str, count: usize) {
        self.count += count;
        match self.messages.iter_mut().find(|(m, _)| m == message) {
            Some((_, existing)) => *existing += count,
            None => self.messages.push((message.to_string(), count)),
        }
    }
}

/// Counts keyed by status code, then by message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct MessageTally {
    pub codes: BTreeMap<u16, CodeMessages>,
}

impl Tally for MessageTally {
    type Record = LogRecord;

    fn add(&mut self, record: &LogRecord) {
        self.codes
            .entry(record.status_code)
            .or_default()
            .add_message(&record.message, 1);
    }

    fn merge(&mut self, other: &Self) {
        for (code, group) in &other.codes {
            let target = self.codes.entry(*code).or_default();
            for (message, count) in &group.messages {
                target.add_message(message, *count);
            }
        }
    }

    fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

// =============================================================================
// CSV outcome
// =============================================================================

/// Success/failure counts; failures are additionally grouped by message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeTally {
    pub true_count: usize,
    pub false_count: usize,
    pub false_messages: HashMap<String, usize>,
}

impl OutcomeTally {
    /// Failure messages sorted by descending count, then ascending text.
    pub fn ranked_false_messages(&self) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .false_messages
            .iter()
            .map(|(m, c)| (m.as_str(), *c))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

impl Tally for OutcomeTally {
    type Record = ApiRecord;

    fn add(&mut self, record: &ApiRecord) {
        if record.success {
            self.true_count += 1;
        } else {
            self.false_count += 1;
            *self
                .false_messages
                .entry(record.message.clone())
                .or_insert(0) += 1;
        }
    }

    fn merge(&mut self, other: &Self) {
        self.true_count += other.true_count;
        self.false_count += other.false_count;
        for (message, count) in &other.false_messages {
            *self.false_messages.entry(message.clone()).or_insert(0) += count;
        }
    }

    fn is_empty(&self) -> bool {
        self.true_count == 0 && self.false_count == 0
    }
}

// =============================================================================
// Per-file + total
// =============================================================================

/// Tally of a single source file. The full path is kept for lookup; reports
/// show only its file name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileTally<T> {
    pub path: PathBuf,
    pub tally: T,
}

/// Per-file tallies in input order plus their derived total.
///
/// Constructed only through [`aggregate`] or [`Analysis::from_files`], so the
/// total always equals the sum of the per-file tallies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis<T> {
    files: Vec<FileTally<T>>,
    total: T,
}

impl<T: Tally> Analysis<T> {
    /// Wrap already-built per-file tallies and derive the total from them.
    pub fn from_files(files: Vec<FileTally<T>>) -> Self {
        let mut total = T::default();
        for file in &files {
            total.merge(&file.tally);
        }
        Self { files, total }
    }
}

impl<T> Analysis<T> {
    pub fn files(&self) -> &[FileTally<T>] {
        &self.files
    }

    pub fn total(&self) -> &T {
        &self.total
    }

    /// Look up a file's tally by its full path.
    pub fn file(&self, path: &std::path::Path) -> Option<&T> {
        self.files
            .iter()
            .find(|f| f.path == path)
            .map(|f| &f.tally)
    }
}

/// Reduce per-file record lists (in input order) to per-file tallies and a
/// total.
pub fn aggregate<T: Tally>(per_file: Vec<(PathBuf, Vec<T::Record>)>) -> Analysis<T> {
    let files = per_file
        .into_iter()
        .map(|(path, records)| FileTally {
            tally: T::from_records(&records),
            path,
        })
        .collect();
    Analysis::from_files(files)
}
