//! CSV output formatter for duplicate scan results.
//!
//! One row is generated for each file in each duplicate group.
//!
//! # Columns
//!
//! - `group_id`: 1-based group rank
//! - `digest`: content digest (hexadecimal)
//! - `path`: absolute path to the file
//! - `size`: file size in bytes
//! - `modified`: last modified time (RFC 3339)
//! - `extension`: lower-cased extension
//! - `keep`: `true` for the newest member of its group, `false` for deletion
//!   candidates

use std::io;

use serde::Serialize;
use thiserror::Error;

use super::format_modified;
use crate::duplicates::DuplicateGroup;

/// Errors that can occur during CSV output generation.
#[derive(Debug, Error)]
pub enum CsvOutputError {
    /// I/O error during writing.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Error during CSV serialization.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    group_id: usize,
    digest: &'a str,
    path: String,
    size: u64,
    modified: String,
    extension: &'a str,
    keep: bool,
}

/// CSV output formatter.
pub struct CsvOutput<'a> {
    groups: &'a [DuplicateGroup],
}

impl<'a> CsvOutput<'a> {
    /// Create a new CSV output formatter.
    #[must_use]
    pub fn new(groups: &'a [DuplicateGroup]) -> Self {
        Self { groups }
    }

    /// Write the CSV output, header first, to `writer`.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if writing or serialization fails.
    pub fn write_to<W: io::Write>(&self, writer: W) -> Result<(), CsvOutputError> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        for group in self.groups {
            for (index, file) in group.files.iter().enumerate() {
                csv_writer.serialize(CsvRow {
                    group_id: group.id,
                    digest: &group.digest.hex,
                    path: file.path.to_string_lossy().into_owned(),
                    size: file.size,
                    modified: format_modified(file.modified),
                    extension: &file.extension,
                    keep: index == 0,
                })?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Generate CSV output as a string.
    ///
    /// # Errors
    ///
    /// Returns `CsvOutputError` if serialization fails.
    pub fn to_string(&self) -> Result<String, CsvOutputError> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}
