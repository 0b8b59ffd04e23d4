//! JSON output formatter for duplicate scan results.
//!
//! Provides machine-readable JSON output for scripting and automation.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "groups": [
//!     {
//!       "id": 1,
//!       "digest": "af1349b9...",
//!       "size": 512000,
//!       "count": 2,
//!       "files": [
//!         {
//!           "path": "/home/user/Downloads/report.pdf",
//!           "name": "report.pdf",
//!           "directory": "/home/user/Downloads",
//!           "size": 512000,
//!           "modifiedISO8601": "2024-05-01T10:00:00Z",
//!           "extension": "pdf"
//!         }
//!       ],
//!       "reclaimableBytes": 512000
//!     }
//!   ],
//!   "summary": {
//!     "totalFiles": 100,
//!     "totalGroups": 1,
//!     "totalDuplicateFiles": 1,
//!     "totalReclaimableBytes": 512000,
//!     "scanDurationSeconds": 1.234,
//!     "scannedPaths": ["/home/user/Downloads"]
//!   }
//! }
//! ```
//!
//! Files within a group are listed newest first.

use std::io::Write;

use serde::{Deserialize, Serialize};

use super::format_modified;
use crate::duplicates::{DuplicateGroup, DuplicateScanResult, ScanSummary};
use crate::scanner::FileRecord;

/// One file in a group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonFile {
    /// Absolute path
    pub path: String,
    /// File name
    pub name: String,
    /// Containing directory
    pub directory: String,
    /// Size in bytes
    pub size: u64,
    /// Last modification time (RFC 3339, UTC)
    #[serde(rename = "modifiedISO8601")]
    pub modified: String,
    /// Lower-cased extension without the dot
    pub extension: String,
}

impl From<&FileRecord> for JsonFile {
    fn from(record: &FileRecord) -> Self {
        Self {
            path: record.path.to_string_lossy().into_owned(),
            name: record.name.clone(),
            directory: record.directory().to_string_lossy().into_owned(),
            size: record.size,
            modified: format_modified(record.modified),
            extension: record.extension.clone(),
        }
    }
}

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonDuplicateGroup {
    /// 1-based rank
    pub id: usize,
    /// Content digest as lower-case hex
    pub digest: String,
    /// Size of each member in bytes
    pub size: u64,
    /// Number of members
    pub count: usize,
    /// Members, newest first
    pub files: Vec<JsonFile>,
    /// `size * (count - 1)`
    pub reclaimable_bytes: u64,
}

impl From<&DuplicateGroup> for JsonDuplicateGroup {
    fn from(group: &DuplicateGroup) -> Self {
        Self {
            id: group.id,
            digest: group.digest.hex.clone(),
            size: group.size,
            count: group.count(),
            files: group.files.iter().map(JsonFile::from).collect(),
            reclaimable_bytes: group.reclaimable_bytes(),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSummary {
    /// Qualifying files found
    pub total_files: usize,
    /// Number of duplicate groups
    pub total_groups: usize,
    /// Redundant copies across all groups
    pub total_duplicate_files: usize,
    /// Bytes freed by keeping one copy per group
    pub total_reclaimable_bytes: u64,
    /// Wall-clock scan duration in seconds
    pub scan_duration_seconds: f64,
    /// Roots that were walked
    pub scanned_paths: Vec<String>,
}

impl From<&ScanSummary> for JsonSummary {
    fn from(summary: &ScanSummary) -> Self {
        Self {
            total_files: summary.total_files,
            total_groups: summary.total_groups,
            total_duplicate_files: summary.total_duplicate_files,
            total_reclaimable_bytes: summary.total_reclaimable_bytes,
            scan_duration_seconds: summary.scan_duration.as_secs_f64(),
            scanned_paths: summary
                .scanned_paths
                .iter()
                .map(|p| p.to_string_lossy().into_owned())
                .collect(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonOutput {
    /// Duplicate groups, ranked
    pub groups: Vec<JsonDuplicateGroup>,
    /// Scan summary statistics
    pub summary: JsonSummary,
}

impl JsonOutput {
    /// Build the JSON document for a scan result.
    ///
    /// # Example
    ///
    /// ```
    /// use dupescan::duplicates::DuplicateScanResult;
    /// use dupescan::output::json::JsonOutput;
    ///
    /// let output = JsonOutput::new(&DuplicateScanResult::default());
    /// assert!(output.groups.is_empty());
    /// assert_eq!(output.summary.total_files, 0);
    /// ```
    #[must_use]
    pub fn new(result: &DuplicateScanResult) -> Self {
        Self {
            groups: result.groups.iter().map(JsonDuplicateGroup::from).collect(),
            summary: JsonSummary::from(&result.summary),
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
