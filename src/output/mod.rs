//! Output formatters for duplicate scan results.
//!
//! This module provides different output formats for scan results:
//! - JSON for automation and scripting
//! - CSV for spreadsheet import
//! - Plain text for reading in a terminal
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::{DuplicateFinder, ScanOptions};
//! use dupescan::output::json::JsonOutput;
//!
//! let result = DuplicateFinder::with_defaults()
//!     .find_duplicates(&ScanOptions::default())
//!     .unwrap();
//!
//! let output = JsonOutput::new(&result);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod csv;
pub mod json;
pub mod text;

use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};

// Re-export main types
pub use csv::{CsvOutput, CsvOutputError};
pub use json::{JsonOutput, JsonOutputError};
pub use text::TextOutput;

/// Format a modification time as RFC 3339 in UTC, to the second.
#[must_use]
pub fn format_modified(time: SystemTime) -> String {
    let datetime: DateTime<Utc> = time.into();
    datetime.to_rfc3339_opts(SecondsFormat::Secs, true)
}
