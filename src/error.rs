//! Process exit codes and structured error reporting.

use serde::Serialize;

use crate::duplicates::{DuplicateScanResult, FinderError};

/// Exit codes for the `dupescan` binary.
///
/// - 0: scan completed and found duplicates
/// - 1: unexpected failure (bad arguments, invalid root, config error)
/// - 2: scan completed, no duplicates
/// - 3: scan completed but some entries or files had to be skipped
/// - 130: cancelled (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Scan completed and duplicates were found.
    Success = 0,
    /// An error ended the run.
    GeneralError = 1,
    /// Scan completed but no duplicates were found.
    NoDuplicates = 2,
    /// Scan completed with skipped entries or unreadable files.
    PartialSuccess = 3,
    /// Scan was cancelled.
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "DS000",
            Self::GeneralError => "DS001",
            Self::NoDuplicates => "DS002",
            Self::PartialSuccess => "DS003",
            Self::Interrupted => "DS130",
        }
    }

    /// Exit code for a completed scan.
    ///
    /// Skipped entries take precedence over the "no duplicates" outcome, since
    /// the caller cannot trust an empty result from an incomplete walk.
    #[must_use]
    pub fn for_result(result: &DuplicateScanResult) -> Self {
        if result.summary.had_errors() {
            Self::PartialSuccess
        } else if result.groups.is_empty() {
            Self::NoDuplicates
        } else {
            Self::Success
        }
    }

    /// Exit code for an error that ended the run.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<FinderError>() {
            Some(FinderError::Cancelled) => Self::Interrupted,
            _ => Self::GeneralError,
        }
    }
}

/// Structured error information for `--json-errors`.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "DS001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message, including causes
    pub message: String,
    /// Whether the scan was cancelled
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}
