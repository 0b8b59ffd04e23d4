//! Scanner module for directory traversal and content hashing.
//!
//! This module provides functionality for:
//! - Path filtering (deny-listed and hidden directories, file categories)
//! - Single-threaded, depth-capped directory walking using walkdir
//! - Content hashing with BLAKE3 (full read or head+tail for large files)
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`filter`]: Pure skip/category predicates
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: BLAKE3 file hashing under the size-dependent policy
//!
//! # Example
//!
//! ```no_run
//! use dupescan::progress::NullReporter;
//! use dupescan::scanner::{FileCategory, Walker, WalkerConfig};
//! use dupescan::signal::CancellationToken;
//! use std::path::PathBuf;
//!
//! let config = WalkerConfig {
//!     category: FileCategory::Images,
//!     ..Default::default()
//! };
//!
//! let walker = Walker::new(vec![PathBuf::from(".")], config);
//! let outcome = walker.walk(&CancellationToken::new(), &NullReporter).unwrap();
//! for file in &outcome.files {
//!     println!("{}: {} bytes", file.path.display(), file.size);
//! }
//! ```

pub mod filter;
pub mod hasher;
pub mod walker;

use std::path::{Path, PathBuf};
use std::time::SystemTime;

// Re-export main types
pub use filter::{FileCategory, ParseCategoryError, PathFilter};
pub use hasher::{
    ContentDigest, DigestAlgorithm, Hasher, CHUNK_SIZE, FULL_READ_THRESHOLD,
};
pub use walker::{WalkError, WalkOutcome, Walker, DEFAULT_MIN_FILE_SIZE, MAX_DEPTH};

/// A qualifying file discovered by the walker.
///
/// Records are never mutated after discovery; later stages only move them
/// between collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Absolute path to the file
    pub path: PathBuf,
    /// File name (final path component)
    pub name: String,
    /// File size in bytes
    pub size: u64,
    /// Last modification time
    pub modified: SystemTime,
    /// Lower-cased extension without the dot, empty if none
    pub extension: String,
}

impl FileRecord {
    /// Create a new FileRecord, deriving `name` and `extension` from `path`.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file
    /// * `size` - File size in bytes
    /// * `modified` - Last modification time
    #[must_use]
    pub fn new(path: PathBuf, size: u64, modified: SystemTime) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = extension_of(&path);
        Self {
            path,
            name,
            size,
            modified,
            extension,
        }
    }

    /// Directory containing this file.
    #[must_use]
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Lower-cased extension of `path`, without the leading dot.
#[must_use]
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Configuration for directory walking.
#[derive(Debug, Clone)]
pub struct WalkerConfig {
    /// Category of files to keep.
    pub category: FileCategory,

    /// Minimum file size to include (in bytes).
    /// Files smaller than this are never recorded.
    pub min_size: u64,

    /// Emit a `Scanning` progress event every this many qualifying files.
    pub progress_interval: usize,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            category: FileCategory::All,
            min_size: DEFAULT_MIN_FILE_SIZE,
            progress_interval: 100,
        }
    }
}

/// Per-entry failures absorbed while walking.
///
/// None of these stop the walk; they are logged, counted and returned in
/// [`WalkOutcome::skipped`].
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing an entry.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The entry disappeared between being listed and being inspected.
    #[error("Entry vanished during scan: {0}")]
    EntryVanished(PathBuf),

    /// A directory could not be listed; its whole subtree was skipped.
    #[error("Cannot read directory {path}: {source}")]
    DirectoryUnreadable {
        /// Directory that could not be listed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Any other I/O error while inspecting an entry.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    /// Classify an I/O error raised while inspecting `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: std::io::Error) -> Self {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            ErrorKind::NotFound => Self::EntryVanished(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}

/// Errors that can occur while hashing one file.
///
/// The finder treats every variant except [`HashError::Cancelled`] as
/// "exclude this file from grouping".
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The file was not found (removed since the walk).
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The cancellation token was signaled before the file was opened.
    #[error("Hashing cancelled")]
    Cancelled,
}

impl HashError {
    /// Classify an I/O error raised while reading `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: std::io::Error) -> Self {
        use std::io::ErrorKind;

        match error.kind() {
            ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }
}
