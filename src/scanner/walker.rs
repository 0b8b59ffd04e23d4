//! Directory walker built on walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a set of roots
//! and collecting the files that qualify for duplicate detection.
//!
//! Traversal is single-threaded and iterative: walkdir keeps an explicit
//! stack of open directories and reports each entry's depth, so deep or
//! adversarial trees cannot exhaust the call stack.
//!
//! # Policies
//!
//! - Directories more than [`MAX_DEPTH`] levels below a root are not
//!   descended into. This is silent, not an error.
//! - Deny-listed and hidden directories are pruned via [`PathFilter`];
//!   hidden files are ignored.
//! - Symbolic links are never followed.
//! - A file is recorded only if its extension matches the category and its
//!   size is at least the configured minimum.
//! - Per-entry and per-directory failures are logged and collected in
//!   [`WalkOutcome::skipped`]; the walk continues.
//! - The cancellation token is polled for every entry walkdir yields. A
//!   signaled token aborts with [`WalkError::Cancelled`] and drops everything
//!   collected so far.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::progress::NullReporter;
//! use dupescan::scanner::{Walker, WalkerConfig};
//! use dupescan::signal::CancellationToken;
//! use std::path::PathBuf;
//!
//! let walker = Walker::new(vec![PathBuf::from("/home/user/Downloads")], WalkerConfig::default());
//! let outcome = walker.walk(&CancellationToken::new(), &NullReporter).unwrap();
//! println!("{} files, {} skipped entries", outcome.files.len(), outcome.skipped.len());
//! ```

use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use walkdir::{DirEntry, WalkDir};

use super::filter::{is_hidden, matches_category, PathFilter};
use super::{extension_of, FileRecord, ScanError, WalkerConfig};
use crate::progress::{ProgressReporter, ScanEvent};
use crate::signal::CancellationToken;

/// Deepest directory level (below a root) whose contents are listed.
pub const MAX_DEPTH: usize = 10;

/// Default minimum file size in bytes.
pub const DEFAULT_MIN_FILE_SIZE: u64 = 1024;

/// The only way a walk can fail as a whole.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum WalkError {
    /// The cancellation token was signaled during traversal.
    #[error("Scan cancelled")]
    Cancelled,
}

/// Result of a completed walk.
#[derive(Debug, Default)]
pub struct WalkOutcome {
    /// Qualifying files, in traversal order
    pub files: Vec<FileRecord>,
    /// Entries and subtrees that were skipped because of errors
    pub skipped: Vec<ScanError>,
}

/// Directory walker for file discovery across several roots.
#[derive(Debug)]
pub struct Walker {
    roots: Vec<PathBuf>,
    config: WalkerConfig,
    exclude_patterns: Vec<String>,
}

impl Walker {
    /// Create a new walker over `roots`.
    ///
    /// Roots are de-duplicated when the walk starts: a root equal to or nested
    /// inside another root is dropped so no file is recorded twice.
    #[must_use]
    pub fn new(roots: Vec<PathBuf>, config: WalkerConfig) -> Self {
        Self {
            roots,
            config,
            exclude_patterns: Vec::new(),
        }
    }

    /// Additional case-insensitive directory patterns to prune.
    #[must_use]
    pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    /// Walk every root and collect qualifying files.
    ///
    /// # Errors
    ///
    /// Returns [`WalkError::Cancelled`] if `token` is signaled before the walk
    /// finishes. No partial list is returned in that case.
    pub fn walk(
        &self,
        token: &CancellationToken,
        progress: &dyn ProgressReporter,
    ) -> Result<WalkOutcome, WalkError> {
        let mut outcome = WalkOutcome::default();

        for root in dedupe_roots(&self.roots) {
            if token.is_cancelled() {
                log::debug!("Walker: cancellation requested before {}", root.display());
                return Err(WalkError::Cancelled);
            }
            self.walk_root(&root, token, progress, &mut outcome)?;
        }

        log::debug!(
            "Walker: {} qualifying files, {} skipped entries",
            outcome.files.len(),
            outcome.skipped.len()
        );
        Ok(outcome)
    }

    fn walk_root(
        &self,
        root: &Path,
        token: &CancellationToken,
        progress: &dyn ProgressReporter,
        outcome: &mut WalkOutcome,
    ) -> Result<(), WalkError> {
        log::info!("Walking {}", root.display());
        progress.report(ScanEvent::Scanning {
            current_path: root.to_path_buf(),
            files_found: outcome.files.len(),
        });

        let filter = PathFilter::new(root).with_extra_patterns(&self.exclude_patterns);
        let interval = self.config.progress_interval.max(1);

        let entries = WalkDir::new(root)
            .follow_links(false)
            .max_depth(MAX_DEPTH + 1)
            .into_iter()
            .filter_entry(|entry| keep_entry(entry, &filter));

        for result in entries {
            if token.is_cancelled() {
                log::debug!("Walker: cancellation requested, discarding partial walk");
                return Err(WalkError::Cancelled);
            }

            let entry = match result {
                Ok(entry) => entry,
                Err(e) => {
                    outcome.skipped.push(record_walk_error(e));
                    continue;
                }
            };

            let file_type = entry.file_type();
            if file_type.is_dir() {
                continue;
            }
            if !file_type.is_file() {
                log::trace!("Skipping non-regular file: {}", entry.path().display());
                continue;
            }

            match self.inspect_file(entry) {
                Ok(Some(record)) => {
                    outcome.files.push(record);
                    if outcome.files.len() % interval == 0 {
                        let current = outcome.files[outcome.files.len() - 1]
                            .directory()
                            .to_path_buf();
                        progress.report(ScanEvent::Scanning {
                            current_path: current,
                            files_found: outcome.files.len(),
                        });
                    }
                }
                Ok(None) => {}
                Err(e) => outcome.skipped.push(e),
            }
        }

        Ok(())
    }

    /// Turn a regular-file entry into a record if it passes the filters.
    fn inspect_file(&self, entry: DirEntry) -> Result<Option<FileRecord>, ScanError> {
        let extension = extension_of(entry.path());
        if !matches_category(&extension, self.config.category) {
            log::trace!(
                "Skipping file outside category {}: {}",
                self.config.category,
                entry.path().display()
            );
            return Ok(None);
        }

        let metadata = entry.metadata().map_err(record_walk_error)?;
        let size = metadata.len();
        if size < self.config.min_size {
            log::trace!(
                "Skipping file below minimum size ({} < {}): {}",
                size,
                self.config.min_size,
                entry.path().display()
            );
            return Ok(None);
        }

        let modified = metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        Ok(Some(FileRecord::new(entry.into_path(), size, modified)))
    }
}

/// `filter_entry` predicate: prune skipped directories and hidden files.
fn keep_entry(entry: &DirEntry, filter: &PathFilter) -> bool {
    if entry.depth() == 0 {
        return true;
    }
    if entry.file_type().is_dir() {
        if filter.should_skip_directory(entry.path()) {
            log::debug!("Skipping directory: {}", entry.path().display());
            return false;
        }
        return true;
    }
    !is_hidden(&entry.file_name().to_string_lossy())
}

/// Classify and log a walkdir error.
fn record_walk_error(error: walkdir::Error) -> ScanError {
    let path = error.path().map(Path::to_path_buf).unwrap_or_default();
    let is_dir = path.is_dir();

    let scan_error = match error.into_io_error() {
        Some(source) if is_dir && source.kind() != io::ErrorKind::NotFound => {
            ScanError::DirectoryUnreadable { path, source }
        }
        Some(source) => ScanError::from_io(&path, source),
        None => ScanError::Io {
            path,
            source: io::Error::other("filesystem loop detected"),
        },
    };

    match &scan_error {
        ScanError::EntryVanished(_) => log::debug!("{scan_error}"),
        _ => log::warn!("{scan_error}"),
    }
    scan_error
}

/// Canonicalize roots and drop duplicates and roots nested in other roots.
///
/// Roots that cannot be canonicalized (missing, unreadable) are kept as given
/// so the walk reports them as skipped entries.
#[must_use]
pub fn dedupe_roots(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut resolved: Vec<PathBuf> = roots
        .iter()
        .map(|root| match root.canonicalize() {
            Ok(canonical) => canonical,
            Err(e) => {
                log::debug!("Cannot canonicalize root {}: {}", root.display(), e);
                root.clone()
            }
        })
        .collect();

    // Shorter paths sort before their descendants.
    resolved.sort();
    resolved.dedup();

    let mut kept: Vec<PathBuf> = Vec::with_capacity(resolved.len());
    for root in resolved {
        if let Some(parent) = kept.iter().find(|k| root.starts_with(k)) {
            log::info!(
                "Root {} is inside {}, not walking it twice",
                root.display(),
                parent.display()
            );
            continue;
        }
        kept.push(root);
    }
    kept
}
