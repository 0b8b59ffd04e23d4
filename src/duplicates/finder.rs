//! Duplicate finder: the scan orchestrator.
//!
//! # Overview
//!
//! [`DuplicateFinder`] runs one scan session through four stages, strictly in
//! sequence on the calling thread:
//!
//! 1. **Walk** every root and collect qualifying files ([`Walker`])
//! 2. **Bucket** by exact size and drop unique sizes ([`bucket_by_size`])
//! 3. **Hash** the remaining candidates ([`Hasher`])
//! 4. **Group** by digest and rank ([`group_by_digest`])
//!
//! The cancellation token is checked before the walk, between every stage,
//! and (through the walker and hasher) per entry and per file. A cancelled
//! scan returns [`FinderError::Cancelled`] and nothing else; partial results
//! are discarded.
//!
//! Per-file failures never abort a scan. Walk-time failures are counted in
//! [`ScanSummary::skipped_entries`]; files that cannot be hashed are excluded
//! from grouping and counted in [`ScanSummary::hash_failures`].
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::{DuplicateFinder, ScanOptions};
//! use dupescan::scanner::FileCategory;
//! use std::path::PathBuf;
//!
//! let options = ScanOptions {
//!     root_paths: vec![PathBuf::from("/home/user/Pictures")],
//!     category: FileCategory::Images,
//!     ..Default::default()
//! };
//!
//! let result = DuplicateFinder::with_defaults().find_duplicates(&options).unwrap();
//! for group in &result.groups {
//!     println!("#{}: {} copies, {} bytes reclaimable", group.id, group.count(), group.reclaimable_bytes());
//! }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;

use super::groups::{
    bucket_by_size, filter_candidates, group_by_digest, DuplicateGroup, GroupingStats,
};
use crate::progress::{NullReporter, ProgressReporter, ScanEvent};
use crate::scanner::walker::dedupe_roots;
use crate::scanner::{
    FileCategory, FileRecord, HashError, Hasher, WalkError, Walker, WalkerConfig,
    DEFAULT_MIN_FILE_SIZE,
};
use crate::signal::CancellationToken;

/// What to scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Directories to scan. Empty means the platform default set.
    pub root_paths: Vec<PathBuf>,
    /// Restrict the scan to one category of files.
    pub category: FileCategory,
    /// Files smaller than this many bytes are ignored.
    pub min_file_size: u64,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            root_paths: Vec::new(),
            category: FileCategory::All,
            min_file_size: DEFAULT_MIN_FILE_SIZE,
        }
    }
}

impl ScanOptions {
    /// The roots to scan: `root_paths`, or [`default_roots`] when empty.
    #[must_use]
    pub fn resolved_roots(&self) -> Vec<PathBuf> {
        if self.root_paths.is_empty() {
            default_roots()
        } else {
            self.root_paths.clone()
        }
    }
}

/// The user's document, download, picture, music, video and desktop
/// folders, keeping only those that exist.
#[must_use]
pub fn default_roots() -> Vec<PathBuf> {
    let Some(dirs) = directories::UserDirs::new() else {
        log::warn!("Could not determine the home directory; no default roots");
        return Vec::new();
    };

    [
        dirs.document_dir(),
        dirs.download_dir(),
        dirs.picture_dir(),
        dirs.audio_dir(),
        dirs.video_dir(),
        dirs.desktop_dir(),
    ]
    .into_iter()
    .flatten()
    .filter(|dir| dir.is_dir())
    .map(Path::to_path_buf)
    .collect()
}

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Walker configuration (category, minimum size, progress cadence).
    pub walker_config: WalkerConfig,
    /// Extra directory patterns to prune while walking.
    pub exclude_patterns: Vec<String>,
    /// Cancellation token shared with the caller.
    pub token: CancellationToken,
    /// Progress sink.
    pub progress: Arc<dyn ProgressReporter>,
    /// Content hashing policy.
    pub hasher: Hasher,
}

impl fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FinderConfig")
            .field("walker_config", &self.walker_config)
            .field("exclude_patterns", &self.exclude_patterns)
            .field("token", &self.token)
            .field("progress", &"<reporter>")
            .field("hasher", &self.hasher)
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            walker_config: WalkerConfig::default(),
            exclude_patterns: Vec::new(),
            token: CancellationToken::new(),
            progress: Arc::new(NullReporter),
            hasher: Hasher::new(),
        }
    }
}

impl FinderConfig {
    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Restrict scans to one category.
    #[must_use]
    pub fn with_category(mut self, category: FileCategory) -> Self {
        self.walker_config.category = category;
        self
    }

    /// Set the minimum file size in bytes.
    #[must_use]
    pub fn with_min_size(mut self, min_size: u64) -> Self {
        self.walker_config.min_size = min_size;
        self
    }

    /// Set extra directory patterns to prune.
    #[must_use]
    pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    /// Set the cancellation token.
    #[must_use]
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.token = token;
        self
    }

    /// Set the progress reporter.
    #[must_use]
    pub fn with_progress_reporter(mut self, progress: Arc<dyn ProgressReporter>) -> Self {
        self.progress = progress;
        self
    }

    /// Set the hashing policy.
    #[must_use]
    pub fn with_hasher(mut self, hasher: Hasher) -> Self {
        self.hasher = hasher;
        self
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanSummary {
    /// Qualifying files found by the walk
    pub total_files: usize,
    /// Total size of those files in bytes
    pub total_size: u64,
    /// Number of duplicate groups
    pub total_groups: usize,
    /// Redundant copies across all groups (sum of count - 1)
    pub total_duplicate_files: usize,
    /// Bytes freed by keeping one copy per group
    pub total_reclaimable_bytes: u64,
    /// Wall-clock duration of the scan
    pub scan_duration: Duration,
    /// Roots that were walked, after de-duplication
    pub scanned_paths: Vec<PathBuf>,
    /// Entries and subtrees skipped during the walk
    pub skipped_entries: usize,
    /// Candidates excluded because they could not be hashed
    pub hash_failures: usize,
}

impl ScanSummary {
    /// Percentage of the scanned bytes that is reclaimable.
    #[must_use]
    pub fn wasted_percentage(&self) -> f64 {
        if self.total_size == 0 {
            0.0
        } else {
            (self.total_reclaimable_bytes as f64 / self.total_size as f64) * 100.0
        }
    }

    /// Reclaimable space as a human-readable string.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize::b(self.total_reclaimable_bytes).to_string()
    }

    /// Total scanned size as a human-readable string.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        ByteSize::b(self.total_size).to_string()
    }

    /// Whether any entry or file had to be skipped.
    #[must_use]
    pub fn had_errors(&self) -> bool {
        self.skipped_entries > 0 || self.hash_failures > 0
    }
}

/// Output of a completed scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DuplicateScanResult {
    /// Duplicate groups, ranked by reclaimable bytes
    pub groups: Vec<DuplicateGroup>,
    /// Scan statistics
    pub summary: ScanSummary,
}

impl DuplicateScanResult {
    /// Whether no duplicates were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Every file a downstream cleanup would remove: all group members
    /// except the newest of each group, in group order.
    #[must_use]
    pub fn deletion_candidates(&self) -> Vec<&FileRecord> {
        self.groups
            .iter()
            .flat_map(|g| g.deletion_candidates())
            .collect()
    }
}

/// Errors that end a scan.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The cancellation token was signaled.
    #[error("Scan cancelled")]
    Cancelled,

    /// A requested root does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// A requested root is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),
}

impl From<WalkError> for FinderError {
    fn from(err: WalkError) -> Self {
        match err {
            WalkError::Cancelled => Self::Cancelled,
        }
    }
}

/// State of one scan invocation. Nothing survives past the call that
/// created it.
struct ScanSession<'a> {
    token: &'a CancellationToken,
    progress: &'a dyn ProgressReporter,
    started: Instant,
    summary: ScanSummary,
}

impl<'a> ScanSession<'a> {
    fn new(token: &'a CancellationToken, progress: &'a dyn ProgressReporter) -> Self {
        Self {
            token,
            progress,
            started: Instant::now(),
            summary: ScanSummary::default(),
        }
    }

    fn checkpoint(&self, stage: &str) -> Result<(), FinderError> {
        if self.token.is_cancelled() {
            log::info!("Scan cancelled {stage}");
            return Err(FinderError::Cancelled);
        }
        Ok(())
    }

    fn finish(mut self, groups: Vec<DuplicateGroup>) -> DuplicateScanResult {
        self.summary.total_groups = groups.len();
        self.summary.total_duplicate_files =
            groups.iter().map(DuplicateGroup::duplicate_count).sum();
        self.summary.total_reclaimable_bytes = groups
            .iter()
            .map(DuplicateGroup::reclaimable_bytes)
            .fold(0u64, u64::saturating_add);
        self.summary.scan_duration = self.started.elapsed();

        log::info!(
            "Scan complete: {} duplicate groups, {} duplicate files, {} reclaimable",
            self.summary.total_groups,
            self.summary.total_duplicate_files,
            self.summary.reclaimable_display()
        );

        DuplicateScanResult {
            groups,
            summary: self.summary,
        }
    }
}

/// Duplicate finder that orchestrates the detection pipeline.
///
/// The finder is not re-entrant across overlapping scans of the same token;
/// callers that want concurrency run separate finders on separate threads.
#[derive(Debug, Default)]
pub struct DuplicateFinder {
    config: FinderConfig,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self { config }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Scan according to `options`.
    ///
    /// `options.category` and `options.min_file_size` override the values in
    /// the finder's walker configuration.
    ///
    /// # Errors
    ///
    /// See [`DuplicateFinder::find_duplicates_in_paths`].
    pub fn find_duplicates(&self, options: &ScanOptions) -> Result<DuplicateScanResult, FinderError> {
        let walker_config = WalkerConfig {
            category: options.category,
            min_size: options.min_file_size,
            ..self.config.walker_config.clone()
        };
        self.run(&options.resolved_roots(), walker_config)
    }

    /// Scan `paths` with the finder's walker configuration.
    ///
    /// # Errors
    ///
    /// - [`FinderError::PathNotFound`] / [`FinderError::NotADirectory`] if a
    ///   root is invalid (checked before any work starts)
    /// - [`FinderError::Cancelled`] if the token is signaled at any point
    pub fn find_duplicates_in_paths(
        &self,
        paths: &[PathBuf],
    ) -> Result<DuplicateScanResult, FinderError> {
        self.run(paths, self.config.walker_config.clone())
    }

    /// Find duplicates among an already collected list of files.
    ///
    /// Skips the walk; bucketing, hashing and grouping run as usual.
    ///
    /// # Errors
    ///
    /// Returns [`FinderError::Cancelled`] if the token is signaled.
    pub fn find_duplicates_from_files(
        &self,
        files: Vec<FileRecord>,
    ) -> Result<DuplicateScanResult, FinderError> {
        let mut session = ScanSession::new(&self.config.token, self.config.progress.as_ref());
        session.checkpoint("before analysis")?;
        session.summary.total_files = files.len();
        session.summary.total_size = total_bytes(&files);

        let groups = self.analyze(files, &mut session)?;
        Ok(session.finish(groups))
    }

    fn run(
        &self,
        paths: &[PathBuf],
        walker_config: WalkerConfig,
    ) -> Result<DuplicateScanResult, FinderError> {
        for path in paths {
            validate_root(path)?;
        }

        let mut session = ScanSession::new(&self.config.token, self.config.progress.as_ref());
        session.checkpoint("before start")?;
        session.progress.report(ScanEvent::Initializing);

        let roots = dedupe_roots(paths);
        if roots.is_empty() {
            log::warn!("No directories to scan");
            return Ok(session.finish(Vec::new()));
        }
        log::info!(
            "Starting duplicate scan of {} root(s), category {}, minimum size {}",
            roots.len(),
            walker_config.category,
            ByteSize::b(walker_config.min_size)
        );
        session.summary.scanned_paths = roots.clone();

        // Stage 1: walk
        let outcome = Walker::new(roots, walker_config)
            .with_exclude_patterns(self.config.exclude_patterns.clone())
            .walk(session.token, session.progress)?;

        session.summary.total_files = outcome.files.len();
        session.summary.total_size = total_bytes(&outcome.files);
        session.summary.skipped_entries = outcome.skipped.len();
        log::info!(
            "Found {} files ({}), {} entries skipped",
            session.summary.total_files,
            session.summary.total_size_display(),
            session.summary.skipped_entries
        );
        session.checkpoint("after walking")?;

        let groups = self.analyze(outcome.files, &mut session)?;
        Ok(session.finish(groups))
    }

    /// Stages 2 to 4: bucket, hash, group.
    fn analyze(
        &self,
        files: Vec<FileRecord>,
        session: &mut ScanSession<'_>,
    ) -> Result<Vec<DuplicateGroup>, FinderError> {
        session.progress.report(ScanEvent::Analyzing {
            message: "Grouping files by size".to_string(),
            files_found: files.len(),
        });

        // Stage 2: size buckets
        let buckets = bucket_by_size(files);
        let stats = GroupingStats::from_buckets(&buckets);
        let candidates = filter_candidates(buckets);
        log::info!(
            "Size grouping: {} files -> {} candidates ({:.1}% eliminated)",
            stats.total_files,
            candidates.len(),
            stats.elimination_rate()
        );
        session.checkpoint("after size grouping")?;

        if candidates.is_empty() {
            return Ok(Vec::new());
        }

        // Stage 3: hashing
        let total = candidates.len();
        let mut hashed = Vec::with_capacity(total);
        for (index, record) in candidates.into_iter().enumerate() {
            session.progress.report(ScanEvent::Hashing {
                current: index + 1,
                total,
            });
            match self.config.hasher.hash(&record, session.token) {
                Ok(digest) => {
                    log::trace!("{} {}", digest.hex, record.path.display());
                    hashed.push((record, digest));
                }
                Err(HashError::Cancelled) => {
                    log::info!("Scan cancelled during hashing");
                    return Err(FinderError::Cancelled);
                }
                Err(e) => {
                    match e {
                        HashError::NotFound(_) => log::debug!("Excluding file: {e}"),
                        _ => log::warn!("Excluding file: {e}"),
                    }
                    session.summary.hash_failures += 1;
                }
            }
        }
        session.checkpoint("after hashing")?;

        // Stage 4: group
        session.progress.report(ScanEvent::Analyzing {
            message: "Grouping files by content".to_string(),
            files_found: hashed.len(),
        });
        Ok(group_by_digest(hashed))
    }
}

fn validate_root(path: &Path) -> Result<(), FinderError> {
    if !path.exists() {
        return Err(FinderError::PathNotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(FinderError::NotADirectory(path.to_path_buf()));
    }
    Ok(())
}

/// Sum of file sizes, clamped at `u64::MAX`.
fn total_bytes(files: &[FileRecord]) -> u64 {
    files.iter().fold(0u64, |acc, f| acc.saturating_add(f.size))
}
