//! Size bucketing and duplicate group assembly.
//!
//! # Overview
//!
//! Two pure stages of duplicate detection live here:
//!
//! - **Size bucketing** runs before any file is opened. Files with different
//!   sizes cannot be duplicates, so every size seen only once is discarded
//!   and never hashed.
//! - **Digest grouping** runs after hashing. Records sharing a
//!   [`ContentDigest`] form a [`DuplicateGroup`]; singletons are dropped and
//!   the remaining groups are ranked by reclaimable space.
//!
//! # Example
//!
//! ```
//! use dupescan::duplicates::{bucket_by_size, filter_candidates};
//! use dupescan::scanner::FileRecord;
//! use std::path::PathBuf;
//! use std::time::SystemTime;
//!
//! let files = vec![
//!     FileRecord::new(PathBuf::from("/file1.txt"), 1024, SystemTime::now()),
//!     FileRecord::new(PathBuf::from("/file2.txt"), 1024, SystemTime::now()),
//!     FileRecord::new(PathBuf::from("/file3.txt"), 2048, SystemTime::now()),
//! ];
//!
//! let buckets = bucket_by_size(files);
//! assert_eq!(buckets.len(), 2);
//!
//! // Only the two 1024-byte files are worth hashing
//! let candidates = filter_candidates(buckets);
//! assert_eq!(candidates.len(), 2);
//! ```

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use crate::scanner::{ContentDigest, FileRecord};

/// A confirmed set of files with identical content.
///
/// Built only by [`group_by_digest`]; every group has at least two members,
/// all of the same size, ordered newest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// 1-based rank of this group in the result
    pub id: usize,
    /// Size in bytes shared by every member
    pub size: u64,
    /// Digest shared by every member
    pub digest: ContentDigest,
    /// Members, newest modification time first
    pub files: Vec<FileRecord>,
}

impl DuplicateGroup {
    /// Number of files in this group.
    #[must_use]
    pub fn count(&self) -> usize {
        self.files.len()
    }

    /// Bytes freed by keeping one copy: `size * (count - 1)`.
    #[must_use]
    pub fn reclaimable_bytes(&self) -> u64 {
        self.size
            .saturating_mul(self.duplicate_count() as u64)
    }

    /// Number of redundant copies (count minus the one kept).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Total bytes occupied by all members.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.size.saturating_mul(self.files.len() as u64)
    }

    /// The member that would be kept: the most recently modified one.
    #[must_use]
    pub fn newest(&self) -> Option<&FileRecord> {
        self.files.first()
    }

    /// Every member except the newest.
    ///
    /// This is what a downstream delete or move-to-trash step would act on;
    /// the engine itself never removes anything.
    #[must_use]
    pub fn deletion_candidates(&self) -> &[FileRecord] {
        self.files.get(1..).unwrap_or(&[])
    }
}

/// Statistics from the size bucketing stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files bucketed
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of distinct file sizes
    pub unique_sizes: usize,
    /// Files sharing their size with at least one other file
    pub candidates: usize,
    /// Files eliminated because their size is unique
    pub eliminated_unique: usize,
}

impl GroupingStats {
    /// Compute statistics for a set of buckets.
    #[must_use]
    pub fn from_buckets(buckets: &HashMap<u64, Vec<FileRecord>>) -> Self {
        let mut stats = Self {
            unique_sizes: buckets.len(),
            ..Self::default()
        };
        for (size, files) in buckets {
            stats.total_files += files.len();
            stats.total_size = stats
                .total_size
                .saturating_add(size.saturating_mul(files.len() as u64));
            if files.len() > 1 {
                stats.candidates += files.len();
            } else {
                stats.eliminated_unique += files.len();
            }
        }
        stats
    }

    /// Percentage of files eliminated by size alone.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Partition records by exact size.
///
/// Every member of a bucket has `size` equal to the bucket key. No file I/O
/// is performed.
#[must_use]
pub fn bucket_by_size(
    records: impl IntoIterator<Item = FileRecord>,
) -> HashMap<u64, Vec<FileRecord>> {
    let mut buckets: HashMap<u64, Vec<FileRecord>> = HashMap::new();
    for record in records {
        buckets.entry(record.size).or_default().push(record);
    }
    buckets
}

/// Flatten the buckets with two or more members into a hashing work list.
///
/// Singleton buckets are dropped. The result is ordered by size, then path,
/// so hashing visits files in a deterministic order.
///
/// # Example
///
/// ```
/// use dupescan::duplicates::{bucket_by_size, filter_candidates};
/// use dupescan::scanner::FileRecord;
/// use std::path::PathBuf;
/// use std::time::SystemTime;
///
/// let files = vec![
///     FileRecord::new(PathBuf::from("/b.txt"), 100, SystemTime::now()),
///     FileRecord::new(PathBuf::from("/a.txt"), 100, SystemTime::now()),
///     FileRecord::new(PathBuf::from("/c.txt"), 200, SystemTime::now()),
/// ];
///
/// let candidates = filter_candidates(bucket_by_size(files));
/// let names: Vec<_> = candidates.iter().map(|f| f.name.as_str()).collect();
/// assert_eq!(names, ["a.txt", "b.txt"]);
/// ```
#[must_use]
pub fn filter_candidates(buckets: HashMap<u64, Vec<FileRecord>>) -> Vec<FileRecord> {
    let mut candidates: Vec<FileRecord> = buckets
        .into_iter()
        .filter(|(size, files)| {
            if files.len() < 2 {
                log::trace!(
                    "Eliminated unique size {}: {}",
                    size,
                    files
                        .first()
                        .map(|f| f.path.display().to_string())
                        .unwrap_or_default()
                );
                return false;
            }
            true
        })
        .flat_map(|(_, files)| files)
        .collect();

    candidates.sort_by(|a, b| a.size.cmp(&b.size).then_with(|| a.path.cmp(&b.path)));
    candidates
}

/// Group hashed records into ranked duplicate groups.
///
/// Records are grouped on their full digest (size, algorithm and hex).
/// Groups with fewer than two members are dropped. Within a group members are
/// ordered newest first, ties broken by path. Groups are ordered by
/// reclaimable bytes descending, then size descending, then digest, and then
/// numbered from 1.
#[must_use]
pub fn group_by_digest(
    hashed: impl IntoIterator<Item = (FileRecord, ContentDigest)>,
) -> Vec<DuplicateGroup> {
    let mut by_digest: BTreeMap<ContentDigest, Vec<FileRecord>> = BTreeMap::new();
    for (record, digest) in hashed {
        debug_assert_eq!(record.size, digest.size);
        by_digest.entry(digest).or_default().push(record);
    }

    let mut groups: Vec<DuplicateGroup> = by_digest
        .into_iter()
        .filter(|(_, files)| files.len() > 1)
        .map(|(digest, mut files)| {
            files.sort_by(newest_first);
            DuplicateGroup {
                id: 0,
                size: digest.size,
                digest,
                files,
            }
        })
        .collect();

    groups.sort_by(|a, b| {
        b.reclaimable_bytes()
            .cmp(&a.reclaimable_bytes())
            .then_with(|| b.size.cmp(&a.size))
            .then_with(|| a.digest.hex.cmp(&b.digest.hex))
    });
    for (index, group) in groups.iter_mut().enumerate() {
        group.id = index + 1;
    }

    log::debug!("Grouped hashed files into {} duplicate groups", groups.len());
    groups
}

fn newest_first(a: &FileRecord, b: &FileRecord) -> Ordering {
    b.modified
        .cmp(&a.modified)
        .then_with(|| a.path.cmp(&b.path))
}
