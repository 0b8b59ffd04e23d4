//! BLAKE3 content hasher with a size-dependent read policy.
//!
//! # Overview
//!
//! The digest is only ever compared for equality; nothing here is a security
//! boundary. Two strategies are used:
//!
//! - **Full read** for files at or below [`FULL_READ_THRESHOLD`]: the whole
//!   file is streamed through BLAKE3 in [`CHUNK_SIZE`] reads, so memory stays
//!   flat regardless of file size.
//! - **Head + tail** for larger files: the first and last [`CHUNK_SIZE`] bytes
//!   are read through two handles opened one after the other, then folded with
//!   the file length into a single digest.
//!
//! The head+tail strategy has a known false-positive class: two large files
//! of equal length whose first and last chunk match but whose middles differ
//! get the same digest. This bounds I/O on very large files and is kept
//! deliberately; see [`DigestAlgorithm::HeadTail`].

use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::path::Path;

use serde::Serialize;

use super::{FileRecord, HashError};
use crate::signal::CancellationToken;

/// Largest file size (inclusive) hashed by reading the whole file: 10 MiB.
pub const FULL_READ_THRESHOLD: u64 = 10 * 1024 * 1024;

/// Read buffer size, and the head/tail window for large files: 1 MiB.
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// Which read strategy produced a digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum DigestAlgorithm {
    /// BLAKE3 over the entire content.
    #[serde(rename = "blake3")]
    Full,
    /// BLAKE3 over length, first chunk and last chunk.
    ///
    /// Equal digests do not prove equal interiors.
    #[serde(rename = "blake3-head-tail")]
    HeadTail,
}

impl DigestAlgorithm {
    /// Stable tag used in output.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            DigestAlgorithm::Full => "blake3",
            DigestAlgorithm::HeadTail => "blake3-head-tail",
        }
    }
}

/// Digest of one file's content under the hashing policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentDigest {
    /// Size of the file that was hashed
    pub size: u64,
    /// Strategy used
    pub algorithm: DigestAlgorithm,
    /// Lower-case hex BLAKE3 output (64 characters)
    pub hex: String,
}

/// Content hasher.
///
/// Holds only the policy; it is cheap to construct and carries no state
/// between files.
///
/// # Example
///
/// ```no_run
/// use dupescan::scanner::{FileRecord, Hasher};
/// use dupescan::signal::CancellationToken;
/// use std::path::PathBuf;
/// use std::time::SystemTime;
///
/// let record = FileRecord::new(PathBuf::from("movie.mkv"), 4_000_000_000, SystemTime::now());
/// let digest = Hasher::new().hash(&record, &CancellationToken::new()).unwrap();
/// println!("{} {}", digest.algorithm.tag(), digest.hex);
/// ```
#[derive(Debug, Clone)]
pub struct Hasher {
    full_read_threshold: u64,
    chunk_size: usize,
}

impl Default for Hasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Hasher {
    /// Hasher with the standard 10 MiB threshold and 1 MiB chunks.
    #[must_use]
    pub fn new() -> Self {
        Self {
            full_read_threshold: FULL_READ_THRESHOLD,
            chunk_size: CHUNK_SIZE,
        }
    }

    /// Override the full-read threshold.
    #[must_use]
    pub fn with_full_read_threshold(mut self, threshold: u64) -> Self {
        self.full_read_threshold = threshold;
        self
    }

    /// Override the chunk size (minimum 1 byte).
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Strategy that will be used for a file of `size` bytes.
    #[must_use]
    pub fn algorithm_for(&self, size: u64) -> DigestAlgorithm {
        if size <= self.full_read_threshold {
            DigestAlgorithm::Full
        } else {
            DigestAlgorithm::HeadTail
        }
    }

    /// Hash one file.
    ///
    /// The token is polled once, before the file is opened. Once reading has
    /// started the file is either hashed completely or fails as a unit.
    ///
    /// # Errors
    ///
    /// - [`HashError::Cancelled`] if the token was already signaled
    /// - [`HashError::NotFound`] / [`HashError::PermissionDenied`] on open
    /// - [`HashError::Io`] on read errors, or if the file no longer has the
    ///   size recorded during the walk
    pub fn hash(
        &self,
        record: &FileRecord,
        token: &CancellationToken,
    ) -> Result<ContentDigest, HashError> {
        if token.is_cancelled() {
            return Err(HashError::Cancelled);
        }
        self.hash_path(&record.path, record.size)
    }

    /// Hash `path`, which is expected to be `size` bytes long.
    ///
    /// # Errors
    ///
    /// As for [`Hasher::hash`], minus cancellation.
    pub fn hash_path(&self, path: &Path, size: u64) -> Result<ContentDigest, HashError> {
        let algorithm = self.algorithm_for(size);
        let hash = match algorithm {
            DigestAlgorithm::Full => self.full_hash(path, size),
            DigestAlgorithm::HeadTail => self.head_tail_hash(path, size),
        }
        .map_err(|e| HashError::from_io(path, e))?;

        log::trace!("{} {}: {}", algorithm.tag(), path.display(), hash.to_hex());

        Ok(ContentDigest {
            size,
            algorithm,
            hex: hash.to_hex().to_string(),
        })
    }

    /// Stream the whole file through BLAKE3.
    fn full_hash(&self, path: &Path, size: u64) -> io::Result<blake3::Hash> {
        let mut file = File::open(path)?;
        let mut hasher = blake3::Hasher::new();
        let mut buffer = vec![0u8; self.chunk_size];
        let mut total: u64 = 0;

        loop {
            let n = match file.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&buffer[..n]);
            total += n as u64;
        }

        if total != size {
            return Err(size_changed(size, total));
        }
        Ok(hasher.finalize())
    }

    /// Fold length, first chunk and last chunk into one digest.
    fn head_tail_hash(&self, path: &Path, size: u64) -> io::Result<blake3::Hash> {
        let window = (self.chunk_size as u64).min(size);
        let mut buffer = vec![0u8; window as usize];

        let mut hasher = blake3::Hasher::new();
        hasher.update(&size.to_le_bytes());

        {
            let mut head = File::open(path)?;
            let actual = head.metadata()?.len();
            if actual != size {
                return Err(size_changed(size, actual));
            }
            head.read_exact(&mut buffer)?;
            hasher.update(&buffer);
        }

        {
            let mut tail = File::open(path)?;
            tail.seek(SeekFrom::Start(size - window))?;
            tail.read_exact(&mut buffer)?;
            hasher.update(&buffer);
        }

        Ok(hasher.finalize())
    }
}

fn size_changed(expected: u64, actual: u64) -> io::Error {
    io::Error::new(
        io::ErrorKind::UnexpectedEof,
        format!("file changed size since scan (expected {expected} bytes, found {actual})"),
    )
}
