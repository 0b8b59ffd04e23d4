//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Size bucketing (files with a unique size are never hashed)
//! - Grouping hashed files by content digest
//! - The [`DuplicateFinder`] orchestrator running a whole scan

pub mod finder;
pub mod groups;

pub use finder::{
    default_roots, DuplicateFinder, DuplicateScanResult, FinderConfig, FinderError, ScanOptions,
    ScanSummary,
};
pub use groups::{
    bucket_by_size, filter_candidates, group_by_digest, DuplicateGroup, GroupingStats,
};
