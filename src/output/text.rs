//! Human-readable report for terminals.
//!
//! ```text
//! Group 1: 2 files, 488.3 KiB each (976.6 KiB total), 488.3 KiB reclaimable
//!   KEEP  /home/user/Downloads/report.pdf  (2024-05-01T10:00:00Z)
//!   DUP   /home/user/Documents/report.pdf  (2023-12-24T08:30:00Z)
//!
//! Scanned 1,204 files (3.2 GiB) in 4.71s
//! Found 1 duplicate group, 1 duplicate file, 488.3 KiB reclaimable (0.0%)
//! ```
//!
//! The newest file of each group is marked `KEEP`; the others are the
//! deletion candidates.

use std::io::{self, Write};

use bytesize::ByteSize;
use yansi::{Condition, Paint};

use super::format_modified;
use crate::duplicates::{DuplicateGroup, DuplicateScanResult};

/// Plain-text report writer.
pub struct TextOutput<'a> {
    result: &'a DuplicateScanResult,
    color: bool,
}

impl<'a> TextOutput<'a> {
    /// Create a report for `result`, without colors.
    #[must_use]
    pub fn new(result: &'a DuplicateScanResult) -> Self {
        Self {
            result,
            color: false,
        }
    }

    /// Enable or disable ANSI colors.
    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    fn condition(&self) -> Condition {
        if self.color {
            Condition::ALWAYS
        } else {
            Condition::NEVER
        }
    }

    /// Write the report.
    ///
    /// # Errors
    ///
    /// Returns any error from `writer`.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        for group in &self.result.groups {
            self.write_group(writer, group)?;
            writeln!(writer)?;
        }
        self.write_summary(writer)
    }

    /// Render the report into a string.
    ///
    /// # Errors
    ///
    /// Never fails in practice; writing into a `Vec` cannot error.
    pub fn to_string(&self) -> io::Result<String> {
        let mut buffer = Vec::new();
        self.write_to(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    fn write_group<W: Write>(&self, writer: &mut W, group: &DuplicateGroup) -> io::Result<()> {
        let when = self.condition();
        let heading = format!("Group {}", group.id);
        writeln!(
            writer,
            "{}: {} files, {} each ({} total), {} reclaimable",
            heading.bold().whenever(when),
            group.count(),
            ByteSize::b(group.size),
            ByteSize::b(group.total_size()),
            ByteSize::b(group.reclaimable_bytes())
                .to_string()
                .yellow()
                .whenever(when)
        )?;

        for (index, file) in group.files.iter().enumerate() {
            let marker = if index == 0 {
                "KEEP".green().whenever(when)
            } else {
                "DUP ".red().whenever(when)
            };
            writeln!(
                writer,
                "  {}  {}  ({})",
                marker,
                file.path.display(),
                format_modified(file.modified)
            )?;
        }
        Ok(())
    }

    fn write_summary<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        let summary = &self.result.summary;
        writeln!(
            writer,
            "Scanned {} files ({}) in {:.2}s",
            summary.total_files,
            summary.total_size_display(),
            summary.scan_duration.as_secs_f64()
        )?;

        if summary.total_groups == 0 {
            writeln!(writer, "No duplicates found")?;
        } else {
            writeln!(
                writer,
                "Found {} duplicate {}, {} duplicate {}, {} reclaimable ({:.1}%)",
                summary.total_groups,
                plural(summary.total_groups, "group", "groups"),
                summary.total_duplicate_files,
                plural(summary.total_duplicate_files, "file", "files"),
                summary.reclaimable_display(),
                summary.wasted_percentage()
            )?;
        }

        if summary.had_errors() {
            writeln!(
                writer,
                "Skipped {} unreadable {} and {} {} that could not be hashed",
                summary.skipped_entries,
                plural(summary.skipped_entries, "entry", "entries"),
                summary.hash_failures,
                plural(summary.hash_failures, "file", "files")
            )?;
        }
        Ok(())
    }
}

fn plural<'s>(count: usize, one: &'s str, many: &'s str) -> &'s str {
    if count == 1 {
        one
    } else {
        many
    }
}
