//! Best-effort progress notifications.
//!
//! The engine emits [`ScanEvent`]s through a [`ProgressReporter`]. Delivery is
//! coarse (every Nth qualifying file while walking, every file while hashing)
//! and never affects correctness: a reporter that drops events, or a channel
//! whose receiver has gone away, must not slow down or fail the scan.
//!
//! Three reporters ship with the crate:
//! - [`NullReporter`]: discards everything (the default),
//! - `std::sync::mpsc::Sender<ScanEvent>`: forwards events to another thread,
//! - [`Progress`]: indicatif spinner/bar for terminal use.

use std::path::PathBuf;
use std::sync::mpsc::Sender;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// A stage notification from a running scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// Roots resolved, nothing read yet.
    Initializing,
    /// Walking directories.
    Scanning {
        /// Directory or root currently being walked
        current_path: PathBuf,
        /// Qualifying files found so far
        files_found: usize,
    },
    /// Between walking and hashing (size bucketing, grouping).
    Analyzing {
        /// Human-readable stage description
        message: String,
        /// Files the stage is working on
        files_found: usize,
    },
    /// Hashing candidate files.
    Hashing {
        /// 1-based index of the file about to be hashed
        current: usize,
        /// Number of candidates to hash
        total: usize,
    },
}

/// Sink for scan progress.
///
/// Implementations must return quickly and must not panic; the engine calls
/// `report` inline on its single thread of control.
pub trait ProgressReporter: Send + Sync {
    /// Receive one event.
    fn report(&self, event: ScanEvent);
}

/// Reporter that ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReporter;

impl ProgressReporter for NullReporter {
    fn report(&self, _event: ScanEvent) {}
}

impl ProgressReporter for Sender<ScanEvent> {
    fn report(&self, event: ScanEvent) {
        // A hung-up receiver just means nobody is listening any more.
        let _ = self.send(event);
    }
}

/// Terminal progress reporter using indicatif.
///
/// Shows a spinner while walking and a bar while hashing.
pub struct Progress {
    multi: MultiProgress,
    walking: Mutex<Option<ProgressBar>>,
    hashing: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, no progress bars will be displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use dupescan::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            walking: Mutex::new(None),
            hashing: Mutex::new(None),
            quiet,
        }
    }

    /// Finish and clear any bars still on screen.
    pub fn finish(&self) {
        if let Some(pb) = lock(&self.walking).take() {
            pb.finish_and_clear();
        }
        if let Some(pb) = lock(&self.hashing).take() {
            pb.finish_and_clear();
        }
    }

    fn walking_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] {pos} files")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn hashing_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} (ETA: {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    fn walking_bar(&self) -> ProgressBar {
        let mut walking = lock(&self.walking);
        walking
            .get_or_insert_with(|| {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::walking_style());
                pb.enable_steady_tick(Duration::from_millis(100));
                pb
            })
            .clone()
    }
}

impl ProgressReporter for Progress {
    fn report(&self, event: ScanEvent) {
        if self.quiet {
            return;
        }

        match event {
            ScanEvent::Initializing => {
                self.walking_bar().set_message("Preparing scan");
            }
            ScanEvent::Scanning {
                current_path,
                files_found,
            } => {
                let pb = self.walking_bar();
                pb.set_position(files_found as u64);
                pb.set_message(truncate_path(&current_path.to_string_lossy(), 40));
            }
            ScanEvent::Analyzing {
                message,
                files_found,
            } => {
                if let Some(pb) = lock(&self.walking).take() {
                    pb.finish_with_message(format!("Found {files_found} files"));
                }
                log::debug!("{message}");
            }
            ScanEvent::Hashing { current, total } => {
                let mut hashing = lock(&self.hashing);
                let pb = hashing.get_or_insert_with(|| {
                    let pb = self.multi.add(ProgressBar::new(total as u64));
                    pb.set_style(Self::hashing_style());
                    pb.set_message("Hashing");
                    pb
                });
                pb.set_position(current as u64);
                if current >= total {
                    pb.finish_with_message("Hashing complete");
                }
            }
        }
    }
}

/// Lock a bar slot, recovering from a poisoned mutex.
fn lock(slot: &Mutex<Option<ProgressBar>>) -> MutexGuard<'_, Option<ProgressBar>> {
    slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len + 4 > max_len {
        let tail: String = file_name
            .chars()
            .skip(name_len.saturating_sub(max_len.saturating_sub(3)))
            .collect();
        return format!("...{tail}");
    }

    format!(".../{file_name}")
}
