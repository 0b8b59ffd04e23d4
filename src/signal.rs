//! Cooperative cancellation and Ctrl+C handling.
//!
//! The engine never interrupts work asynchronously. Instead every stage
//! polls a shared [`CancellationToken`] at fixed safe points:
//!
//! - the walker, once per yielded directory entry (which includes each
//!   directory before its children are listed),
//! - the hasher, once per file before it is opened,
//! - the finder, between stages.
//!
//! A signaled token surfaces as [`crate::duplicates::FinderError::Cancelled`].
//!
//! # Usage
//!
//! ```rust,no_run
//! use dupescan::signal::install_handler;
//!
//! // Ctrl+C now cancels whatever scan holds this token
//! let token = install_handler().expect("Failed to install signal handler");
//!
//! if token.is_cancelled() {
//!     println!("Cancelled before we started");
//! }
//! ```
//!
//! # Exit Codes
//!
//! When a signal is received:
//! - The token is signaled
//! - A message "Interrupted. Cancelling scan..." is printed to stderr
//! - The application should exit with code 130 (128 + SIGINT)

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Exit code for SIGINT (Ctrl+C) interruption.
/// This follows Unix convention: 128 + signal number (SIGINT = 2).
pub const EXIT_CODE_INTERRUPTED: i32 = 130;

/// Shared, polled cancellation signal.
///
/// Cloning is cheap and every clone observes the same flag, so the caller
/// keeps one clone and hands another to the scan.
///
/// # Example
///
/// ```
/// use dupescan::signal::CancellationToken;
///
/// let token = CancellationToken::new();
/// let for_scan = token.clone();
///
/// token.cancel();
/// assert!(for_scan.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a token that is not yet signaled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Whether cancellation has been requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Clear the flag so the token can drive another scan.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the Ctrl+C handler.
    #[error("Failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static GLOBAL_TOKEN: OnceLock<CancellationToken> = OnceLock::new();

/// Install a Ctrl+C handler that signals the returned token.
///
/// Only one process-wide handler can exist. Later calls (tests calling
/// `run_app()` in parallel, for instance) get the already registered token
/// back, reset to the unsignaled state. If some other component owns the
/// Ctrl+C hook, an unhooked token is returned instead; it still works for
/// manual [`CancellationToken::cancel`] calls.
///
/// # Errors
///
/// Currently never fails; the `Result` is kept so callers do not need to
/// change if registration failure becomes fatal.
pub fn install_handler() -> Result<CancellationToken, SignalError> {
    if let Some(token) = GLOBAL_TOKEN.get() {
        token.reset();
        return Ok(token.clone());
    }

    let token = CancellationToken::new();
    let hooked = token.clone();

    match ctrlc::set_handler(move || {
        hooked.cancel();

        let _ = writeln!(std::io::stderr(), "\nInterrupted. Cancelling scan...");
        let _ = std::io::stderr().flush();

        log::info!("Cancellation signal received");
    }) {
        Ok(()) => {
            let _ = GLOBAL_TOKEN.set(token.clone());
            Ok(token)
        }
        Err(_) => {
            if let Some(existing) = GLOBAL_TOKEN.get() {
                existing.reset();
                Ok(existing.clone())
            } else {
                log::debug!("Ctrl+C handler already registered, using unhooked token");
                let fallback = CancellationToken::new();
                let _ = GLOBAL_TOKEN.set(fallback.clone());
                Ok(fallback)
            }
        }
    }
}
