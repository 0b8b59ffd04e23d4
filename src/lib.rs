//! dupescan - content-based duplicate file detection.
//!
//! Scans directory trees, finds files whose content is identical, and reports
//! them as ranked groups with the space that removing the extra copies would
//! free. Small files are hashed in full with BLAKE3; files over 10 MiB are
//! identified by their size plus first and last MiB.
//!
//! The engine never deletes anything. It runs on the calling thread, can be
//! cancelled through a [`signal::CancellationToken`], and skips unreadable
//! entries instead of failing.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::{DuplicateFinder, ScanOptions};
//! use std::path::PathBuf;
//!
//! let options = ScanOptions {
//!     root_paths: vec![PathBuf::from("/home/user/Downloads")],
//!     ..Default::default()
//! };
//! let result = DuplicateFinder::with_defaults().find_duplicates(&options)?;
//! println!("{} bytes reclaimable", result.summary.total_reclaimable_bytes);
//! # Ok::<(), dupescan::duplicates::FinderError>(())
//! ```

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;
pub mod signal;

use std::io::{self, IsTerminal, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;

use cli::{Cli, Commands, ConfigArgs, OutputFormat, ScanArgs};
use config::{Config, ConfigOverrides};
use duplicates::{DuplicateFinder, DuplicateScanResult, FinderConfig};
use error::ExitCode;
use output::{CsvOutput, JsonOutput, TextOutput};
use progress::Progress;

/// Run the application for parsed command-line arguments.
///
/// # Errors
///
/// Returns an error if configuration is invalid, a root is invalid, the scan
/// is cancelled, or output cannot be written.
pub fn run_app(cli: Cli) -> anyhow::Result<ExitCode> {
    let Cli {
        verbose,
        quiet,
        no_color,
        config,
        command,
        ..
    } = cli;

    if let Err(e) = logging::init_logging(verbose, quiet, no_color) {
        eprintln!("Warning: logging already initialized: {e}");
    }

    match command {
        Commands::Scan(args) => run_scan(args, config.as_deref(), quiet, no_color),
        Commands::Config(args) => show_config(&args, config.as_deref()),
    }
}

fn run_scan(
    args: ScanArgs,
    config_path: Option<&Path>,
    quiet: bool,
    no_color: bool,
) -> anyhow::Result<ExitCode> {
    let config =
        Config::load(config_path, &args.overrides()).context("Failed to load configuration")?;

    let token = match signal::install_handler() {
        Ok(token) => token,
        Err(e) => {
            log::warn!("{e}; Ctrl+C will terminate without cleanup");
            signal::CancellationToken::new()
        }
    };

    let show_progress = !args.no_progress && !quiet && io::stderr().is_terminal();
    let progress = Arc::new(Progress::new(!show_progress));

    let finder = DuplicateFinder::new(
        FinderConfig::default()
            .with_walker_config(config.walker_config())
            .with_exclude_patterns(config.exclude.clone())
            .with_cancellation_token(token)
            .with_progress_reporter(progress.clone()),
    );

    let result = finder.find_duplicates(&config.scan_options());
    progress.finish();
    let result = result?;

    let stdout = io::stdout();
    let color = !no_color && stdout.is_terminal();
    let mut out = stdout.lock();
    write_result(&result, args.output, args.pretty, color, &mut out)?;
    out.flush().context("Failed to flush output")?;

    Ok(ExitCode::for_result(&result))
}

/// Write a scan result in the requested format.
///
/// # Errors
///
/// Returns an error if serialization or writing fails.
pub fn write_result<W: Write>(
    result: &DuplicateScanResult,
    format: OutputFormat,
    pretty: bool,
    color: bool,
    writer: &mut W,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => TextOutput::new(result)
            .with_color(color)
            .write_to(writer)
            .context("Failed to write report")?,
        OutputFormat::Json => JsonOutput::new(result)
            .write_to(writer, pretty)
            .context("Failed to write JSON output")?,
        OutputFormat::Csv => CsvOutput::new(&result.groups)
            .write_to(writer)
            .context("Failed to write CSV output")?,
    }
    Ok(())
}

fn show_config(args: &ConfigArgs, config_path: Option<&Path>) -> anyhow::Result<ExitCode> {
    if args.path {
        let path = config_path
            .map(Path::to_path_buf)
            .or_else(config::default_config_path)
            .context("No configuration directory for this user")?;
        println!("{}", path.display());
    } else {
        let config = Config::load(config_path, &ConfigOverrides::default())
            .context("Failed to load configuration")?;
        print!("{}", config.to_toml()?);
    }
    Ok(ExitCode::Success)
}
