//! Logging setup for the `dupescan` binary.
//!
//! The library only talks to the `log` facade; the binary installs an
//! `env_logger` backend here. The level comes from, in priority order:
//!
//! 1. `RUST_LOG` (if set)
//! 2. `--quiet` (errors only) or `--verbose` (debug, `-vv` trace)
//! 3. info
//!
//! Debug builds prefix each line with a timestamp (and the module path when
//! verbose); release builds print only level and message. Logs go to stderr
//! so they never mix with JSON or CSV written to stdout.
//!
//! # Example
//!
//! ```rust,no_run
//! use dupescan::logging::init_logging;
//!
//! init_logging(1, false, false).expect("logger already installed");
//! log::debug!("visible with -v");
//! ```

use std::env;
use std::io::Write;

use env_logger::{Builder, Target, WriteStyle};
use log::{LevelFilter, SetLoggerError};

/// Install the global logger.
///
/// # Arguments
///
/// * `verbose` - Verbosity count from CLI (0=info, 1=debug, 2+=trace)
/// * `quiet` - Only show errors (overridden by `RUST_LOG`)
/// * `no_color` - Never emit ANSI styles
///
/// # Errors
///
/// Returns an error if a logger has already been installed in this process.
pub fn init_logging(verbose: u8, quiet: bool, no_color: bool) -> Result<(), SetLoggerError> {
    let rust_log = env::var("RUST_LOG").ok();

    let mut builder = Builder::new();
    builder.target(Target::Stderr);
    match &rust_log {
        Some(filters) => {
            builder.parse_filters(filters);
        }
        None => {
            builder.filter_level(determine_level(verbose, quiet));
        }
    }
    if no_color {
        builder.write_style(WriteStyle::Never);
    }
    configure_format(&mut builder, verbose);
    builder.try_init()?;

    match rust_log {
        Some(filters) => log::debug!("Logging configured from RUST_LOG={filters}"),
        None => log::debug!("Logging initialized at level {}", current_level_name()),
    }
    Ok(())
}

/// Map CLI flags to a level. `quiet` wins over `verbose`.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[cfg(debug_assertions)]
fn configure_format(builder: &mut Builder, verbose: u8) {
    builder.format(move |buf, record| {
        let style = buf.default_level_style(record.level());
        let timestamp = buf.timestamp_seconds();
        if verbose > 0 {
            writeln!(
                buf,
                "{timestamp} {style}{:<5}{style:#} [{}] {}",
                record.level(),
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        } else {
            writeln!(
                buf,
                "{timestamp} {style}{:<5}{style:#} {}",
                record.level(),
                record.args()
            )
        }
    });
}

#[cfg(not(debug_assertions))]
fn configure_format(builder: &mut Builder, _verbose: u8) {
    builder.format(|buf, record| {
        let style = buf.default_level_style(record.level());
        writeln!(buf, "{style}{:<5}{style:#} {}", record.level(), record.args())
    });
}

/// Name of the currently active maximum level.
#[must_use]
pub fn current_level_name() -> &'static str {
    match log::max_level() {
        LevelFilter::Off => "off",
        LevelFilter::Error => "error",
        LevelFilter::Warn => "warn",
        LevelFilter::Info => "info",
        LevelFilter::Debug => "debug",
        LevelFilter::Trace => "trace",
    }
}
