//! Command-line interface definitions for dupescan.
//!
//! Global options (verbosity, color, error format, config file) apply to every
//! subcommand.
//!
//! # Example
//!
//! ```bash
//! # Scan the default user folders and print a report
//! dupescan scan
//!
//! # Scan two directories for duplicate images, JSON output
//! dupescan scan ~/Pictures /mnt/backup/photos --category images --output json
//!
//! # Larger files only
//! dupescan scan ~/Downloads --min-size 10MiB
//!
//! # Show the effective configuration
//! dupescan config
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::config::ConfigOverrides;
use crate::scanner::FileCategory;

/// Find files with identical content and report how much space they waste.
#[derive(Debug, Parser)]
#[command(name = "dupescan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Report fatal errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Configuration file (TOML). Defaults to the platform config directory.
    #[arg(long, global = true, value_name = "PATH", env = "DUPESCAN_CONFIG")]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan directories for duplicate files
    Scan(ScanArgs),
    /// Print the effective configuration
    Config(ConfigArgs),
}

/// Arguments for the scan subcommand.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directories to scan. Defaults to the configured roots, or the user's
    /// Documents, Downloads, Pictures, Music, Videos and Desktop folders.
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Only consider files of this category
    #[arg(short, long, value_name = "CATEGORY", value_parser = parse_category)]
    pub category: Option<FileCategory>,

    /// Minimum file size to consider (e.g., 1KB, 1MiB)
    ///
    /// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB, TB, TiB
    #[arg(long, value_name = "SIZE", value_parser = parse_size)]
    pub min_size: Option<u64>,

    /// Extra directory names or path fragments to skip (repeatable)
    #[arg(short, long = "exclude", value_name = "PATTERN")]
    pub exclude_patterns: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Do not show progress bars
    #[arg(long)]
    pub no_progress: bool,
}

impl ScanArgs {
    /// The configuration values given on the command line.
    #[must_use]
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            category: self.category,
            min_file_size: self.min_size,
            roots: self.paths.clone(),
            exclude: self.exclude_patterns.clone(),
        }
    }
}

/// Arguments for the config subcommand.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Print the default configuration file location instead
    #[arg(long)]
    pub path: bool,
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report
    Text,
    /// JSON for scripting
    Json,
    /// CSV, one row per file
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}

/// Parse a category name for clap.
///
/// # Errors
///
/// Returns the parse error message for unknown names.
pub fn parse_category(s: &str) -> Result<FileCategory, String> {
    s.parse().map_err(|e: crate::scanner::ParseCategoryError| e.to_string())
}

/// Size suffixes accepted on the command line, matched case-insensitively.
/// A bare letter means the decimal unit.
const SIZE_UNITS: &[(&str, u64)] = &[
    ("", 1),
    ("b", 1),
    ("k", bytesize::KB),
    ("kb", bytesize::KB),
    ("kib", bytesize::KIB),
    ("m", bytesize::MB),
    ("mb", bytesize::MB),
    ("mib", bytesize::MIB),
    ("g", bytesize::GB),
    ("gb", bytesize::GB),
    ("gib", bytesize::GIB),
    ("t", bytesize::TB),
    ("tb", bytesize::TB),
    ("tib", bytesize::TIB),
];

/// Parse a `--min-size` value such as `512`, `1.5MB` or `10 MiB` into bytes.
///
/// ```
/// use dupescan::cli::parse_size;
///
/// assert_eq!(parse_size("1024").unwrap(), 1024);
/// assert_eq!(parse_size("1KB").unwrap(), 1000);
/// assert_eq!(parse_size("1KiB").unwrap(), 1024);
/// assert_eq!(parse_size("10MiB").unwrap(), 10_485_760);
/// ```
///
/// # Errors
///
/// Empty input, a negative or malformed amount, an unknown suffix, or a
/// result that does not fit in `u64`.
pub fn parse_size(input: &str) -> Result<u64, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("Size cannot be empty".to_string());
    }
    if input.starts_with('-') {
        return Err("Size cannot be negative".to_string());
    }

    let split = input
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || *c == '.'))
        .map_or(input.len(), |(idx, _)| idx);
    let (amount, unit) = input.split_at(split);
    let unit = unit.trim().to_ascii_lowercase();

    let amount: f64 = amount
        .parse()
        .map_err(|_| format!("Invalid number: '{amount}'"))?;
    let multiplier = SIZE_UNITS
        .iter()
        .find(|(suffix, _)| *suffix == unit)
        .map(|(_, multiplier)| *multiplier)
        .ok_or_else(|| format!("Unknown size suffix: '{unit}'"))?;

    let bytes = amount * multiplier as f64;
    if bytes >= u64::MAX as f64 {
        return Err(format!("Size too large: '{input}'"));
    }
    Ok(bytes as u64)
}
