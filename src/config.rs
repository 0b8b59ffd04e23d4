//! Layered application configuration.
//!
//! Values are merged with figment, later layers winning:
//!
//! 1. built-in defaults ([`Config::default`])
//! 2. a TOML file: `--config PATH`, else `config.toml` in the platform config
//!    directory (a missing default file is not an error)
//! 3. environment variables prefixed `DUPESCAN_` (e.g. `DUPESCAN_MIN_FILE_SIZE`)
//! 4. command-line flags ([`ConfigOverrides`])
//!
//! # Example file
//!
//! ```toml
//! category = "images"
//! min_file_size = 4096
//! roots = ["/home/user/Pictures", "/mnt/backup/photos"]
//! exclude = ["thumbnails"]
//! progress_interval = 250
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::duplicates::ScanOptions;
use crate::scanner::{FileCategory, WalkerConfig, DEFAULT_MIN_FILE_SIZE};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "DUPESCAN_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Category of files to scan.
    pub category: FileCategory,
    /// Ignore files smaller than this many bytes.
    pub min_file_size: u64,
    /// Directories to scan when none are given on the command line.
    pub roots: Vec<PathBuf>,
    /// Extra directory patterns to skip.
    pub exclude: Vec<String>,
    /// Report walk progress every this many files.
    pub progress_interval: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            category: FileCategory::All,
            min_file_size: DEFAULT_MIN_FILE_SIZE,
            roots: Vec::new(),
            exclude: Vec::new(),
            progress_interval: WalkerConfig::default().progress_interval,
        }
    }
}

/// Values supplied on the command line. Unset fields leave lower layers alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConfigOverrides {
    /// `--category`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<FileCategory>,
    /// `--min-size`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_file_size: Option<u64>,
    /// Positional paths
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roots: Vec<PathBuf>,
    /// `--exclude`
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

/// Errors raised while loading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// A layer could not be parsed or has a value of the wrong type.
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] figment::Error),

    /// The configuration could not be rendered as TOML.
    #[error("Cannot render configuration: {0}")]
    Render(#[from] toml::ser::Error),
}

impl Config {
    /// Build the layered figment without extracting it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if `explicit` names a missing file.
    pub fn figment(
        explicit: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Figment, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                log::debug!("Loading config from {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
            None => {
                if let Some(path) = default_config_path().filter(|p| p.is_file()) {
                    log::debug!("Loading config from {}", path.display());
                    figment = figment.merge(Toml::file(path));
                }
            }
        }

        Ok(figment
            .merge(Env::prefixed(ENV_PREFIX).ignore(&["config"]))
            .merge(Serialized::defaults(overrides)))
    }

    /// Load the effective configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a file is missing or a layer is invalid.
    pub fn load(explicit: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self, ConfigError> {
        let config: Config = Self::figment(explicit, overrides)?.extract()?;
        log::debug!("Effective configuration: {config:?}");
        Ok(config)
    }

    /// Render as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Render`] if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Walker settings derived from this configuration.
    #[must_use]
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig {
            category: self.category,
            min_size: self.min_file_size,
            progress_interval: self.progress_interval.max(1),
        }
    }

    /// Scan request derived from this configuration.
    #[must_use]
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            root_paths: self.roots.clone(),
            category: self.category,
            min_file_size: self.min_file_size,
        }
    }
}

/// `config.toml` in the platform configuration directory, if one exists for
/// this user.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "dupescan").map(|dirs| dirs.config_dir().join("config.toml"))
}
