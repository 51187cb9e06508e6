//! Configuration file support
//!
//! Settings are read from TOML, first `./docoutline.toml`, then
//! `<config_dir>/docoutline/config.toml`. Command-line values override the
//! file through [`Config::merge_with_cli`].

use std::fs;
use std::path::{Path, PathBuf};

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::outline::{InputFormat, OutlineOptions, DEFAULT_ENCODING, DEFAULT_LINES_PER_PAGE};

/// Local config file name
pub const LOCAL_CONFIG_FILE: &str = "docoutline.toml";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config value: {0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// File configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Lines per page for page estimation
    pub lines_per_page: u32,

    /// Encoding label for Markdown input
    pub encoding: String,

    /// Pretty-print JSON output
    pub pretty: bool,

    /// Validate output before writing
    pub validate: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            lines_per_page: DEFAULT_LINES_PER_PAGE,
            encoding: DEFAULT_ENCODING.to_string(),
            pretty: false,
            validate: false,
        }
    }
}

impl Config {
    /// Load the first config file found in [`Config::search_paths`]
    ///
    /// No file at all gives the defaults.
    pub fn load() -> Result<Self> {
        for path in Self::search_paths() {
            if path.is_file() {
                return Self::load_from_path(&path);
            }
        }
        Ok(Self::default())
    }

    /// Load a specific config file
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and check a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> Result<()> {
        if self.lines_per_page == 0 {
            return Err(ConfigError::Invalid("lines_per_page must be at least 1".into()));
        }
        if Encoding::for_label(self.encoding.trim().as_bytes()).is_none() {
            return Err(ConfigError::Invalid(format!("unknown encoding '{}'", self.encoding)));
        }
        Ok(())
    }

    /// Config file locations, in lookup order
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        paths.extend(Self::user_config_path());
        paths
    }

    /// Per-user config file location
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("docoutline").join("config.toml"))
    }

    /// Merge with command-line values; CLI wins where set
    pub fn merge_with_cli(&self, cli: &CliOverrides) -> OutlineOptions {
        OutlineOptions::builder()
            .lines_per_page(cli.lines_per_page.unwrap_or(self.lines_per_page))
            .encoding(cli.encoding.clone().unwrap_or_else(|| self.encoding.clone()))
            .pretty(cli.pretty.unwrap_or(self.pretty))
            .validate(cli.validate.unwrap_or(self.validate))
            .format(cli.format)
            .build()
    }
}

/// Values given explicitly on the command line
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CliOverrides {
    pub lines_per_page: Option<u32>,
    pub encoding: Option<String>,
    pub pretty: Option<bool>,
    pub validate: Option<bool>,
    pub format: Option<InputFormat>,
}

impl CliOverrides {
    /// No overrides
    pub fn new() -> Self {
        Self::default()
    }
}
