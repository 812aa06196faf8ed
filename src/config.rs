use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{PatrolError, Result};
use crate::logging;
use crate::search::{CandidateScope, SearchOptions, Strategy};

pub const DEFAULT_CONFIG_PATH: &str = "guard_patrol.toml";

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct InputConfig {
    #[serde(default = "default_input_path")]
    pub path: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct SearchConfig {
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default)]
    pub scope: CandidateScope,
    /// 0 or absent: rayon default
    #[serde(default)]
    pub threads: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct OutputConfig {
    #[serde(default)]
    pub show_trail: bool,
    #[serde(default)]
    pub copy_trail: bool,
    #[serde(default)]
    pub report_path: Option<String>,
    #[serde(default)]
    pub trace_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

// Default values
fn default_input_path() -> String { "input.txt".to_string() }
fn default_log_filter() -> String { logging::DEFAULT_FILTER.to_string() }

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: default_input_path(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

impl SearchConfig {
    pub fn options(&self) -> SearchOptions {
        SearchOptions {
            strategy: self.strategy,
            scope: self.scope,
            threads: self.threads.filter(|&n| n > 0),
        }
    }
}

impl Config {
    /// Load configuration from `path`, or from `guard_patrol.toml` when none is given.
    ///
    /// An explicit path must exist and parse. The implicit default falls back
    /// to built-in defaults if it is missing or broken.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let contents = fs::read_to_string(path)
                    .map_err(|e| PatrolError::Config(format!("failed to read {}: {}", path.display(), e)))?;
                let config = toml::from_str(&contents)?;
                info!(path = %path.display(), "loaded configuration");
                Ok(config)
            }
            None => Ok(Self::load_or_default(Path::new(DEFAULT_CONFIG_PATH))),
        }
    }

    /// Load `path` if it exists, falling back to defaults with a warning when
    /// it cannot be parsed
    pub fn load_or_default(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(_) => {
                info!(path = %path.display(), "no config file found, using default configuration");
                return Config::default();
            }
        };

        match toml::from_str(&contents) {
            Ok(config) => {
                info!(path = %path.display(), "loaded configuration");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to parse config, using defaults");
                Config::default()
            }
        }
    }
}
