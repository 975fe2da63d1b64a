//! Service configuration from a YAML file with environment overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error as ThisError;
use tracing::{warn, Level};

/// Log levels accepted from configuration.
const VALID_LEVELS: [&str; 5] = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"];

/// Errors that can occur when loading configuration.
#[derive(ThisError, Debug)]
pub enum Error {
    /// The config file exists but could not be read.
    #[error("could not read config: {0}")]
    Read(std::io::Error),

    /// The config file exists but is not valid YAML.
    #[error("could not parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Configuration for the service.
///
/// Every section and field is optional in the file; anything absent
/// falls back to its default. A missing file yields the full defaults,
/// while a present-but-malformed file is an error (a deployment bug
/// should not silently degrade to defaults).
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub server: Server,
    pub logging: Logging,
    pub data: Data,
    pub search: Search,
    pub metrics: Metrics,
}

/// Bind address for the API listener.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Server {
    pub host: String,
    pub port: u16,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
        }
    }
}

/// Log verbosity.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Logging {
    pub level: String,
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "INFO".to_string(),
        }
    }
}

/// Dataset source location and loader policy.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Data {
    pub input_file: PathBuf,
    pub skip_malformed: bool,
}

impl Default for Data {
    fn default() -> Self {
        Self {
            input_file: PathBuf::from("data/input.txt"),
            skip_malformed: false,
        }
    }
}

/// Approximate-phase tuning.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Search {
    pub tolerance_percent: f64,
}

impl Default for Search {
    fn default() -> Self {
        Self {
            tolerance_percent: quickindex_engine::DEFAULT_TOLERANCE_PERCENT,
        }
    }
}

/// Metrics exposure; the metrics listener is disabled unless a port is set.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Metrics {
    pub port: Option<u16>,
}

impl Config {
    /// Loads configuration from a YAML file, then applies overrides from
    /// the process environment.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let mut config = Self::load_file(path)?;
        config.apply_env(std::env::vars());
        Ok(config)
    }

    /// Loads configuration from a YAML file without environment
    /// overrides.
    ///
    /// A missing file yields defaults; a malformed file is an error.
    pub fn load_file(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path).map_err(Error::Read)?;
        Ok(serde_yaml::from_str(&raw)?)
    }

    /// Applies environment overrides from the provided variables.
    ///
    /// Set variables take precedence over file values. Unparseable
    /// values are ignored with a warning, leaving the file/default value
    /// in place. Taking the variables as an iterator keeps tests from
    /// mutating process-global state.
    pub fn apply_env(&mut self, vars: impl IntoIterator<Item = (String, String)>) {
        for (key, value) in vars {
            match key.as_str() {
                "SERVER_HOST" => self.server.host = value,
                "SERVER_PORT" => match value.parse() {
                    Ok(port) => self.server.port = port,
                    Err(_) => warn!(%value, "ignoring unparseable SERVER_PORT"),
                },
                "LOG_LEVEL" => {
                    let level = value.to_uppercase();
                    if VALID_LEVELS.contains(&level.as_str()) {
                        self.logging.level = level;
                    } else {
                        warn!(%value, "ignoring unknown LOG_LEVEL");
                    }
                }
                "INPUT_FILE" => self.data.input_file = PathBuf::from(value),
                _ => {}
            }
        }
    }

    /// Maps the configured level onto [Level], defaulting to INFO.
    ///
    /// CRITICAL maps to ERROR (tracing has no higher level).
    pub fn level(&self) -> Level {
        match self.logging.level.to_uppercase().as_str() {
            "DEBUG" => Level::DEBUG,
            "WARNING" => Level::WARN,
            "ERROR" | "CRITICAL" => Level::ERROR,
            _ => Level::INFO,
        }
    }
}
