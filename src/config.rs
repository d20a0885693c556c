//! Top-level application configuration.
//!
//! Configuration is stored in `.eventboard/config.yaml` and includes:
//! - Base URL of the event API (overridable with `EVENTBOARD_API_URL`)
//! - Request timeout for remote calls
//! - What to do with events whose status matches no column
//! - Where a failed move puts the card back

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{BoardError, Result};
use crate::types::{ColumnId, board_root};

pub const DEFAULT_API_URL: &str = "http://localhost:3001/api";

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the event API
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// Remote request timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Handling of events whose status is not one of the three columns
    #[serde(default)]
    pub unknown_status: UnknownStatusPolicy,

    /// Placement of a card when its status commit fails
    #[serde(default)]
    pub rollback_placement: RollbackPlacement,
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: None,
            request_timeout: default_request_timeout(),
            unknown_status: UnknownStatusPolicy::default(),
            rollback_placement: RollbackPlacement::default(),
        }
    }
}

/// Policy for events whose status matches none of the known columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownStatusPolicy {
    /// Leave the event out of every column and log it
    #[default]
    Exclude,
    /// Fail the board load
    Reject,
    /// Place the event at the end of the given column
    Fallback(ColumnId),
}

impl std::str::FromStr for UnknownStatusPolicy {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "exclude" => Ok(UnknownStatusPolicy::Exclude),
            "reject" => Ok(UnknownStatusPolicy::Reject),
            other => {
                let column = other
                    .strip_prefix("fallback:")
                    .ok_or_else(|| {
                        BoardError::Config(format!(
                            "invalid unknown_status '{other}'. Expected: exclude, reject or fallback:<column>"
                        ))
                    })?
                    .trim()
                    .parse::<ColumnId>()?;
                Ok(UnknownStatusPolicy::Fallback(column))
            }
        }
    }
}

/// Where a rolled-back card is reinserted in its original column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollbackPlacement {
    /// The end of the column
    #[default]
    Append,
    /// The index it occupied before the move (clamped to the column length)
    OriginalIndex,
}

impl std::str::FromStr for RollbackPlacement {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "original_index" => Ok(RollbackPlacement::OriginalIndex),
            "append" => Ok(RollbackPlacement::Append),
            _ => Err(BoardError::Config(format!(
                "invalid rollback_placement '{s}'. Expected: original_index or append"
            ))),
        }
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> PathBuf {
        board_root().join("config.yaml")
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| {
            BoardError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                BoardError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create directory for config at {}: {}",
                        parent.display(),
                        e
                    ),
                ))
            })?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(&path, content).map_err(|e| {
            BoardError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config at {}: {}", path.display(), e),
            ))
        })?;
        Ok(())
    }

    /// Get the API base URL from the environment, the config file, or the default
    pub fn api_url(&self) -> String {
        if let Ok(url) = env::var("EVENTBOARD_API_URL")
            && !url.is_empty()
        {
            return url;
        }

        self.api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
    }

    /// Set the API base URL
    pub fn set_api_url(&mut self, url: String) {
        self.api_url = Some(url);
    }

    /// Get the remote request timeout duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// Set the remote request timeout in seconds
    pub fn set_request_timeout(&mut self, seconds: u64) {
        self.request_timeout = seconds;
    }

    /// Read a single key, formatted for display
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "api_url" => Ok(self.api_url()),
            "request_timeout" => Ok(self.request_timeout.to_string()),
            "unknown_status" => Ok(match self.unknown_status {
                UnknownStatusPolicy::Exclude => "exclude".to_string(),
                UnknownStatusPolicy::Reject => "reject".to_string(),
                UnknownStatusPolicy::Fallback(column) => format!("fallback:{column}"),
            }),
            "rollback_placement" => Ok(match self.rollback_placement {
                RollbackPlacement::OriginalIndex => "original_index".to_string(),
                RollbackPlacement::Append => "append".to_string(),
            }),
            _ => Err(unknown_key(key)),
        }
    }

    /// Update a single key from its string form
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api_url" => {
                if !value.starts_with("http://") && !value.starts_with("https://") {
                    return Err(BoardError::Config(format!(
                        "invalid api_url '{value}'. Expected an http(s) URL"
                    )));
                }
                self.set_api_url(value.trim_end_matches('/').to_string());
            }
            "request_timeout" => {
                let seconds = value.parse::<u64>().map_err(|_| {
                    BoardError::Config(format!(
                        "invalid value '{value}' for request_timeout. Expected seconds"
                    ))
                })?;
                self.set_request_timeout(seconds);
            }
            "unknown_status" => self.unknown_status = value.parse()?,
            "rollback_placement" => self.rollback_placement = value.parse()?,
            _ => return Err(unknown_key(key)),
        }
        Ok(())
    }
}

/// Keys accepted by `config get` and `config set`
pub const CONFIG_KEYS: &[&str] = &[
    "api_url",
    "request_timeout",
    "unknown_status",
    "rollback_placement",
];

fn unknown_key(key: &str) -> BoardError {
    BoardError::Config(format!(
        "unknown config key '{key}'. Valid keys: {}",
        CONFIG_KEYS.join(", ")
    ))
}
