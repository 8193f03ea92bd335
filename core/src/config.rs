use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage keys and formatting used by persistence and export. Every field
/// may be omitted from a config file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub current_session_key: String,
    pub saved_games_key: String,
    /// chrono format string for the `date` of a saved game.
    pub date_format: String,
    /// Prefix of exported file names.
    pub export_prefix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            current_session_key: "schocken_game".to_string(),
            saved_games_key: "schocken_saved_games".to_string(),
            date_format: "%d.%m.%Y, %H:%M:%S".to_string(),
            export_prefix: "schocken_scoreboard_".to_string(),
        }
    }
}

impl Config {
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_json_str(&contents)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Couldn't parse config: {0}")]
    Parse(String),
}
