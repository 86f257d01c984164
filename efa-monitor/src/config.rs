//! Process configuration.
//!
//! Settings come from environment variables; the list of watched stops
//! comes from a JSON file named by `EFA_STOPS_FILE`.

use std::path::{Path, PathBuf};

use crate::domain::WatchedStop;
use crate::efa::EfaConfig;

pub const USER_AGENT_VAR: &str = "EFA_USER_AGENT";
pub const STOPS_FILE_VAR: &str = "EFA_STOPS_FILE";
pub const BASE_URL_VAR: &str = "EFA_BASE_URL";
pub const TIMEOUT_VAR: &str = "EFA_TIMEOUT_SECS";
pub const MOCK_DIR_VAR: &str = "EFA_MOCK_DIR";

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Required variable not set
    #[error("{0} is not set")]
    Missing(&'static str),

    /// Variable set to something unusable
    #[error("invalid {name}: {value:?}")]
    Invalid { name: &'static str, value: String },

    /// Stops file could not be read
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Stops file is not a JSON list of stops
    #[error("failed to parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Everything the binary needs to start.
#[derive(Debug, Clone)]
pub struct Settings {
    pub efa: EfaConfig,
    pub stops_file: PathBuf,
    /// Serve responses from fixture files instead of the network.
    pub mock_dir: Option<PathBuf>,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through a variable lookup function.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let present = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let user_agent = present(USER_AGENT_VAR).ok_or(ConfigError::Missing(USER_AGENT_VAR))?;
        let stops_file = present(STOPS_FILE_VAR).ok_or(ConfigError::Missing(STOPS_FILE_VAR))?;

        let mut efa = EfaConfig::new(user_agent);
        if let Some(url) = present(BASE_URL_VAR) {
            efa = efa.with_base_url(url);
        }
        if let Some(raw) = present(TIMEOUT_VAR) {
            let secs = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|&s| s > 0)
                .ok_or(ConfigError::Invalid {
                    name: TIMEOUT_VAR,
                    value: raw,
                })?;
            efa = efa.with_timeout(secs);
        }

        Ok(Self {
            efa,
            stops_file: PathBuf::from(stops_file),
            mock_dir: present(MOCK_DIR_VAR).map(PathBuf::from),
        })
    }
}

/// Load the watched stops from a JSON file.
pub fn load_stops(path: &Path) -> Result<Vec<WatchedStop>, ConfigError> {
    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&json).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}
