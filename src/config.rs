//! Runtime configuration: built-in defaults, then an optional RON file, then
//! environment variables. Command-line flags are layered on by the binaries.

use crate::debounce::DEFAULT_DEBOUNCE;
use crate::errors::{ConfigError, ConfigResult};
use crate::gateway::DEFAULT_ENDPOINT;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Looked for in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "pokedex.ron";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    /// GraphQL endpoint of the catalog service.
    pub endpoint: String,
    pub debounce_ms: u64,
    pub request_timeout_secs: u64,
    /// Where the persistent state is kept.
    pub state_file: PathBuf,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        ExplorerConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
            request_timeout_secs: 30,
            state_file: PathBuf::from("pokedex-state.json"),
        }
    }
}

impl ExplorerConfig {
    /// Loads the config file (when given, or when `pokedex.ron` exists in the
    /// working directory) and applies environment overrides.
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        config.with_overrides(|key| env::var(key).ok())
    }

    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_ron(&text)
    }

    pub fn from_ron(text: &str) -> ConfigResult<Self> {
        Ok(ron::from_str(text)?)
    }

    /// Applies `POKEDEX_*` overrides read through `lookup`.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ConfigResult<Self> {
        if let Some(endpoint) = lookup("POKEDEX_ENDPOINT") {
            self.endpoint = endpoint;
        }
        if let Some(value) = lookup("POKEDEX_DEBOUNCE_MS") {
            self.debounce_ms = parse_number("POKEDEX_DEBOUNCE_MS", &value)?;
        }
        if let Some(value) = lookup("POKEDEX_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_number("POKEDEX_TIMEOUT_SECS", &value)?;
        }
        if let Some(path) = lookup("POKEDEX_STATE_FILE") {
            self.state_file = PathBuf::from(path);
        }
        Ok(self)
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_number(key: &'static str, value: &str) -> ConfigResult<u64> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key,
        value: value.to_string(),
    })
}
