//! Client configuration.
//!
//! Layered the usual way: built-in defaults, then an optional JSON file,
//! then `PAREIDOLIA_*` environment variables.

use std::path::{Path, PathBuf};
use std::time::Duration;

use pareidolia_session::SessionConfig;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Environment variable names, in the order they are applied.
pub const ENV_API_URL: &str = "PAREIDOLIA_API_URL";
pub const ENV_LOGIN_ROUTE: &str = "PAREIDOLIA_LOGIN_ROUTE";
pub const ENV_HOME_ROUTE: &str = "PAREIDOLIA_HOME_ROUTE";
pub const ENV_TIMEOUT_SECS: &str = "PAREIDOLIA_TIMEOUT_SECS";
pub const ENV_STORAGE_PATH: &str = "PAREIDOLIA_STORAGE_PATH";

/// Settings for a [`PareidoliaClient`](crate::PareidoliaClient).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Backend base URL.
    pub api_url: String,

    /// Route the user is sent to after a 401.
    pub login_route: String,

    /// Route entered after a successful login and after logout.
    pub home_route: String,

    /// Per-request timeout.
    pub timeout_secs: u64,

    /// Where the credential pair is persisted. `None` keeps it in memory.
    pub storage_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let session = SessionConfig::default();
        Self {
            api_url: session.api_url,
            login_route: session.login_route,
            home_route: "/".to_string(),
            timeout_secs: 30,
            storage_path: None,
        }
    }
}

impl ClientConfig {
    /// Reads a JSON config file. Missing fields keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Defaults (or `path`, when given) overridden by the process
    /// environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Applies `PAREIDOLIA_*` overrides, looking each variable up through
    /// `lookup`. Empty values are ignored.
    pub fn apply_env_from(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(route) = get(ENV_LOGIN_ROUTE) {
            self.login_route = route;
        }
        if let Some(route) = get(ENV_HOME_ROUTE) {
            self.home_route = route;
        }
        if let Some(raw) = get(ENV_TIMEOUT_SECS) {
            self.timeout_secs =
                raw.trim()
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue {
                        key: ENV_TIMEOUT_SECS,
                        value: raw.clone(),
                    })?;
        }
        if let Some(path) = get(ENV_STORAGE_PATH) {
            self.storage_path = Some(PathBuf::from(path));
        }
        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// The subset the session layer needs.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            api_url: self.api_url.clone(),
            login_route: self.login_route.clone(),
        }
    }
}
