//! Configuration for the session facade.
//!
//! ```toml
//! [session]
//! expiration_secs = 3600
//!
//! [session.cookie]
//! lifetime = 3600
//! path = "/"
//! domain = ""
//! secure = false
//! http_only = true
//! same_site = "Lax"
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::activity::DEFAULT_EXPIRATION_SECS;
use crate::cookie::CookieParams;
use crate::error::{ConfigError, Result};

/// Settings applied by [`SessionManager::start_with_config`](crate::SessionManager::start_with_config).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Inactivity window in seconds.
    pub expiration_secs: u64,

    /// Attributes of the session cookie.
    pub cookie: CookieParams,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            expiration_secs: DEFAULT_EXPIRATION_SECS,
            cookie: CookieParams::default(),
        }
    }
}

/// File layout with the settings nested under `[session]`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct ConfigFile {
    session: Option<SessionConfig>,
}

impl SessionConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the inactivity window.
    pub fn with_expiration(mut self, secs: u64) -> Self {
        self.expiration_secs = secs;
        self
    }

    /// Set the cookie attributes.
    pub fn with_cookie(mut self, cookie: CookieParams) -> Self {
        self.cookie = cookie;
        self
    }

    /// Parse from a TOML string.
    ///
    /// Accepts either a document with a `[session]` table or the bare fields.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let value: toml::Table = toml_str.parse().map_err(ConfigError::from)?;
        if value.contains_key("session") {
            let file: ConfigFile = toml::from_str(toml_str).map_err(ConfigError::from)?;
            Ok(file.session.unwrap_or_default())
        } else {
            Ok(toml::from_str(toml_str).map_err(ConfigError::from)?)
        }
    }

    /// Serialize to a TOML string nested under `[session]`.
    pub fn to_toml(&self) -> Result<String> {
        let file = ConfigFile {
            session: Some(self.clone()),
        };
        Ok(toml::to_string_pretty(&file).map_err(ConfigError::from)?)
    }

    /// Load config from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml(&contents)
    }
}
