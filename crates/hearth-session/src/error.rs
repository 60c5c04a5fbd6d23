//! Error types for session facade operations.

/// Error type for session facade operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The inactivity window elapsed since the last touching operation.
    #[error("Session expired.")]
    Expired,

    /// The requested key is not present in the session store.
    #[error("{}", key_not_found_message(.0.as_deref()))]
    KeyNotFound(Option<String>),

    /// A write was attempted while the host has no active session.
    #[error("No active session")]
    NoActiveSession,

    /// A value could not be converted to or from its stored form.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Build a `KeyNotFound` error naming the missing key.
    pub fn key_not_found(key: impl Into<String>) -> Self {
        Self::KeyNotFound(Some(key.into()))
    }

    /// Whether this is an inactivity expiration.
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired)
    }

    /// Whether this is a missing-key error.
    pub fn is_key_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound(_))
    }

    /// The missing key, if this is a `KeyNotFound` error that names one.
    pub fn missing_key(&self) -> Option<&str> {
        match self {
            Self::KeyNotFound(key) => key.as_deref(),
            _ => None,
        }
    }
}

fn key_not_found_message(key: Option<&str>) -> String {
    match key {
        Some(key) => format!("The key '{key}' was not found."),
        None => "The requested key was not found.".to_string(),
    }
}

/// Errors that can occur while loading session configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read a config file.
    #[error("failed to read config file '{path}': {source}")]
    ReadFile {
        path: String,
        source: std::io::Error,
    },

    /// Failed to parse TOML.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to serialize config.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Result type for session facade operations.
pub type Result<T> = std::result::Result<T, Error>;
