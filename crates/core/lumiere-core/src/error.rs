//! Error types for Lumiere

use thiserror::Error;

/// Main error type for Lumiere operations
#[derive(Debug, Error)]
pub enum LumiereError {
    /// Product catalog could not be loaded or parsed
    #[error("Catalog unavailable: {0}")]
    CatalogUnavailable(String),

    /// Storage backend error. Corrupt persisted values never surface
    /// here: the stores log a warning, clear the key, and continue from
    /// the empty state.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Relay returned a non-success status or an unusable body
    #[error("Relay error: {0}")]
    Relay(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network/HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl LumiereError {
    /// Create a catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::CatalogUnavailable(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a relay error
    pub fn relay(msg: impl Into<String>) -> Self {
        Self::Relay(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

/// Result type alias for Lumiere operations
pub type Result<T> = std::result::Result<T, LumiereError>;
