//! Configuration management and environment variable loading

use crate::{LumiereError, Result};
use std::env;
use std::time::Duration;

/// Load environment variables from a .env file
///
/// Safe to call multiple times; a missing file is not an error.
pub fn load_env() -> Result<()> {
    match dotenvy::dotenv() {
        Ok(path) => {
            tracing::info!("Loaded environment from: {}", path.display());
            Ok(())
        }
        Err(dotenvy::Error::LineParse(line, pos)) => Err(LumiereError::config(format!(
            "Failed to parse .env file at line {}, position {}",
            line, pos
        ))),
        Err(dotenvy::Error::Io(_)) => {
            tracing::debug!("No .env file found - using system environment variables only");
            Ok(())
        }
        Err(e) => Err(LumiereError::config(format!(
            "Failed to load .env file: {}",
            e
        ))),
    }
}

/// Get required environment variable
///
/// Returns an error if the variable is not set
pub fn get_required_env(key: &str) -> Result<String> {
    env::var(key).map_err(|_| {
        LumiereError::config(format!(
            "Required environment variable '{}' is not set. \
             Check your .env file or system environment.",
            key
        ))
    })
}

/// Get optional environment variable with default
pub fn get_env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get environment variable as integer with default
pub fn get_env_int(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Runtime configuration for the advisor binaries
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    /// Base URL of the chat relay
    pub relay_url: String,
    /// Model name forwarded in every request
    pub model: String,
    /// Path of the product catalog JSON document
    pub catalog_path: String,
    /// SQLite database URL for durable keyed storage
    pub storage_url: String,
    /// Upper bound on a single relay call
    pub request_timeout: Duration,
}

impl AdvisorConfig {
    /// Build a configuration from environment variables, with defaults
    /// suitable for local development.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            relay_url: get_env_or("LUMIERE_RELAY_URL", "http://localhost:8787/"),
            model: get_env_or("LUMIERE_MODEL", "gpt-4o"),
            catalog_path: get_env_or("LUMIERE_CATALOG_PATH", "products.json"),
            storage_url: get_env_or("LUMIERE_STORAGE_URL", "sqlite://lumiere.db?mode=rwc"),
            request_timeout: Duration::from_secs(get_env_int("LUMIERE_REQUEST_TIMEOUT_SECS", 30)),
        })
    }
}
