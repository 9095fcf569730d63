//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ATELIER_BACKEND_URL` - Base URL of the storefront backend
//!
//! ## Optional
//! - `ATELIER_DATA_DIR` - Directory for the cart snapshot and session
//!   token (default: `.atelier` in the home directory, falling back to
//!   the current directory)

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

use atelier_cart::storage::CART_SNAPSHOT_FILE;

/// File name for the persisted session token, the auth analog of the
/// cart snapshot's well-known key.
const TOKEN_FILE: &str = "token";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// CLI application configuration.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Base URL of the storefront backend
    pub backend_url: Url,
    /// Directory holding the cart snapshot and session token
    pub data_dir: PathBuf,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let backend_url = get_required_env("ATELIER_BACKEND_URL")?
            .parse::<Url>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("ATELIER_BACKEND_URL".to_string(), e.to_string())
            })?;

        let data_dir = std::env::var("ATELIER_DATA_DIR").map_or_else(
            |_| default_data_dir(),
            PathBuf::from,
        );

        Ok(Self {
            backend_url,
            data_dir,
        })
    }

    /// Path of the cart snapshot file.
    #[must_use]
    pub fn cart_path(&self) -> PathBuf {
        self.data_dir.join(CART_SNAPSHOT_FILE)
    }

    /// Path of the persisted session token.
    #[must_use]
    pub fn token_path(&self) -> PathBuf {
        self.data_dir.join(TOKEN_FILE)
    }
}

/// `~/.atelier`, or `./.atelier` when no home directory is available.
fn default_data_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map_or_else(|| PathBuf::from("."), PathBuf::from)
        .join(".atelier")
}

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_derive_from_data_dir() {
        let config = CliConfig {
            backend_url: "https://backend.example".parse().unwrap(),
            data_dir: PathBuf::from("/tmp/atelier"),
        };
        assert_eq!(config.cart_path(), PathBuf::from("/tmp/atelier/cart.json"));
        assert_eq!(config.token_path(), PathBuf::from("/tmp/atelier/token"));
    }
}
