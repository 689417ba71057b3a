//! Configuration loader with file and environment variable support

use crate::{AppConfig, ConfigError};
use std::env;
use std::path::PathBuf;
use tracing::info;

/// Standard config file search paths
const CONFIG_PATHS: &[&str] = &[
    "config.toml",
    "pushbridge.toml",
    "./config/config.toml",
    "/etc/pushbridge/config.toml",
];

/// Configuration loader
pub struct ConfigLoader {
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Create a loader with a specific config file path
    pub fn with_path<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            config_path: Some(path.into()),
        }
    }

    /// Load configuration from file (if found) with environment variable overrides
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let mut config = AppConfig::default();

        if let Some(path) = self.find_config_file() {
            info!(?path, "Loading configuration from file");
            config = AppConfig::from_file(&path)?;
        }

        apply_overrides(&mut config, |key| env::var(key).ok());

        Ok(config)
    }

    /// Find the configuration file to use
    fn find_config_file(&self) -> Option<PathBuf> {
        if let Some(path) = &self.config_path {
            if path.exists() {
                return Some(path.clone());
            }
        }

        if let Ok(path) = env::var("PUSHBRIDGE_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        CONFIG_PATHS
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Apply `PUSHBRIDGE_*` overrides using the given variable lookup.
///
/// Unparseable numeric values are ignored and the file/default value is kept.
fn apply_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    // HTTP
    if let Some(port) = lookup("PUSHBRIDGE_HTTP_PORT").and_then(|v| v.parse().ok()) {
        config.http.port = port;
    }
    if let Some(val) = lookup("PUSHBRIDGE_HTTP_HOST") {
        config.http.host = val;
    }

    // MongoDB
    if let Some(val) = lookup("PUSHBRIDGE_MONGODB_URI") {
        config.mongodb.uri = val;
    }
    if let Some(val) = lookup("PUSHBRIDGE_MONGODB_DATABASE") {
        config.mongodb.database = val;
    }

    // Matrix
    if let Some(val) = lookup("PUSHBRIDGE_MATRIX_HOMESERVER") {
        config.matrix.homeserver = val;
    }
    if let Some(val) = lookup("PUSHBRIDGE_MATRIX_ACCESS_TOKEN") {
        config.matrix.access_token = val;
    }
    if let Some(secs) = lookup("PUSHBRIDGE_MATRIX_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
        config.matrix.request_timeout_secs = secs;
    }

    // Admin
    if let Some(val) = lookup("PUSHBRIDGE_ADMIN_NAME") {
        config.admin.name = val;
    }
    if let Some(val) = lookup("PUSHBRIDGE_ADMIN_PASSWORD") {
        config.admin.password = val;
    }
    if let Some(val) = lookup("PUSHBRIDGE_ADMIN_MATRIX_ID") {
        config.admin.matrix_id = val;
    }

    // Tokens
    if let Some(len) = lookup("PUSHBRIDGE_TOKEN_LENGTH").and_then(|v| v.parse().ok()) {
        config.tokens.length = len;
    }
    if let Some(n) = lookup("PUSHBRIDGE_TOKEN_MAX_ATTEMPTS").and_then(|v| v.parse().ok()) {
        config.tokens.max_attempts = n;
    }
    if let Some(n) = lookup("PUSHBRIDGE_TOKEN_PERSIST_ATTEMPTS").and_then(|v| v.parse().ok()) {
        config.tokens.persist_attempts = n;
    }
}
