//! Pushbridge Configuration System
//!
//! TOML-based configuration with environment variable override support.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

mod loader;

pub use loader::ConfigLoader;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Root application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub http: HttpConfig,
    pub mongodb: MongoConfig,
    pub matrix: MatrixConfig,
    pub admin: AdminConfig,
    pub tokens: TokenConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub port: u16,
    pub host: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
        }
    }
}

/// MongoDB configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "pushbridge".to_string(),
        }
    }
}

/// Matrix homeserver the dispatcher registers applications on
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatrixConfig {
    pub homeserver: String,
    pub access_token: String,
    pub request_timeout_secs: u64,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            homeserver: "http://localhost:8008".to_string(),
            access_token: String::new(),
            request_timeout_secs: 10,
        }
    }
}

impl MatrixConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Initial administrator, created on startup if missing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub name: String,
    pub password: String,
    pub matrix_id: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            name: "admin".to_string(),
            password: String::new(),
            matrix_id: String::new(),
        }
    }
}

/// Application token generation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Length of generated application tokens
    pub length: usize,
    /// Attempts the generator makes before giving up on finding an unused token
    pub max_attempts: u32,
    /// Persist attempts when the store reports a token collision at insert time
    pub persist_attempts: u32,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            length: 24,
            max_attempts: 16,
            persist_attempts: 3,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration with environment variable override
    pub fn load() -> Result<Self, ConfigError> {
        ConfigLoader::new().load()
    }

    /// Check the values the server cannot start without
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tokens.length == 0 {
            return Err(ConfigError::ValidationError(
                "tokens.length must be greater than zero".to_string(),
            ));
        }
        if self.tokens.max_attempts == 0 || self.tokens.persist_attempts == 0 {
            return Err(ConfigError::ValidationError(
                "tokens.max_attempts and tokens.persist_attempts must be greater than zero".to_string(),
            ));
        }
        if self.matrix.homeserver.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "matrix.homeserver is required".to_string(),
            ));
        }
        if self.matrix.request_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "matrix.request_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.admin.password.is_empty() || self.admin.matrix_id.is_empty() {
            return Err(ConfigError::ValidationError(
                "admin.password and admin.matrix_id are required".to_string(),
            ));
        }
        Ok(())
    }

    /// Generate an example TOML configuration
    pub fn example_toml() -> String {
        r#"# Pushbridge Configuration
# Environment variables (PUSHBRIDGE_*) override these settings

[http]
port = 8080
host = "0.0.0.0"

[mongodb]
uri = "mongodb://localhost:27017"
database = "pushbridge"

[matrix]
homeserver = "https://matrix.example.org"
access_token = ""
request_timeout_secs = 10

[admin]
name = "admin"
password = ""
matrix_id = "@admin:example.org"

[tokens]
length = 24
max_attempts = 16
persist_attempts = 3
"#
        .to_string()
    }
}
