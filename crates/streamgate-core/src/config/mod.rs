//! Configuration types for the Streamgate stream API.
//!
//! Everything is loaded from a single YAML file (`streamgate.yaml` by default):
//!
//! ```yaml
//! server:
//!   listen_addr: 0.0.0.0
//!   port: 8080
//! security:
//!   secret_key_env: STREAMGATE_SECRET_KEY
//! token:
//!   format: framed
//!   lifetime: 365d
//! admin:
//!   username: admin
//!   password_env: STREAMGATE_ADMIN_PASSWORD
//! storage:
//!   backend: sqlite
//!   db_file: data/streamgate.db
//! ```

pub mod admin;
pub mod security;
pub mod server;
pub mod storage;
pub mod token;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use admin::AdminConfig;
pub use security::SecurityConfig;
pub use server::ServerConfig;
pub use storage::{StorageBackend, StorageConfig};
pub use token::{ClaimFormat, TokenConfig, expiry_after, parse_duration};

/// Complete Streamgate configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StreamgateConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Token encryption key material.
    #[serde(default)]
    pub security: SecurityConfig,

    /// Token issuance settings.
    #[serde(default)]
    pub token: TokenConfig,

    /// Bootstrap administrator account.
    #[serde(default)]
    pub admin: AdminConfig,

    /// User, token-index and mount storage.
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl StreamgateConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Load, apply environment overrides and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.server.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the server could not start with.
    ///
    /// The secret key itself is checked when the cipher is built, since that
    /// is where its size is known.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Config("server.port must be greater than 0".into()));
        }

        if !self.security.is_configured() {
            return Err(ConfigError::Config(
                "security.secret_key, secret_key_env or secret_key_file must be set".into(),
            ));
        }

        let lifetime = self.token.lifetime()?;
        if lifetime <= chrono::Duration::zero() {
            return Err(ConfigError::Config("token.lifetime must be positive".into()));
        }
        expiry_after(chrono::Utc::now(), lifetime)?;

        if self.admin.username.trim().is_empty() {
            return Err(ConfigError::Config("admin.username cannot be empty".into()));
        }

        if self.storage.backend == StorageBackend::Sqlite && self.storage.db_file.trim().is_empty()
        {
            return Err(ConfigError::Config(
                "storage.db_file is required for the sqlite backend".into(),
            ));
        }

        Ok(())
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = r#"
server:
  listen_addr: 127.0.0.1
  port: 9000
security:
  secret_key: 882093050f95bfb1d2b83510d90393b623f86be241169d5db3ea76d715628ef9
token:
  format: delimited
  lifetime: 2h
admin:
  username: root
  password: s3cret
storage:
  backend: memory
"#;

    #[test]
    fn test_parse_full_config() {
        let config = StreamgateConfig::from_yaml(SAMPLE).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.bind_address(), "127.0.0.1:9000");
        assert_eq!(config.token.format, ClaimFormat::Delimited);
        assert_eq!(config.token.lifetime().unwrap(), chrono::Duration::hours(2));
        assert_eq!(config.admin.username, "root");
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        config.validate().unwrap();
    }

    #[test]
    fn test_defaults() {
        let config = StreamgateConfig::from_yaml("{}").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.token.format, ClaimFormat::Framed);
        assert_eq!(config.token.lifetime().unwrap(), chrono::Duration::days(365));
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
    }

    #[test]
    fn test_validate_requires_secret() {
        let config = StreamgateConfig::from_yaml("{}").unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("secret_key"));
    }

    #[test]
    fn test_validate_rejects_bad_lifetime() {
        let yaml = SAMPLE.replace("lifetime: 2h", "lifetime: soon");
        let config = StreamgateConfig::from_yaml(&yaml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unrepresentable_lifetime() {
        for lifetime in ["1000000000d", "100000000d"] {
            let yaml = SAMPLE.replace("lifetime: 2h", &format!("lifetime: {lifetime}"));
            let config = StreamgateConfig::from_yaml(&yaml).unwrap();
            assert!(config.validate().is_err(), "{lifetime}");
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let config = StreamgateConfig::load(file.path()).unwrap();
        assert_eq!(config.admin.username, "root");
    }
}
