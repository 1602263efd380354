//! Token encryption key configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where to find the hex-encoded AES key used to seal tokens.
///
/// Resolution order: `secret_key_env`, then `secret_key_file`, then the
/// inline `secret_key`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SecurityConfig {
    /// Inline hex key. Prefer the env or file variants outside development.
    #[serde(default)]
    pub secret_key: Option<String>,

    /// Environment variable containing the hex key.
    #[serde(default)]
    pub secret_key_env: Option<String>,

    /// Path to a file containing the hex key.
    #[serde(default)]
    pub secret_key_file: Option<PathBuf>,
}

impl SecurityConfig {
    pub fn is_configured(&self) -> bool {
        self.secret_key.is_some() || self.secret_key_env.is_some() || self.secret_key_file.is_some()
    }

    /// Resolve the hex key from environment, file or inline value.
    pub fn resolve_secret_key(&self) -> Result<Option<String>, std::io::Error> {
        if let Some(env_var) = &self.secret_key_env
            && let Ok(key) = std::env::var(env_var)
        {
            return Ok(Some(key.trim().to_string()));
        }

        if let Some(path) = &self.secret_key_file
            && path.exists()
        {
            let key = std::fs::read_to_string(path)?;
            return Ok(Some(key.trim().to_string()));
        }

        Ok(self.secret_key.as_ref().map(|k| k.trim().to_string()))
    }
}
