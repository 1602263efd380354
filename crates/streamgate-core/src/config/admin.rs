//! Bootstrap administrator account.

use serde::{Deserialize, Serialize};

/// The admin user is upserted on every start, so changing the password here
/// and restarting resets it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminConfig {
    #[serde(default = "default_username")]
    pub username: String,

    /// Inline password.
    #[serde(default)]
    pub password: Option<String>,

    /// Environment variable containing the password; checked first.
    #[serde(default)]
    pub password_env: Option<String>,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: default_username(),
            password: None,
            password_env: None,
        }
    }
}

impl AdminConfig {
    /// Get the password, checking password_env first.
    pub fn get_password(&self) -> Option<String> {
        if let Some(env_var) = &self.password_env
            && let Ok(password) = std::env::var(env_var)
        {
            return Some(password);
        }
        self.password.clone()
    }
}

fn default_username() -> String {
    "admin".to_string()
}
