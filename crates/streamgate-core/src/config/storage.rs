//! Storage backend configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    /// Process-local maps; everything is lost on restart.
    Memory,
    /// SQLite database file.
    #[default]
    Sqlite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// SQLite database path (sqlite backend only).
    #[serde(default = "default_db_file")]
    pub db_file: String,

    /// Pool size for the sqlite backend.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            db_file: default_db_file(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_db_file() -> String {
    "data/streamgate.db".to_string()
}

fn default_max_connections() -> u32 {
    2
}
