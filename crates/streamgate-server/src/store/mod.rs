//! Storage backends selected by `storage.backend`.

pub mod sqlite;

pub use sqlite::SqliteStore;

use std::sync::Arc;
use streamgate_core::{StorageBackend, StorageConfig};
use streamgate_policy::{MemoryStore, Store, StoreError};

/// Create the configured storage backend.
pub async fn open_store(config: &StorageConfig) -> Result<Arc<dyn Store>, StoreError> {
    match config.backend {
        StorageBackend::Memory => {
            tracing::warn!("using in-memory storage; users, tokens and mounts are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Sqlite => {
            let store = SqliteStore::connect(&config.db_file, config.max_connections).await?;
            Ok(Arc::new(store))
        }
    }
}
