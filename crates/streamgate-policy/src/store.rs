//! Storage contracts consumed by the authorizer and the login flow, and a
//! process-local implementation of all of them.

use crate::error::StoreError;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;
use streamgate_core::Mount;

/// Fingerprint → owner index of issued tokens.
#[async_trait]
pub trait TokenIndex: Send + Sync {
    /// Owner of the token with this fingerprint, if it is still recorded.
    async fn find_identity_by_fingerprint(
        &self,
        fingerprint: &str,
    ) -> Result<Option<String>, StoreError>;

    /// Remember that `identity` was issued the token with this fingerprint.
    async fn record_token_fingerprint(
        &self,
        identity: &str,
        fingerprint: &str,
    ) -> Result<(), StoreError>;
}

/// Username → password hash.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert or replace the hash for `identity`.
    async fn store_password(&self, identity: &str, hash: &str) -> Result<(), StoreError>;

    async fn find_password_hash(&self, identity: &str) -> Result<Option<String>, StoreError>;

    /// Remove the user and every token fingerprint it owns.
    /// Returns whether the user existed.
    async fn delete_user(&self, identity: &str) -> Result<bool, StoreError>;
}

/// Mount records keyed by `mount_name`.
#[async_trait]
pub trait MountStore: Send + Sync {
    /// Fails with [`StoreError::Conflict`] if the name is taken.
    async fn create_mount(&self, mount: &Mount) -> Result<(), StoreError>;

    async fn get_mount(&self, mount_name: &str) -> Result<Option<Mount>, StoreError>;

    /// All mounts ordered by name.
    async fn list_mounts(&self) -> Result<Vec<Mount>, StoreError>;

    /// Replace an existing mount. Fails with [`StoreError::NotFound`] otherwise.
    async fn update_mount(&self, mount: &Mount) -> Result<(), StoreError>;

    /// Remove a mount, returning the record as it was before deletion.
    async fn delete_mount(&self, mount_name: &str) -> Result<Mount, StoreError>;
}

/// Everything the HTTP service needs from storage.
pub trait Store: TokenIndex + CredentialStore + MountStore {}

impl<T: TokenIndex + CredentialStore + MountStore> Store for T {}

/// In-memory store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, String>>,
    tokens: RwLock<HashMap<String, String>>,
    mounts: RwLock<BTreeMap<String, Mount>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<E: std::fmt::Display>(e: E) -> StoreError {
    StoreError::Backend(format!("lock poisoned: {e}"))
}

#[async_trait]
impl TokenIndex for MemoryStore {
    async fn find_identity_by_fingerprint(
        &self,
        fingerprint: &str,
    ) -> Result<Option<String>, StoreError> {
        let tokens = self.tokens.read().map_err(poisoned)?;
        Ok(tokens.get(fingerprint).cloned())
    }

    async fn record_token_fingerprint(
        &self,
        identity: &str,
        fingerprint: &str,
    ) -> Result<(), StoreError> {
        let mut tokens = self.tokens.write().map_err(poisoned)?;
        tokens.insert(fingerprint.to_string(), identity.to_string());
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn store_password(&self, identity: &str, hash: &str) -> Result<(), StoreError> {
        let mut users = self.users.write().map_err(poisoned)?;
        users.insert(identity.to_string(), hash.to_string());
        Ok(())
    }

    async fn find_password_hash(&self, identity: &str) -> Result<Option<String>, StoreError> {
        let users = self.users.read().map_err(poisoned)?;
        Ok(users.get(identity).cloned())
    }

    async fn delete_user(&self, identity: &str) -> Result<bool, StoreError> {
        // Lock order: users, then tokens. Both are held for the whole removal.
        let mut users = self.users.write().map_err(poisoned)?;
        let mut tokens = self.tokens.write().map_err(poisoned)?;

        let existed = users.remove(identity).is_some();
        tokens.retain(|_, owner| owner != identity);
        Ok(existed)
    }
}

#[async_trait]
impl MountStore for MemoryStore {
    async fn create_mount(&self, mount: &Mount) -> Result<(), StoreError> {
        let mut mounts = self.mounts.write().map_err(poisoned)?;
        if mounts.contains_key(&mount.mount_name) {
            return Err(StoreError::Conflict(format!("mount {}", mount.mount_name)));
        }
        mounts.insert(mount.mount_name.clone(), mount.clone());
        Ok(())
    }

    async fn get_mount(&self, mount_name: &str) -> Result<Option<Mount>, StoreError> {
        let mounts = self.mounts.read().map_err(poisoned)?;
        Ok(mounts.get(mount_name).cloned())
    }

    async fn list_mounts(&self) -> Result<Vec<Mount>, StoreError> {
        let mounts = self.mounts.read().map_err(poisoned)?;
        Ok(mounts.values().cloned().collect())
    }

    async fn update_mount(&self, mount: &Mount) -> Result<(), StoreError> {
        let mut mounts = self.mounts.write().map_err(poisoned)?;
        match mounts.get_mut(&mount.mount_name) {
            Some(existing) => {
                *existing = mount.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(format!("mount {}", mount.mount_name))),
        }
    }

    async fn delete_mount(&self, mount_name: &str) -> Result<Mount, StoreError> {
        let mut mounts = self.mounts.write().map_err(poisoned)?;
        mounts
            .remove(mount_name)
            .ok_or_else(|| StoreError::NotFound(format!("mount {mount_name}")))
    }
}
