//! Startup provisioning of the administrator account.

use crate::error::ApiError;
use streamgate_core::AdminConfig;
use streamgate_policy::CredentialStore;
use streamgate_token::{hash_password, needs_rehash, verify_password};

/// Make sure the configured admin exists with the configured password.
///
/// The stored hash is only replaced when the password changed or the hash
/// parameters are outdated, so restarts stay cheap.
pub async fn bootstrap_admin<S>(store: &S, admin: &AdminConfig) -> Result<(), ApiError>
where
    S: CredentialStore + ?Sized,
{
    let password = admin.get_password().unwrap_or_default();
    if password.trim().is_empty() {
        return Err(ApiError::Startup(
            "admin password is empty (set admin.password or admin.password_env)".into(),
        ));
    }

    if let Some(existing) = store.find_password_hash(&admin.username).await?
        && verify_password(&password, &existing)
        && !needs_rehash(&existing)
    {
        tracing::debug!(username = %admin.username, "admin account up to date");
        return Ok(());
    }

    let hash = hash_password(&password)?;
    store.store_password(&admin.username, &hash).await?;

    tracing::warn!(
        username = %admin.username,
        "bootstrapped admin account (password taken from env/config)"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use streamgate_policy::MemoryStore;

    fn admin(password: Option<&str>) -> AdminConfig {
        AdminConfig {
            username: "admin".into(),
            password: password.map(str::to_string),
            password_env: None,
        }
    }

    #[tokio::test]
    async fn test_bootstrap_creates_and_updates() {
        let store = MemoryStore::new();

        bootstrap_admin(&store, &admin(Some("first"))).await.unwrap();
        let first = store.find_password_hash("admin").await.unwrap().unwrap();
        assert!(verify_password("first", &first));

        // unchanged password keeps the stored hash
        bootstrap_admin(&store, &admin(Some("first"))).await.unwrap();
        assert_eq!(store.find_password_hash("admin").await.unwrap().unwrap(), first);

        bootstrap_admin(&store, &admin(Some("second"))).await.unwrap();
        let second = store.find_password_hash("admin").await.unwrap().unwrap();
        assert!(verify_password("second", &second));
        assert!(!verify_password("first", &second));
    }

    #[tokio::test]
    async fn test_bootstrap_requires_password() {
        let store = MemoryStore::new();
        assert!(matches!(
            bootstrap_admin(&store, &admin(None)).await,
            Err(ApiError::Startup(_))
        ));
        assert!(bootstrap_admin(&store, &admin(Some("  "))).await.is_err());
    }
}
