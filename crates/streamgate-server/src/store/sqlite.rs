//! SQLite-backed store.

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::path::Path;
use streamgate_core::{Mount, TemplateType};
use streamgate_policy::{CredentialStore, MountStore, StoreError, TokenIndex};

/// Users, token fingerprints and mounts in one SQLite file.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct MountRow {
    mount_name: String,
    username: String,
    password: String,
    public: i64,
    stream_name: String,
    stream_description: String,
    template_type: String,
}

impl TryFrom<MountRow> for Mount {
    type Error = StoreError;

    fn try_from(row: MountRow) -> Result<Self, Self::Error> {
        let template_type: TemplateType = row.template_type.parse().map_err(StoreError::Backend)?;
        Ok(Mount {
            mount_name: row.mount_name,
            username: row.username,
            password: row.password,
            public: row.public,
            stream_name: row.stream_name,
            stream_description: row.stream_description,
            template_type,
        })
    }
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

impl SqliteStore {
    /// Open (creating if needed) the database at `path` and run migrations.
    pub async fn connect(path: impl AsRef<Path>, max_connections: u32) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Backend(format!("{}: {e}", parent.display())))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await
            .map_err(backend)?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        tracing::info!(db_file = %path.display(), "sqlite store ready");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl TokenIndex for SqliteStore {
    async fn find_identity_by_fingerprint(
        &self,
        fingerprint: &str,
    ) -> Result<Option<String>, StoreError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT username FROM tokens WHERE fingerprint = ?")
                .bind(fingerprint)
                .fetch_optional(&self.pool)
                .await
                .map_err(backend)?;
        Ok(row.map(|(username,)| username))
    }

    async fn record_token_fingerprint(
        &self,
        identity: &str,
        fingerprint: &str,
    ) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO tokens (fingerprint, username) VALUES (?, ?)
             ON CONFLICT(fingerprint) DO UPDATE SET username = excluded.username",
        )
        .bind(fingerprint)
        .bind(identity)
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for SqliteStore {
    async fn store_password(&self, identity: &str, hash: &str) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO users (username, password_hash) VALUES (?, ?)
             ON CONFLICT(username) DO UPDATE SET password_hash = excluded.password_hash",
        )
        .bind(identity)
        .bind(hash)
        .execute(&self.pool)
        .await
        .map_err(backend)?;
        Ok(())
    }

    async fn find_password_hash(&self, identity: &str) -> Result<Option<String>, StoreError> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT password_hash FROM users WHERE username = ?")
                .bind(identity)
                .fetch_optional(&self.pool)
                .await
                .map_err(backend)?;
        Ok(row.map(|(hash,)| hash))
    }

    async fn delete_user(&self, identity: &str) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await.map_err(backend)?;

        sqlx::query("DELETE FROM tokens WHERE username = ?")
            .bind(identity)
            .execute(&mut *tx)
            .await
            .map_err(backend)?;
        let deleted = sqlx::query("DELETE FROM users WHERE username = ?")
            .bind(identity)
            .execute(&mut *tx)
            .await
            .map_err(backend)?;

        tx.commit().await.map_err(backend)?;
        Ok(deleted.rows_affected() > 0)
    }
}

#[async_trait]
impl MountStore for SqliteStore {
    async fn create_mount(&self, mount: &Mount) -> Result<(), StoreError> {
        let result = sqlx::query(
            "INSERT INTO mounts (mount_name, username, password, public, stream_name, stream_description, template_type)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&mount.mount_name)
        .bind(&mount.username)
        .bind(&mount.password)
        .bind(mount.public)
        .bind(&mount.stream_name)
        .bind(&mount.stream_description)
        .bind(mount.template_type.as_str())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StoreError::Conflict(format!("mount {}", mount.mount_name)))
            }
            Err(e) => Err(backend(e)),
        }
    }

    async fn get_mount(&self, mount_name: &str) -> Result<Option<Mount>, StoreError> {
        let row: Option<MountRow> = sqlx::query_as("SELECT * FROM mounts WHERE mount_name = ?")
            .bind(mount_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(backend)?;
        row.map(Mount::try_from).transpose()
    }

    async fn list_mounts(&self) -> Result<Vec<Mount>, StoreError> {
        let rows: Vec<MountRow> = sqlx::query_as("SELECT * FROM mounts ORDER BY mount_name")
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;
        rows.into_iter().map(Mount::try_from).collect()
    }

    async fn update_mount(&self, mount: &Mount) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE mounts SET username = ?, password = ?, public = ?, stream_name = ?,
                stream_description = ?, template_type = ?
             WHERE mount_name = ?",
        )
        .bind(&mount.username)
        .bind(&mount.password)
        .bind(mount.public)
        .bind(&mount.stream_name)
        .bind(&mount.stream_description)
        .bind(mount.template_type.as_str())
        .bind(&mount.mount_name)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("mount {}", mount.mount_name)));
        }
        Ok(())
    }

    async fn delete_mount(&self, mount_name: &str) -> Result<Mount, StoreError> {
        let mut tx = self.pool.begin().await.map_err(backend)?;

        let row: Option<MountRow> = sqlx::query_as("SELECT * FROM mounts WHERE mount_name = ?")
            .bind(mount_name)
            .fetch_optional(&mut *tx)
            .await
            .map_err(backend)?;
        let Some(row) = row else {
            return Err(StoreError::NotFound(format!("mount {mount_name}")));
        };

        sqlx::query("DELETE FROM mounts WHERE mount_name = ?")
            .bind(mount_name)
            .execute(&mut *tx)
            .await
            .map_err(backend)?;
        tx.commit().await.map_err(backend)?;

        Mount::try_from(row)
    }
}
