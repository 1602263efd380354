//! `streamgate check` command implementation.
//!
//! Loads the configuration file the way `serve` does and reports what the
//! server would start with, without opening storage or binding a port.

use anyhow::{Context, Result};
use std::path::Path;
use streamgate_core::{StorageBackend, StreamgateConfig};
use streamgate_token::SecretKey;

pub fn run(config_path: &Path) -> Result<()> {
    let config = StreamgateConfig::load(config_path)
        .with_context(|| format!("Invalid configuration: {}", config_path.display()))?;

    let hex_key = config
        .security
        .resolve_secret_key()
        .context("Failed to read secret key")?
        .context("No secret key configured")?;
    let key = SecretKey::from_hex(&hex_key).context("Invalid secret key")?;

    let admin_password_set = config
        .admin
        .get_password()
        .is_some_and(|p| !p.trim().is_empty());

    println!("✔ Configuration is valid: {}", config_path.display());
    println!("  Listen: {}", config.server.bind_address());
    println!("  Key: {}", key.size());
    println!("  Token format: {:?}", config.token.format);
    println!("  Token lifetime: {}", config.token.lifetime);
    match config.storage.backend {
        StorageBackend::Memory => println!("  Storage: memory"),
        StorageBackend::Sqlite => println!("  Storage: sqlite ({})", config.storage.db_file),
    }
    println!("  Admin: {}", config.admin.username);

    if !admin_password_set {
        anyhow::bail!("admin password is not set (admin.password or admin.password_env)");
    }

    Ok(())
}
