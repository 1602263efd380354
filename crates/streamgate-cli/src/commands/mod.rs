//! CLI command implementations for the Streamgate stream API.

pub mod check;
pub mod keys;
pub mod password;
pub mod serve;
pub mod token;

use anyhow::Context;
use std::fs;
use std::path::Path;
use streamgate_token::SecretKey;

/// Read a value that may be given inline or as a path to a file holding it.
pub(crate) fn inline_or_file(value: String) -> anyhow::Result<String> {
    let path = Path::new(&value);
    if path.is_file() {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        return Ok(content.trim().to_string());
    }
    Ok(value)
}

/// Resolve the token key from either a file path or a hex-encoded string.
pub(crate) fn resolve_key(key: Option<String>) -> anyhow::Result<SecretKey> {
    let key = key.context(
        "Secret key not provided. Either pass --key <path|hex> or set STREAMGATE_SECRET_KEY",
    )?;
    let hex_key = inline_or_file(key)?;
    SecretKey::from_hex(&hex_key)
        .context("Failed to parse secret key. Expected 32, 48 or 64 hex characters")
}
