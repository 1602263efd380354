//! Key management commands.
//!
//! `streamgate keys generate` - Generate a new token encryption key.

use std::fs;
use std::path::PathBuf;
use streamgate_token::{KeySize, SecretKey};

/// Generate a new key and print it or write it to `output`.
pub fn generate(size: KeySize, output: Option<PathBuf>) -> anyhow::Result<()> {
    let key = SecretKey::generate(size);

    if let Some(output_path) = output {
        if let Some(parent) = output_path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&output_path, key.to_hex())?;

        println!("✔ Generated {size} key: {}", output_path.display());
        println!();
        println!("⚠️  Keep this key secret! Anyone holding it can mint tokens.");
        println!();
        println!("Reference it from streamgate.yaml:");
        println!("  security:");
        println!("    secret_key_file: {}", output_path.display());
    } else {
        println!("{}", key.to_hex());
    }

    Ok(())
}
