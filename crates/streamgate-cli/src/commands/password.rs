//! Password hashing commands.
//!
//! `streamgate password hash` - Hash a password for storage.
//! `streamgate password verify` - Check a password against a stored hash.

use streamgate_token::{hash_password, verify_password};

pub fn hash(password: String) -> anyhow::Result<()> {
    println!("{}", hash_password(&password)?);
    Ok(())
}

pub fn verify(password: String, hash: String) -> anyhow::Result<()> {
    if verify_password(&password, &hash) {
        println!("✔ Password matches");
        Ok(())
    } else {
        anyhow::bail!("password does not match");
    }
}
