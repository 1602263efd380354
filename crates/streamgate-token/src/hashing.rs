//! One-way transforms for stored credentials.
//!
//! Passwords get a slow, salted Argon2 hash. Tokens get a fast SHA-256
//! fingerprint, used only as an index key: the token is already sealed by
//! the cipher, so the digest is not what keeps it secret.

use crate::error::TokenError;
use argon2::{
    Argon2, Params, PasswordHash, PasswordVerifier,
    password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
};
use sha2::{Digest, Sha256};

/// Hash a password into an Argon2 PHC string with a fresh salt.
pub fn hash_password(password: &str) -> Result<String, TokenError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| TokenError::PasswordHash(e.to_string()))?
        .to_string();
    Ok(hash)
}

/// Check a password against a stored PHC string.
///
/// Malformed hashes verify as `false`.
pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Whether a stored hash was made with weaker or different parameters than
/// [`hash_password`] uses today.
pub fn needs_rehash(hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return true;
    };
    if parsed.algorithm != argon2::ARGON2ID_IDENT {
        return true;
    }
    let Ok(params) = Params::try_from(&parsed) else {
        return true;
    };
    let current = Params::default();
    params.m_cost() != current.m_cost()
        || params.t_cost() != current.t_cost()
        || params.p_cost() != current.p_cost()
}

/// SHA-256 of the token, as 64 lowercase hex characters.
pub fn fingerprint(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}
