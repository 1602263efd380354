//! Error types for the token crate.

use thiserror::Error;

/// Errors surfaced to callers that configure the cipher or issue tokens.
///
/// Validation never returns these: a token that fails to decrypt or parse
/// is a [`crate::Rejection`], which callers collapse into a plain denial.
#[derive(Debug, Error)]
pub enum TokenError {
    /// Key material is not hex or not 16, 24 or 32 bytes long.
    #[error("invalid key material: {0}")]
    KeyFormat(String),

    /// Sealing the payload failed.
    #[error("failed to encrypt token: {0}")]
    Encryption(String),

    /// Ciphertext is malformed, truncated or fails authentication.
    #[error("failed to decrypt: {0}")]
    Decryption(String),

    /// Caller misuse of the issuance API.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Password hashing failed.
    #[error("failed to hash password: {0}")]
    PasswordHash(String),
}
