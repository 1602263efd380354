//! # streamgate-token
//!
//! Self-contained session tokens for the Streamgate stream API.
//!
//! This crate provides functionality for:
//! - Loading or generating the AES key that seals tokens
//! - Issuing tokens that carry a subject, an expiry and a list of rights
//! - Validating a token against a required right and an expected subject
//! - Hashing passwords and fingerprinting tokens for storage
//!
//! ## Token layout
//!
//! ```text
//! k_token:<hex( nonce[12] || AES-GCM ciphertext || tag[16] )>
//! ```
//!
//! The sealed plaintext is the claim set: issued-at, expiry, subject,
//! application name, application version, then the granted rights. See
//! [`claims`] for the two supported encodings.
//!
//! Tokens themselves are never stored. The server keeps only
//! [`hashing::fingerprint`] of each issued token, mapped to its owner, so a
//! token can be revoked by deleting that row.

pub mod cipher;
pub mod claims;
pub mod error;
pub mod hashing;
pub mod token;

pub use cipher::{Cipher, KeySize, SecretKey};
pub use claims::ClaimSet;
pub use error::TokenError;
pub use hashing::{fingerprint, hash_password, needs_rehash, verify_password};
pub use token::{Rejection, TOKEN_PREFIX, TokenCodec, inspect_token_unverified};
