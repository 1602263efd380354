//! AES-GCM sealing of token payloads.

use crate::error::TokenError;
use aes_gcm::aead::consts::U12;
use aes_gcm::aead::generic_array::typenum::Unsigned;
use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::aes::Aes192;
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm};
use rand::RngCore;
use std::fmt;

type Aes192Gcm = AesGcm<Aes192, U12>;

/// Supported AES key sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySize {
    Aes128,
    Aes192,
    Aes256,
}

impl KeySize {
    /// Key length in bytes.
    pub fn len(self) -> usize {
        match self {
            KeySize::Aes128 => 16,
            KeySize::Aes192 => 24,
            KeySize::Aes256 => 32,
        }
    }

    fn from_len(len: usize) -> Option<Self> {
        match len {
            16 => Some(KeySize::Aes128),
            24 => Some(KeySize::Aes192),
            32 => Some(KeySize::Aes256),
            _ => None,
        }
    }
}

impl fmt::Display for KeySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AES-{}", self.len() * 8)
    }
}

/// Raw key bytes for the token cipher.
#[derive(Clone, PartialEq, Eq)]
pub struct SecretKey {
    bytes: Vec<u8>,
}

impl SecretKey {
    /// Decode a hex-encoded key of 32, 48 or 64 hex characters.
    pub fn from_hex(hex_key: &str) -> Result<Self, TokenError> {
        let bytes = hex::decode(hex_key.trim())
            .map_err(|e| TokenError::KeyFormat(format!("key is not valid hex: {e}")))?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TokenError> {
        if KeySize::from_len(bytes.len()).is_none() {
            return Err(TokenError::KeyFormat(format!(
                "key must be 16, 24 or 32 bytes, got {}",
                bytes.len()
            )));
        }
        Ok(Self {
            bytes: bytes.to_vec(),
        })
    }

    /// Generate a new random key.
    pub fn generate(size: KeySize) -> Self {
        let mut rng = rand::rng();
        let mut bytes = vec![0u8; size.len()];
        rng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    pub fn size(&self) -> KeySize {
        // Length is checked on construction.
        KeySize::from_len(self.bytes.len()).unwrap_or(KeySize::Aes256)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey({}, <redacted>)", self.size())
    }
}

#[derive(Clone)]
enum AesGcmCipher {
    Aes128(Aes128Gcm),
    Aes192(Aes192Gcm),
    Aes256(Aes256Gcm),
}

/// Authenticated encryption of short strings.
///
/// Output is hex(nonce || ciphertext || tag). A fresh random nonce is drawn
/// for every call, so sealing the same plaintext twice never yields the same
/// output. The cipher is immutable and can be shared freely between requests.
#[derive(Clone)]
pub struct Cipher {
    inner: AesGcmCipher,
}

impl Cipher {
    pub fn new(key: &SecretKey) -> Result<Self, TokenError> {
        let inner = match key.size() {
            KeySize::Aes128 => {
                AesGcmCipher::Aes128(Aes128Gcm::new_from_slice(&key.bytes).map_err(key_error)?)
            }
            KeySize::Aes192 => {
                AesGcmCipher::Aes192(Aes192Gcm::new_from_slice(&key.bytes).map_err(key_error)?)
            }
            KeySize::Aes256 => {
                AesGcmCipher::Aes256(Aes256Gcm::new_from_slice(&key.bytes).map_err(key_error)?)
            }
        };
        Ok(Self { inner })
    }

    /// Build a cipher straight from a hex key.
    pub fn from_hex(hex_key: &str) -> Result<Self, TokenError> {
        Self::new(&SecretKey::from_hex(hex_key)?)
    }

    /// Encrypt `plaintext`, returning hex(nonce || ciphertext || tag).
    pub fn encrypt(&self, plaintext: &str) -> Result<String, TokenError> {
        let sealed = match &self.inner {
            AesGcmCipher::Aes128(c) => seal(c, plaintext.as_bytes()),
            AesGcmCipher::Aes192(c) => seal(c, plaintext.as_bytes()),
            AesGcmCipher::Aes256(c) => seal(c, plaintext.as_bytes()),
        }?;
        Ok(hex::encode(sealed))
    }

    /// Reverse of [`Cipher::encrypt`].
    pub fn decrypt(&self, encoded: &str) -> Result<String, TokenError> {
        let data = hex::decode(encoded)
            .map_err(|e| TokenError::Decryption(format!("invalid hex: {e}")))?;

        let plaintext = match &self.inner {
            AesGcmCipher::Aes128(c) => open(c, &data),
            AesGcmCipher::Aes192(c) => open(c, &data),
            AesGcmCipher::Aes256(c) => open(c, &data),
        }?;

        String::from_utf8(plaintext)
            .map_err(|_| TokenError::Decryption("plaintext is not UTF-8".to_string()))
    }
}

impl fmt::Debug for Cipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = match self.inner {
            AesGcmCipher::Aes128(_) => KeySize::Aes128,
            AesGcmCipher::Aes192(_) => KeySize::Aes192,
            AesGcmCipher::Aes256(_) => KeySize::Aes256,
        };
        f.debug_struct("Cipher").field("algorithm", &format!("{size}-GCM")).finish()
    }
}

fn key_error(e: impl fmt::Display) -> TokenError {
    TokenError::KeyFormat(e.to_string())
}

fn seal<C: Aead>(cipher: &C, plaintext: &[u8]) -> Result<Vec<u8>, TokenError> {
    let nonce = C::generate_nonce(&mut OsRng);
    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|e| TokenError::Encryption(e.to_string()))?;

    let mut out = Vec::with_capacity(nonce.len() + ciphertext.len());
    out.extend_from_slice(&nonce);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

fn open<C: Aead>(cipher: &C, data: &[u8]) -> Result<Vec<u8>, TokenError> {
    let nonce_len = <C::NonceSize as Unsigned>::USIZE;
    if data.len() < nonce_len {
        return Err(TokenError::Decryption(format!(
            "input is {} bytes, shorter than the {nonce_len}-byte nonce",
            data.len()
        )));
    }

    let (nonce, ciphertext) = data.split_at(nonce_len);
    cipher
        .decrypt(aes_gcm::aead::Nonce::<C>::from_slice(nonce), ciphertext)
        .map_err(|_| TokenError::Decryption("authentication failed".to_string()))
}
