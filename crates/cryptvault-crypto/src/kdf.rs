//! Key derivation: password → SHA-256 → cipher key
//!
//! A single hash, no salt and no work factor. The key is reproducible from
//! the password alone, so the ciphertext format needs no header.

use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroize;

use crate::sha256;
use crate::KEY_SIZE;

/// A 256-bit cipher key derived from a password.
///
/// Zeroized on drop to prevent secrets lingering in memory.
#[derive(Clone)]
pub struct CipherKey {
    bytes: [u8; KEY_SIZE],
}

impl CipherKey {
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl Drop for CipherKey {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

impl std::fmt::Debug for CipherKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Derive the cipher key as SHA-256 of the password's UTF-8 bytes.
pub fn derive_key(password: &SecretString) -> CipherKey {
    let digest = sha256::hash(password.expose_secret().as_bytes());
    CipherKey::from_bytes(*digest.as_bytes())
}
