//! AES-256-CBC envelope
//!
//! Ciphertext format (binary, no header):
//! ```text
//! [16 bytes: random IV][16 bytes: C1] ... [16 bytes: Cn]     n >= 1
//! ```
//!
//! Each Ci = AES(Pi XOR C(i-1)), with C0 = IV. Blocks of one message are
//! strictly sequential; independent messages may be processed concurrently,
//! each with its own [`CbcCipher`].

use secrecy::SecretString;
use tracing::debug;

use crate::aes::{decrypt_block, encrypt_block, expand_key, Block, KeySchedule};
use crate::error::{CryptoError, CryptoResult};
use crate::kdf::{derive_key, CipherKey};
use crate::padding::{pad, unpad};
use crate::random::RandomSource;
use crate::{BLOCK_SIZE, IV_SIZE, MIN_CIPHERTEXT_SIZE};

/// A keyed CBC cipher. Holds only the expanded schedule, which is read-only
/// for the lifetime of the value.
#[derive(Debug, Clone)]
pub struct CbcCipher {
    schedule: KeySchedule,
}

impl CbcCipher {
    pub fn new(key: &CipherKey) -> Self {
        Self {
            schedule: expand_key(key.as_bytes()),
        }
    }

    /// Derive the key from `password` and expand it.
    pub fn from_password(password: &SecretString) -> Self {
        Self::new(&derive_key(password))
    }

    /// Pad, draw a fresh IV from `rng`, and encrypt.
    ///
    /// Returns `IV ‖ C1 ‖ … ‖ Cn`.
    pub fn encrypt<R: RandomSource + ?Sized>(
        &self,
        plaintext: &[u8],
        rng: &R,
    ) -> CryptoResult<Vec<u8>> {
        let mut iv = [0u8; IV_SIZE];
        rng.fill(&mut iv)?;
        Ok(self.encrypt_with_iv(plaintext, &iv))
    }

    /// Encrypt with a caller-chosen IV. Reusing an IV under the same key
    /// leaks equality of message prefixes.
    pub fn encrypt_with_iv(&self, plaintext: &[u8], iv: &Block) -> Vec<u8> {
        let padded = pad(plaintext);

        let mut out = Vec::with_capacity(IV_SIZE + padded.len());
        out.extend_from_slice(iv);

        let mut chain = *iv;
        for chunk in padded.chunks_exact(BLOCK_SIZE) {
            let mixed: Block = std::array::from_fn(|i| chunk[i] ^ chain[i]);
            chain = encrypt_block(&mixed, &self.schedule);
            out.extend_from_slice(&chain);
        }

        debug!(
            plaintext_len = plaintext.len(),
            ciphertext_len = out.len(),
            "cbc encrypt"
        );
        out
    }

    /// Decrypt `IV ‖ C1 ‖ … ‖ Cn` and strip padding.
    ///
    /// A padding failure is reported as [`CryptoError::DecryptionFailed`]:
    /// a wrong password and corrupted data are indistinguishable here.
    pub fn decrypt(&self, ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
        if ciphertext.len() < MIN_CIPHERTEXT_SIZE || (ciphertext.len() - IV_SIZE) % BLOCK_SIZE != 0
        {
            return Err(CryptoError::InvalidCiphertext {
                len: ciphertext.len(),
            });
        }

        let (iv, body) = ciphertext.split_at(IV_SIZE);
        let mut chain: Block = [0u8; BLOCK_SIZE];
        chain.copy_from_slice(iv);

        let mut padded = Vec::with_capacity(body.len());
        for chunk in body.chunks_exact(BLOCK_SIZE) {
            let mut block: Block = [0u8; BLOCK_SIZE];
            block.copy_from_slice(chunk);
            let decrypted = decrypt_block(&block, &self.schedule);
            padded.extend(decrypted.iter().zip(chain.iter()).map(|(d, c)| d ^ c));
            chain = block;
        }

        let plaintext = unpad(&padded).map_err(|_| CryptoError::DecryptionFailed)?;
        debug!(
            ciphertext_len = ciphertext.len(),
            plaintext_len = plaintext.len(),
            "cbc decrypt"
        );
        Ok(plaintext)
    }
}

/// Encrypt `plaintext` under a key derived from `password`.
pub fn encrypt<R: RandomSource + ?Sized>(
    plaintext: &[u8],
    password: &SecretString,
    rng: &R,
) -> CryptoResult<Vec<u8>> {
    CbcCipher::from_password(password).encrypt(plaintext, rng)
}

/// Decrypt `ciphertext` under a key derived from `password`.
pub fn decrypt(ciphertext: &[u8], password: &SecretString) -> CryptoResult<Vec<u8>> {
    CbcCipher::from_password(password).decrypt(ciphertext)
}
