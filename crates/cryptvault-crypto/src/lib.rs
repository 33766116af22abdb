//! cryptvault-crypto: password-based file and text encryption
//!
//! Architecture: AES-256 in CBC mode with PKCS#7 padding, keyed by SHA-256
//!
//! Both primitives are implemented in this crate; no platform cryptography
//! library is involved. The only external capability is the random source
//! used for IVs (see [`random::RandomSource`]).
//!
//! Key derivation and envelope:
//! ```text
//! password ──SHA-256──► CipherKey (256-bit)
//!                           └── KeySchedule (15 round keys × 16 bytes)
//!
//! plaintext ──pad──► P1 … Pn ──CBC(IV)──► IV ‖ C1 ‖ … ‖ Cn
//! ```
//!
//! There is no MAC: the padding check on decrypt is the only signal that the
//! password was wrong or the data corrupted, and the two cases are reported
//! as the same [`CryptoError::DecryptionFailed`].

pub mod aes;
pub mod cbc;
pub mod error;
pub mod file;
pub mod gf;
pub mod kdf;
pub mod padding;
pub mod random;
pub mod sha256;
pub mod text;

pub use aes::{decrypt_block, encrypt_block, expand_key, Block, KeySchedule};
pub use cbc::{decrypt, encrypt, CbcCipher};
pub use error::{CryptoError, CryptoResult};
pub use file::{decrypt_file, encrypt_file, hash_file, FileReport};
pub use kdf::{derive_key, CipherKey};
pub use padding::{pad, unpad};
pub use random::{OsRandom, RandomSource};
pub use sha256::{hash, Digest, Sha256};
pub use text::{decrypt_text, encrypt_text};

/// Size of an AES block in bytes (128-bit)
pub const BLOCK_SIZE: usize = 16;

/// Size of the cipher key in bytes (256-bit)
pub const KEY_SIZE: usize = 32;

/// Size of the CBC initialization vector
pub const IV_SIZE: usize = BLOCK_SIZE;

/// Size of a SHA-256 digest
pub const DIGEST_SIZE: usize = 32;

/// Smallest valid ciphertext: IV plus one block
pub const MIN_CIPHERTEXT_SIZE: usize = IV_SIZE + BLOCK_SIZE;
