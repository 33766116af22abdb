use thiserror::Error;

pub type CryptoResult<T> = Result<T, CryptoError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// The random source could not produce an IV.
    #[error("random source unavailable: {0}")]
    RandomnessUnavailable(String),

    /// Ciphertext is shorter than IV + one block or not block-aligned.
    #[error("invalid ciphertext: {len} bytes (need IV + at least one 16-byte block)")]
    InvalidCiphertext { len: usize },

    #[error("invalid padding")]
    InvalidPadding,

    /// Wrong password or corrupted data. The two are deliberately not told apart.
    #[error("decryption failed: wrong password or corrupted data")]
    DecryptionFailed,

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("decrypted data is not valid UTF-8 text")]
    InvalidText,
}
