//! Hex text surface: encrypt a string to lowercase hex and back

use secrecy::SecretString;

use crate::cbc;
use crate::error::{CryptoError, CryptoResult};
use crate::random::RandomSource;

/// Encrypt UTF-8 text and hex-encode the envelope (two lowercase chars per byte).
pub fn encrypt_text<R: RandomSource + ?Sized>(
    text: &str,
    password: &SecretString,
    rng: &R,
) -> CryptoResult<String> {
    let envelope = cbc::encrypt(text.as_bytes(), password, rng)?;
    Ok(hex::encode(envelope))
}

/// Decode a hex envelope and decrypt it back to text.
///
/// Surrounding whitespace is ignored; anything else that is not a hex pair
/// is rejected.
pub fn decrypt_text(hex_envelope: &str, password: &SecretString) -> CryptoResult<String> {
    let envelope =
        hex::decode(hex_envelope.trim()).map_err(|e| CryptoError::InvalidHex(e.to_string()))?;
    let plaintext = cbc::decrypt(&envelope, password)?;
    String::from_utf8(plaintext).map_err(|_| CryptoError::InvalidText)
}
