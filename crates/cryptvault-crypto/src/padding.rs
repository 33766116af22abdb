//! PKCS#7 padding to the cipher block size

use crate::error::CryptoError;
use crate::BLOCK_SIZE;

/// Pad `data` to a multiple of the block size.
///
/// Always appends between 1 and 16 bytes, each holding the pad length; an
/// already aligned input gains a full block of `0x10`.
pub fn pad(data: &[u8]) -> Vec<u8> {
    let pad_len = BLOCK_SIZE - data.len() % BLOCK_SIZE;
    let mut padded = Vec::with_capacity(data.len() + pad_len);
    padded.extend_from_slice(data);
    padded.resize(data.len() + pad_len, pad_len as u8);
    padded
}

/// Strip PKCS#7 padding, validating every pad byte.
pub fn unpad(data: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if data.is_empty() || data.len() % BLOCK_SIZE != 0 {
        return Err(CryptoError::InvalidPadding);
    }

    let pad_len = data[data.len() - 1] as usize;
    if pad_len == 0 || pad_len > BLOCK_SIZE {
        return Err(CryptoError::InvalidPadding);
    }

    let (body, trailer) = data.split_at(data.len() - pad_len);
    if trailer.iter().any(|&b| b as usize != pad_len) {
        return Err(CryptoError::InvalidPadding);
    }

    Ok(body.to_vec())
}
