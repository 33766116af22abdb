//! Random byte source for IV generation
//!
//! The cipher never reaches for randomness on its own: callers pass a
//! [`RandomSource`]. [`OsRandom`] is the production source; tests substitute
//! fixed or failing sources.

use rand::rngs::OsRng;
use rand::RngCore;

use crate::error::CryptoError;

/// Fills buffers with cryptographically secure random bytes.
///
/// Implementations must tolerate concurrent use from several threads.
pub trait RandomSource: Send + Sync {
    fn fill(&self, buf: &mut [u8]) -> Result<(), CryptoError>;
}

/// Operating-system CSPRNG (getrandom / BCryptGenRandom / SecRandomCopyBytes).
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<(), CryptoError> {
        OsRng
            .try_fill_bytes(buf)
            .map_err(|e| CryptoError::RandomnessUnavailable(e.to_string()))
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &R {
    fn fill(&self, buf: &mut [u8]) -> Result<(), CryptoError> {
        (**self).fill(buf)
    }
}
