//! Whole-file encryption, decryption and hashing
//!
//! Files are read fully into memory; the output is written only after the
//! cipher operation succeeded, so a failed decrypt never leaves a partial
//! or garbage output file behind.

use anyhow::{Context, Result};
use secrecy::SecretString;
use std::io::Read;
use std::path::Path;
use tracing::info;

use crate::cbc::CbcCipher;
use crate::error::CryptoError;
use crate::random::RandomSource;
use crate::sha256::{Digest, Sha256};

/// Byte counts for one completed file operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileReport {
    pub input_bytes: u64,
    pub output_bytes: u64,
}

/// Encrypt `input` into `output` under a key derived from `password`.
pub fn encrypt_file<R: RandomSource + ?Sized>(
    input: &Path,
    output: &Path,
    password: &SecretString,
    rng: &R,
) -> Result<FileReport> {
    let data = std::fs::read(input)
        .with_context(|| format!("cannot open '{}'", input.display()))?;

    let envelope = CbcCipher::from_password(password)
        .encrypt(&data, rng)
        .context("encryption failed")?;

    std::fs::write(output, &envelope)
        .with_context(|| format!("cannot create '{}'", output.display()))?;

    info!(
        input = %input.display(),
        output = %output.display(),
        bytes = data.len(),
        "file encrypted"
    );

    Ok(FileReport {
        input_bytes: data.len() as u64,
        output_bytes: envelope.len() as u64,
    })
}

/// Decrypt `input` into `output` under a key derived from `password`.
pub fn decrypt_file(input: &Path, output: &Path, password: &SecretString) -> Result<FileReport> {
    let envelope = std::fs::read(input)
        .with_context(|| format!("cannot open '{}'", input.display()))?;

    let plaintext = CbcCipher::from_password(password)
        .decrypt(&envelope)
        .map_err(|e| match e {
            CryptoError::DecryptionFailed => {
                anyhow::anyhow!("decryption failed (wrong password or corrupt file)")
            }
            other => anyhow::Error::new(other),
        })
        .with_context(|| format!("decrypting '{}'", input.display()))?;

    std::fs::write(output, &plaintext)
        .with_context(|| format!("cannot create '{}'", output.display()))?;

    info!(
        input = %input.display(),
        output = %output.display(),
        bytes = plaintext.len(),
        "file decrypted"
    );

    Ok(FileReport {
        input_bytes: envelope.len() as u64,
        output_bytes: plaintext.len() as u64,
    })
}

/// SHA-256 of a file's contents, read in 64 KiB pieces.
pub fn hash_file(path: &Path) -> Result<Digest> {
    let mut file = std::fs::File::open(path)
        .with_context(|| format!("opening file for hashing: {}", path.display()))?;

    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; 64 * 1024];

    loop {
        let n = file
            .read(&mut buf)
            .with_context(|| format!("reading for hash: {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::OsRandom;
    use tempfile::TempDir;

    #[test]
    fn test_file_roundtrip() {
        let dir = TempDir::new().unwrap();
        let plain = dir.path().join("notes.txt");
        let enc = dir.path().join("notes.txt.enc");
        let out = dir.path().join("notes.out");
        std::fs::write(&plain, b"line one\nline two\n").unwrap();

        let pw = SecretString::from("file-pw");
        let report = encrypt_file(&plain, &enc, &pw, &OsRandom).unwrap();
        assert_eq!(report.input_bytes, 18);
        assert_eq!(report.output_bytes, 16 + 32);

        let report = decrypt_file(&enc, &out, &pw).unwrap();
        assert_eq!(report.output_bytes, 18);
        assert_eq!(std::fs::read(&out).unwrap(), b"line one\nline two\n");
    }

    struct CountingIv;

    impl RandomSource for CountingIv {
        fn fill(&self, buf: &mut [u8]) -> Result<(), CryptoError> {
            for (i, b) in buf.iter_mut().enumerate() {
                *b = i as u8;
            }
            Ok(())
        }
    }

    #[test]
    fn test_decrypt_wrong_password_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let plain = dir.path().join("data");
        let enc = dir.path().join("data.enc");
        let out = dir.path().join("data.out");
        std::fs::write(&plain, b"secret data").unwrap();

        encrypt_file(&plain, &enc, &SecretString::from("password-1"), &CountingIv).unwrap();
        let err = decrypt_file(&enc, &out, &SecretString::from("password-2")).unwrap_err();

        assert!(format!("{err:#}").contains("wrong password or corrupt file"));
        assert!(!out.exists());
    }

    #[test]
    fn test_decrypt_malformed_file() {
        let dir = TempDir::new().unwrap();
        let enc = dir.path().join("short.enc");
        let out = dir.path().join("short");
        std::fs::write(&enc, [0u8; 40]).unwrap();

        let err = decrypt_file(&enc, &out, &SecretString::from("pw")).unwrap_err();
        assert!(format!("{err:#}").contains("invalid ciphertext"));
        assert!(!out.exists());
    }

    #[test]
    fn test_missing_input() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.txt");
        let err = encrypt_file(
            &missing,
            &dir.path().join("nope.enc"),
            &SecretString::from("pw"),
            &OsRandom,
        )
        .unwrap_err();
        assert!(err.to_string().contains("cannot open"));
    }

    #[test]
    fn test_hash_file_matches_in_memory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blob.bin");
        let data: Vec<u8> = (0..200_000u32).map(|i| (i * 31 % 251) as u8).collect();
        std::fs::write(&path, &data).unwrap();

        assert_eq!(hash_file(&path).unwrap(), crate::sha256::hash(&data));
    }

    #[test]
    fn test_hash_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty");
        std::fs::write(&path, b"").unwrap();
        assert_eq!(
            hash_file(&path).unwrap().to_hex(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
