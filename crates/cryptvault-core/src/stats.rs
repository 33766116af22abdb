//! Simple content statistics shown after encrypt/decrypt and by `stats`

use anyhow::{Context, Result};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileStats {
    /// Size on disk in bytes
    pub size: u64,
    /// Total characters (counted per byte)
    pub chars: u64,
    /// ASCII letters
    pub letters: u64,
    /// ASCII digits
    pub digits: u64,
    /// Newline count
    pub lines: u64,
}

impl FileStats {
    pub fn from_bytes(data: &[u8]) -> Self {
        data.iter().fold(
            FileStats {
                size: data.len() as u64,
                chars: data.len() as u64,
                ..Default::default()
            },
            |mut acc, &b| {
                if b.is_ascii_alphabetic() {
                    acc.letters += 1;
                }
                if b.is_ascii_digit() {
                    acc.digits += 1;
                }
                if b == b'\n' {
                    acc.lines += 1;
                }
                acc
            },
        )
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)
            .with_context(|| format!("cannot stat '{}'", path.display()))?;
        Ok(Self::from_bytes(&data))
    }
}
