//! First-N-lines preview of a file's content

use anyhow::{Context, Result};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub lines: Vec<String>,
    /// More lines followed the ones shown
    pub truncated: bool,
}

pub fn preview(text: &str, max_lines: usize) -> Preview {
    let mut iter = text.lines();
    let lines: Vec<String> = iter.by_ref().take(max_lines).map(str::to_owned).collect();
    Preview {
        lines,
        truncated: iter.next().is_some(),
    }
}

/// Preview a file, replacing invalid UTF-8 sequences.
pub fn preview_file(path: &Path, max_lines: usize) -> Result<Preview> {
    let data = std::fs::read(path)
        .with_context(|| format!("cannot open '{}'", path.display()))?;
    Ok(preview(&String::from_utf8_lossy(&data), max_lines))
}
