//! Output path naming for encrypted and decrypted files
//!
//! `report.pdf` ⇄ `report.pdf.enc`. Decrypting a file that does not carry
//! the extension writes `decrypted_<name>` next to it instead of guessing.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// `notes.txt` + `enc` → `notes.txt.enc`
pub fn add_extension(path: &Path, ext: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".");
    name.push(ext);
    PathBuf::from(name)
}

/// The file name with `.<ext>` removed, if it carries the extension.
fn stripped_name<'a>(path: &'a Path, ext: &str) -> Option<&'a str> {
    path.file_name()
        .and_then(|n| n.to_str())
        .and_then(|n| n.strip_suffix(ext))
        .and_then(|n| n.strip_suffix('.'))
        .filter(|stem| !stem.is_empty())
}

/// True when the file name ends in `.<ext>` and has something before it.
pub fn has_extension(path: &Path, ext: &str) -> bool {
    stripped_name(path, ext).is_some()
}

/// `notes.txt.enc` → `notes.txt`; paths without the extension are returned unchanged.
pub fn strip_extension(path: &Path, ext: &str) -> PathBuf {
    match stripped_name(path, ext) {
        Some(stem) => path.with_file_name(stem),
        None => path.to_path_buf(),
    }
}

/// Where `decrypt` writes when no output was given.
pub fn decrypted_output(path: &Path, ext: &str, prefix: &str) -> PathBuf {
    if has_extension(path, ext) {
        return strip_extension(path, ext);
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{prefix}{name}"))
}
