//! Batch encrypt/decrypt over many files
//!
//! Files are processed in parallel on a rayon pool. Each file gets its own
//! cipher value; the password and the OS random source are the only shared
//! inputs. One file failing does not stop the others.

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use rayon::prelude::*;
use secrecy::SecretString;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::warn;

use cryptvault_core::config::FilesConfig;
use cryptvault_core::paths;
use cryptvault_crypto::{decrypt_file, encrypt_file, OsRandom};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Encrypt,
    Decrypt,
}

impl Direction {
    pub fn past_tense(self) -> &'static str {
        match self {
            Direction::Encrypt => "encrypted",
            Direction::Decrypt => "decrypted",
        }
    }
}

#[derive(Debug)]
pub enum Outcome {
    Done { output: PathBuf, elapsed: Duration },
    NotFound,
    Failed(String),
}

#[derive(Debug)]
pub struct BatchEntry {
    pub input: PathBuf,
    pub outcome: Outcome,
}

impl BatchEntry {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, Outcome::Done { .. })
    }
}

/// Output path for `input` under the configured naming rules.
pub fn output_path(input: &Path, direction: Direction, files: &FilesConfig) -> PathBuf {
    match direction {
        Direction::Encrypt => paths::add_extension(input, &files.extension),
        Direction::Decrypt => {
            paths::decrypted_output(input, &files.extension, &files.decrypted_prefix)
        }
    }
}

fn process_one(
    input: &Path,
    direction: Direction,
    password: &SecretString,
    files: &FilesConfig,
) -> Outcome {
    if !input.is_file() {
        return Outcome::NotFound;
    }

    let output = output_path(input, direction, files);
    let start = Instant::now();
    let result = match direction {
        Direction::Encrypt => encrypt_file(input, &output, password, &OsRandom),
        Direction::Decrypt => decrypt_file(input, &output, password),
    };

    match result {
        Ok(_) => Outcome::Done {
            output,
            elapsed: start.elapsed(),
        },
        Err(e) => {
            warn!(input = %input.display(), error = %format!("{e:#}"), "batch entry failed");
            Outcome::Failed(format!("{e:#}"))
        }
    }
}

/// Run `direction` over `inputs` on `workers` threads (0 = one per CPU).
///
/// Results come back in input order.
pub fn run(
    inputs: &[PathBuf],
    direction: Direction,
    password: &SecretString,
    files: &FilesConfig,
    workers: usize,
    progress: Option<&ProgressBar>,
) -> Result<Vec<BatchEntry>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .context("building batch worker pool")?;

    let entries = pool.install(|| {
        inputs
            .par_iter()
            .map(|input| {
                let outcome = process_one(input, direction, password, files);
                if let Some(pb) = progress {
                    pb.inc(1);
                }
                BatchEntry {
                    input: input.clone(),
                    outcome,
                }
            })
            .collect()
    });

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, data: &[u8]) -> PathBuf {
        let p = dir.join(name);
        std::fs::write(&p, data).unwrap();
        p
    }

    #[test]
    fn test_batch_roundtrip() {
        let dir = TempDir::new().unwrap();
        let files = FilesConfig::default();
        let pw = SecretString::from("batch-pw");

        let inputs: Vec<PathBuf> = (0..5)
            .map(|i| write(dir.path(), &format!("f{i}.txt"), format!("file {i}").as_bytes()))
            .collect();

        let encrypted = run(&inputs, Direction::Encrypt, &pw, &files, 2, None).unwrap();
        assert!(encrypted.iter().all(BatchEntry::succeeded));
        assert_eq!(encrypted[3].input, inputs[3], "results keep input order");

        // Remove plaintexts so decrypt has to recreate them
        for p in &inputs {
            std::fs::remove_file(p).unwrap();
        }

        let enc_paths: Vec<PathBuf> = inputs
            .iter()
            .map(|p| paths::add_extension(p, "enc"))
            .collect();
        let decrypted = run(&enc_paths, Direction::Decrypt, &pw, &files, 0, None).unwrap();
        assert!(decrypted.iter().all(BatchEntry::succeeded));

        for (i, p) in inputs.iter().enumerate() {
            assert_eq!(std::fs::read(p).unwrap(), format!("file {i}").as_bytes());
        }
    }

    #[test]
    fn test_batch_reports_missing_and_failed() {
        let dir = TempDir::new().unwrap();
        let files = FilesConfig::default();
        let pw = SecretString::from("pw");

        let good = write(dir.path(), "good.txt", b"ok");
        let missing = dir.path().join("missing.txt");
        let garbage = write(dir.path(), "garbage.enc", &[0u8; 20]);

        let enc = run(
            &[good.clone(), missing.clone()],
            Direction::Encrypt,
            &pw,
            &files,
            1,
            None,
        )
        .unwrap();
        assert!(enc[0].succeeded());
        assert!(matches!(enc[1].outcome, Outcome::NotFound));

        let dec = run(&[garbage], Direction::Decrypt, &pw, &files, 1, None).unwrap();
        match &dec[0].outcome {
            Outcome::Failed(msg) => assert!(msg.contains("invalid ciphertext")),
            other => panic!("expected Failed, got: {other:?}"),
        }
    }

    #[test]
    fn test_output_path_rules() {
        let files = FilesConfig::default();
        assert_eq!(
            output_path(Path::new("a/b.txt"), Direction::Encrypt, &files),
            PathBuf::from("a/b.txt.enc")
        );
        assert_eq!(
            output_path(Path::new("a/b.txt.enc"), Direction::Decrypt, &files),
            PathBuf::from("a/b.txt")
        );
        assert_eq!(
            output_path(Path::new("a/b.bin"), Direction::Decrypt, &files),
            PathBuf::from("a/decrypted_b.bin")
        );
    }
}
