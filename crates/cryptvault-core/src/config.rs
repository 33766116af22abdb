use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{VaultError, VaultResult};

/// Top-level configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    pub log: LogConfig,
    pub files: FilesConfig,
    pub batch: BatchConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Log level filter (default: warn)
    pub level: String,
    /// Log format: "json" or "text"
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Extension appended to encrypted files, without the dot (default: enc)
    pub extension: String,
    /// Prefix for decrypted output when the input lacks the extension
    pub decrypted_prefix: String,
    /// Lines shown by `view` before truncating
    pub preview_lines: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Worker thread count (0 = cpu_count)
    pub workers: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: LogFormat::Text,
        }
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            extension: "enc".into(),
            decrypted_prefix: "decrypted_".into(),
            preview_lines: 50,
        }
    }
}

impl VaultConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(s: &str) -> VaultResult<Self> {
        let mut config: VaultConfig = toml::from_str(s)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, falling back to defaults when the file does not exist.
    pub fn load(path: &Path) -> VaultResult<Self> {
        if !path.exists() {
            tracing::warn!("config file not found: {}  (using defaults)", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    fn normalize(&mut self) {
        let ext = self.files.extension.trim_start_matches('.');
        self.files.extension = ext.to_string();
    }

    pub fn validate(&self) -> VaultResult<()> {
        if self.files.extension.is_empty() {
            return Err(VaultError::Config("files.extension must not be empty".into()));
        }
        if self.files.extension.contains(['/', '\\']) {
            return Err(VaultError::Config(format!(
                "files.extension must be a bare extension, got '{}'",
                self.files.extension
            )));
        }
        if self.files.preview_lines == 0 {
            return Err(VaultError::Config("files.preview_lines must be at least 1".into()));
        }
        Ok(())
    }
}

/// Default config location: `~/.config/cryptvault/config.toml`
pub fn default_config_path() -> PathBuf {
    expand_tilde(Path::new("~/.config/cryptvault/config.toml"))
}

/// Expand `~` in path to the user's home directory
pub fn expand_tilde(path: &Path) -> PathBuf {
    let s = path.to_string_lossy();
    match s.strip_prefix("~/") {
        Some(rest) => {
            let home = std::env::var("HOME").unwrap_or_default();
            PathBuf::from(home).join(rest)
        }
        None => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let toml_str = r#"
[log]
level = "debug"
format = "json"

[files]
extension = "vault"
decrypted_prefix = "plain_"
preview_lines = 20

[batch]
workers = 4
"#;
        let config = VaultConfig::from_toml(toml_str).unwrap();

        assert_eq!(config.log.level, "debug");
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.files.extension, "vault");
        assert_eq!(config.files.decrypted_prefix, "plain_");
        assert_eq!(config.files.preview_lines, 20);
        assert_eq!(config.batch.workers, 4);
    }

    #[test]
    fn test_parse_defaults() {
        let config = VaultConfig::from_toml("").unwrap();

        assert_eq!(config.log.level, "warn");
        assert_eq!(config.log.format, LogFormat::Text);
        assert_eq!(config.files.extension, "enc");
        assert_eq!(config.files.decrypted_prefix, "decrypted_");
        assert_eq!(config.files.preview_lines, 50);
        assert_eq!(config.batch.workers, 0);
    }

    #[test]
    fn test_parse_partial_config() {
        let toml_str = r#"
[files]
preview_lines = 10
"#;
        let config = VaultConfig::from_toml(toml_str).unwrap();

        // Overridden
        assert_eq!(config.files.preview_lines, 10);
        // Defaults
        assert_eq!(config.files.extension, "enc");
        assert_eq!(config.log.level, "warn");
    }

    #[test]
    fn test_extension_leading_dot_is_stripped() {
        let config = VaultConfig::from_toml("[files]\nextension = \".locked\"\n").unwrap();
        assert_eq!(config.files.extension, "locked");
    }

    #[test]
    fn test_rejects_empty_extension() {
        let err = VaultConfig::from_toml("[files]\nextension = \".\"\n").unwrap_err();
        assert!(matches!(err, VaultError::Config(_)));
    }

    #[test]
    fn test_rejects_zero_preview_lines() {
        let err = VaultConfig::from_toml("[files]\npreview_lines = 0\n").unwrap_err();
        assert!(matches!(err, VaultError::Config(_)));
    }

    #[test]
    fn test_rejects_unknown_log_format() {
        let err = VaultConfig::from_toml("[log]\nformat = \"xml\"\n").unwrap_err();
        assert!(matches!(err, VaultError::ConfigParse(_)));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = VaultConfig::load(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, VaultConfig::default());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[batch]\nworkers = 2\n").unwrap();
        assert_eq!(VaultConfig::load(&path).unwrap().batch.workers, 2);
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = VaultConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed = VaultConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }
}
