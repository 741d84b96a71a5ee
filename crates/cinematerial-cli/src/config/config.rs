//! `AppConfig` struct and TOML read/write.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable overriding the configured API key.
pub const API_KEY_ENV: &str = "CINEMATERIAL_API_KEY";

/// Environment variable overriding the configured API secret.
pub const API_SECRET_ENV: &str = "CINEMATERIAL_API_SECRET";

/// Top-level application configuration.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    /// Cinematerial API credentials.
    #[serde(default)]
    pub credentials: CredentialsConfig,
    /// Search defaults.
    #[serde(default)]
    pub search: SearchConfig,
}

/// Cinematerial API credentials.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct CredentialsConfig {
    /// API key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// API secret.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_secret: Option<String>,
}

impl CredentialsConfig {
    /// Returns `true` if neither credential is stored.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.api_key.is_none() && self.api_secret.is_none()
    }
}

/// Search defaults.
#[derive(Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct SearchConfig {
    /// Poster width used when `--width` is omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_width: Option<i32>,
}

impl AppConfig {
    /// Loads config from a TOML file. Returns default if file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    }

    /// Saves config to a TOML file, creating parent directories if needed.
    ///
    /// On unix a file holding credentials is restricted to mode `0600`
    /// before anything is written to it.
    ///
    /// # Errors
    ///
    /// Returns an error if directory creation or file write fails.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory {}", parent.display()))?;
        }
        let content = toml::to_string_pretty(self).context("failed to serialize config to TOML")?;
        if self.credentials.is_empty() {
            return std::fs::write(path, content)
                .with_context(|| format!("failed to write {}", path.display()));
        }
        write_private(path, content.as_bytes())
            .with_context(|| format!("failed to write {}", path.display()))
    }

    /// Resolves the credentials, letting non-empty environment values win
    /// over the file.
    ///
    /// `lookup` reads an environment variable (`std::env::var(..).ok()` in production).
    pub fn credentials_with_env(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> (Option<String>, Option<String>) {
        let pick = |name: &str, configured: Option<&String>| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .or_else(|| configured.cloned())
        };
        (
            pick(API_KEY_ENV, self.credentials.api_key.as_ref()),
            pick(API_SECRET_ENV, self.credentials.api_secret.as_ref()),
        )
    }
}

/// Writes `content` to a file readable by its owner only.
#[cfg(unix)]
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    use std::io::Write as _;
    use std::os::unix::fs::{OpenOptionsExt as _, PermissionsExt as _};

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies on creation; tighten an existing file too.
    file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    file.write_all(content)
}

/// Writes `content` to `path`.
#[cfg(not(unix))]
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, content)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn full_config() -> AppConfig {
        AppConfig {
            credentials: CredentialsConfig {
                api_key: Some(String::from("file-key")),
                api_secret: Some(String::from("file-secret")),
            },
            search: SearchConfig {
                default_width: Some(100),
            },
        }
    }

    #[test]
    fn test_default_config() {
        // Arrange & Act
        let config = AppConfig::default();

        // Assert
        assert!(config.credentials.api_key.is_none());
        assert!(config.credentials.api_secret.is_none());
        assert!(config.search.default_width.is_none());
    }

    #[test]
    fn test_serialize_deserialize_roundtrip() {
        // Arrange
        let config = full_config();

        // Act
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();

        // Assert
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = full_config();

        // Act
        config.save(&path).unwrap();
        let loaded = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(loaded, config);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_with_credentials_is_owner_only() {
        use std::os::unix::fs::PermissionsExt as _;

        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        // Act
        full_config().save(&path).unwrap();

        // Assert
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(AppConfig::load(&path).unwrap(), full_config());
    }

    #[test]
    fn test_credentials_is_empty() {
        // Arrange & Act & Assert
        assert!(CredentialsConfig::default().is_empty());
        assert!(!full_config().credentials.is_empty());
    }

    #[test]
    fn test_load_partial_config() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[search]\ndefault_width = 150\n").unwrap();

        // Act
        let config = AppConfig::load(&path).unwrap();

        // Assert
        assert_eq!(config.search.default_width, Some(150));
        assert_eq!(config.credentials, CredentialsConfig::default());
    }

    #[test]
    fn test_load_invalid_toml_fails() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[credentials\napi_key = ").unwrap();

        // Act
        let result = AppConfig::load(&path);

        // Assert
        assert!(result.unwrap_err().to_string().contains("failed to parse"));
    }

    #[test]
    fn test_credentials_from_file() {
        // Arrange
        let config = full_config();

        // Act
        let (key, secret) = config.credentials_with_env(|_| None);

        // Assert
        assert_eq!(key.as_deref(), Some("file-key"));
        assert_eq!(secret.as_deref(), Some("file-secret"));
    }

    #[test]
    fn test_credentials_env_overrides_file() {
        // Arrange
        let config = full_config();

        // Act
        let (key, secret) = config.credentials_with_env(|name| match name {
            API_KEY_ENV => Some(String::from("env-key")),
            API_SECRET_ENV => Some(String::new()),
            _ => None,
        });

        // Assert
        assert_eq!(key.as_deref(), Some("env-key"));
        assert_eq!(secret.as_deref(), Some("file-secret"));
    }

    #[test]
    fn test_credentials_missing_everywhere() {
        // Arrange
        let config = AppConfig::default();

        // Act
        let (key, secret) = config.credentials_with_env(|_| None);

        // Assert
        assert!(key.is_none());
        assert!(secret.is_none());
    }
}
