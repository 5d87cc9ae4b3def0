use crate::errors::{EightBallError, EightBallResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";
pub const DEFAULT_MAX_CONCURRENCY: usize = 64;
pub const DEFAULT_QUESTION_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Configuration for the eight ball service
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct EightBallConfig {
    pub listen_addr: Option<SocketAddr>,
    /// Upper bound on questions answered at once within one batch; 0 means unbounded
    pub max_concurrency: Option<usize>,
    /// Per-question timeout in milliseconds; 0 disables it
    pub question_timeout_ms: Option<u64>,
    pub log_level: Option<String>,
}

impl Default for EightBallConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.parse().ok(),
            max_concurrency: Some(DEFAULT_MAX_CONCURRENCY),
            question_timeout_ms: Some(DEFAULT_QUESTION_TIMEOUT_MS),
            log_level: Some(DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}

impl EightBallConfig {
    /// A config with every field unset, used as the base for overrides
    pub fn empty() -> Self {
        Self {
            listen_addr: None,
            max_concurrency: None,
            question_timeout_ms: None,
            log_level: None,
        }
    }

    /// Loads configuration from a file if it exists, otherwise returns the default config
    pub fn load_from_file(path: &Path) -> EightBallResult<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: Self = toml::from_str(&content)?;

            // Fields missing from the file fall back to defaults
            Ok(Self::default().merge(&config))
        } else {
            Ok(Self::default())
        }
    }

    /// Saves configuration to a file
    pub fn save_to_file(&self, path: &Path) -> EightBallResult<()> {
        let content = toml::to_string(self).map_err(|e| {
            EightBallError::ConfigError(format!("Failed to serialize config: {}", e))
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, content)?;

        Ok(())
    }

    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            listen_addr: other.listen_addr.or(self.listen_addr),
            max_concurrency: other.max_concurrency.or(self.max_concurrency),
            question_timeout_ms: other.question_timeout_ms.or(self.question_timeout_ms),
            log_level: other.log_level.clone().or_else(|| self.log_level.clone()),
        }
    }

    pub fn resolved_listen_addr(&self) -> SocketAddr {
        self.listen_addr
            .unwrap_or_else(|| SocketAddr::from(([127, 0, 0, 1], 8080)))
    }

    pub fn resolved_max_concurrency(&self) -> Option<usize> {
        match self.max_concurrency {
            Some(0) => None,
            Some(limit) => Some(limit),
            None => Some(DEFAULT_MAX_CONCURRENCY),
        }
    }

    pub fn resolved_question_timeout(&self) -> Option<Duration> {
        match self.question_timeout_ms {
            Some(0) => None,
            Some(ms) => Some(Duration::from_millis(ms)),
            None => Some(Duration::from_millis(DEFAULT_QUESTION_TIMEOUT_MS)),
        }
    }

    pub fn resolved_log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

/// Helper function to get default config directory
pub fn get_default_config_dir(app_name: &str) -> EightBallResult<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        EightBallError::ConfigError("Could not determine home directory".to_string())
    })?;

    Ok(home_dir.join(".config").join(app_name))
}

/// Helper function to get default config file path
pub fn get_default_config_file(app_name: &str) -> EightBallResult<PathBuf> {
    let config_dir = get_default_config_dir(app_name)?;
    Ok(config_dir.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_missing_file_returns_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        let config = EightBallConfig::load_from_file(&path).unwrap();
        assert_eq!(config, EightBallConfig::default());
    }

    #[test]
    fn test_load_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "listen_addr = \"0.0.0.0:9090\"\nmax_concurrency = 4\n").unwrap();

        let config = EightBallConfig::load_from_file(&path).unwrap();
        assert_eq!(config.resolved_listen_addr(), "0.0.0.0:9090".parse().unwrap());
        assert_eq!(config.max_concurrency, Some(4));
        assert_eq!(config.question_timeout_ms, Some(DEFAULT_QUESTION_TIMEOUT_MS));
        assert_eq!(config.resolved_log_level(), "info");
    }

    #[test]
    fn test_load_invalid_file_is_toml_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "max_concurrency = \"lots\"").unwrap();

        let result = EightBallConfig::load_from_file(&path);
        assert!(matches!(result, Err(EightBallError::TomlError(_))));
    }

    #[test]
    fn test_unreadable_path_is_io_error() {
        let dir = tempdir().unwrap();

        // A directory exists but cannot be read as a file
        let result = EightBallConfig::load_from_file(dir.path());
        assert!(matches!(result, Err(EightBallError::IoError(_))));
    }

    #[test]
    fn test_save_under_a_file_is_io_error() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        let result = EightBallConfig::default().save_to_file(&blocker.join("config.toml"));
        assert!(matches!(result, Err(EightBallError::IoError(_))));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = EightBallConfig {
            question_timeout_ms: Some(100),
            log_level: Some("debug".to_string()),
            ..EightBallConfig::default()
        };

        config.save_to_file(&path).unwrap();
        let reloaded = EightBallConfig::load_from_file(&path).unwrap();
        assert_eq!(reloaded, config);
    }

    #[test]
    fn test_merge_prefers_other() {
        let base = EightBallConfig::default();
        let overrides = EightBallConfig {
            max_concurrency: Some(2),
            ..EightBallConfig::empty()
        };

        let merged = base.merge(&overrides);
        assert_eq!(merged.max_concurrency, Some(2));
        assert_eq!(merged.listen_addr, base.listen_addr);
        assert_eq!(merged.log_level, base.log_level);
    }

    #[test]
    fn test_zero_disables_limits() {
        let config = EightBallConfig {
            max_concurrency: Some(0),
            question_timeout_ms: Some(0),
            ..EightBallConfig::default()
        };

        assert_eq!(config.resolved_max_concurrency(), None);
        assert_eq!(config.resolved_question_timeout(), None);
    }

    #[test]
    fn test_default_config_file_name() {
        if let Ok(path) = get_default_config_file("eightball") {
            assert!(path.ends_with(".config/eightball/config.toml"));
        }
    }
}
