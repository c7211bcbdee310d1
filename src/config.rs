use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, anyhow};

use crate::agent::{DEFAULT_THINKING_MAX_MS, DEFAULT_THINKING_MIN_MS};

/// User-tunable settings, stored as JSON in the platform config dir.
///
/// Only the thinking-delay bounds live here; the conversation itself is
/// never persisted.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Config {
    pub thinking_delay_min_ms: u64,
    pub thinking_delay_max_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            thinking_delay_min_ms: DEFAULT_THINKING_MIN_MS,
            thinking_delay_max_ms: DEFAULT_THINKING_MAX_MS,
        }
    }
}

impl Config {
    /// Load the config, writing a default file on first run so the user
    /// has something to edit.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let config = Self::load_from(&path);
        if !path.exists() {
            config.save_to(&path)?;
        }
        Ok(config)
    }

    fn load_from(path: &Path) -> Self {
        let config = fs::read_to_string(path)
            .ok()
            .and_then(|content| serde_json::from_str::<Config>(&content).ok())
            .unwrap_or_default();
        config.validated()
    }

    /// Replace an out-of-order delay range with the defaults. The range
    /// is half-open, so min == max is invalid too.
    fn validated(self) -> Self {
        if self.thinking_delay_min_ms < self.thinking_delay_max_ms {
            self
        } else {
            tracing::warn!(
                min = self.thinking_delay_min_ms,
                max = self.thinking_delay_max_ms,
                "invalid thinking delay range in config, using defaults"
            );
            Self::default()
        }
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow!("Could not determine config directory"))?;
        Ok(config_dir.join("coach").join("config.json"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.thinking_delay_min_ms, 1000);
        assert_eq!(config.thinking_delay_max_ms, 2000);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json"));
        assert_eq!(config.thinking_delay_min_ms, 1000);
        assert_eq!(config.thinking_delay_max_ms, 2000);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("coach").join("config.json");

        let config = Config {
            thinking_delay_min_ms: 200,
            thinking_delay_max_ms: 600,
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path);
        assert_eq!(loaded.thinking_delay_min_ms, 200);
        assert_eq!(loaded.thinking_delay_max_ms, 600);
    }

    #[test]
    fn test_invalid_range_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let config = Config {
            thinking_delay_min_ms: 900,
            thinking_delay_max_ms: 300,
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path);
        assert_eq!(loaded.thinking_delay_min_ms, 1000);
        assert_eq!(loaded.thinking_delay_max_ms, 2000);
    }

    #[test]
    fn test_corrupt_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json at all").unwrap();

        let loaded = Config::load_from(&path);
        assert_eq!(loaded.thinking_delay_min_ms, 1000);
    }
}
