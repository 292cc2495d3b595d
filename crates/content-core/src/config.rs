// content-core/src/config.rs
//! Configuration module.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level configuration for the indexing core.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub scanner: ScannerConfig,
    pub watcher: WatcherConfig,
    pub search: SearchConfig,
}

/// Content tree scanner configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// File extensions (without the dot) that qualify as content sources.
    /// Matched case-insensitively.
    pub content_extensions: Vec<String>,
}

/// Folder watcher configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WatcherConfig {
    pub poll_interval_secs: u64,
    pub recursive: bool,
    pub skip_hidden: bool,
}

/// Full-text index configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Backing-store location. Must be private to one index instance.
    pub storage_path: String,
    pub writer_memory: usize,
    pub max_results: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scanner: ScannerConfig::default(),
            watcher: WatcherConfig::default(),
            search: SearchConfig::default(),
        }
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            content_extensions: vec!["md".to_string()],
        }
    }
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 2,
            recursive: true,
            skip_hidden: true,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            storage_path: "./storage".to_string(),
            writer_memory: 50_000_000,
            max_results: 20,
        }
    }
}

impl WatcherConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Try to load configuration, falling back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        Self::load_from_file(path).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.scanner.content_extensions, vec!["md"]);
        assert_eq!(config.watcher.poll_interval(), Duration::from_secs(2));
        assert!(config.watcher.recursive);
        assert_eq!(config.search.max_results, 20);
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config: Config = toml::from_str(
            r#"
            [watcher]
            poll_interval_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.watcher.poll_interval_secs, 5);
        assert!(config.watcher.skip_hidden);
        assert_eq!(config.scanner.content_extensions, vec!["md"]);
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let config = Config::load_or_default("/nonexistent/config.toml");
        assert_eq!(config.search.storage_path, "./storage");
    }
}
