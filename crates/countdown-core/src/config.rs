//! Configuration (TOML).
//!
//! ```toml
//! tick_ms = 1000
//!
//! [store]
//! backend = "file"
//! path = "countdowns.json"
//! max_bytes = 5242880
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Display refresh period when not configured.
pub const DEFAULT_TICK_MS: u64 = 1_000;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Which `CountdownStore` implementation to wire at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    #[default]
    Memory,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: StoreBackend,
    /// JSON document path (file backend).
    pub path: Option<PathBuf>,
    /// Record limit (memory backend).
    pub max_records: Option<usize>,
    /// Document size limit in bytes (file backend).
    pub max_bytes: Option<u64>,
}

impl StoreConfig {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            backend: StoreBackend::File,
            path: Some(path.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountdownConfig {
    pub tick_ms: u64,
    pub store: StoreConfig,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            tick_ms: DEFAULT_TICK_MS,
            store: StoreConfig::default(),
        }
    }
}

impl CountdownConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw)?;
        tracing::debug!(path = %path.display(), ?config, "config loaded");
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::Invalid("tick_ms must be positive".to_string()));
        }
        if self.store.backend == StoreBackend::File && self.store.path.is_none() {
            return Err(ConfigError::Invalid(
                "file store requires store.path".to_string(),
            ));
        }
        Ok(())
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_is_memory_backed_with_one_second_tick() {
        let config = CountdownConfig::from_toml_str("").unwrap();
        assert_eq!(config, CountdownConfig::default());
        assert_eq!(config.store.backend, StoreBackend::Memory);
        assert_eq!(config.tick(), Duration::from_secs(1));
    }

    #[test]
    fn parses_file_backend() {
        let config = CountdownConfig::from_toml_str(
            r#"
            tick_ms = 250

            [store]
            backend = "file"
            path = "/var/lib/countdown/countdowns.json"
            max_bytes = 1024
            "#,
        )
        .unwrap();

        assert_eq!(config.tick(), Duration::from_millis(250));
        assert_eq!(config.store.backend, StoreBackend::File);
        assert_eq!(config.store.max_bytes, Some(1024));
        assert_eq!(
            config.store.path.as_deref(),
            Some(Path::new("/var/lib/countdown/countdowns.json"))
        );
    }

    #[test]
    fn file_backend_without_path_is_invalid() {
        let err = CountdownConfig::from_toml_str("[store]\nbackend = \"file\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn zero_tick_is_invalid() {
        let err = CountdownConfig::from_toml_str("tick_ms = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn unknown_backend_is_a_parse_error() {
        let err = CountdownConfig::from_toml_str("[store]\nbackend = \"redis\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = CountdownConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.toml"));
    }
}
