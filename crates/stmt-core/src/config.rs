//! Viewer configuration
//!
//! Loaded from TOML; every field has a default so a partial file (or no
//! file at all) is valid.
//!
//! ```toml
//! api_base_url = "https://library.example.org"
//! schema_service_url = "https://library.example.org"
//! cache_dir = "/var/cache/stmt"
//! debounce_ms = 300
//! max_depth = 64
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use stmt_services::HttpSettings;

/// Default base URL of the articles API and the type-schema service
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Viewer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Base URL of the articles API
    pub api_base_url: String,
    /// Base URL of the type-schema service
    pub schema_service_url: String,
    /// Directory of the persisted schema cache; in-memory when unset
    pub cache_dir: Option<PathBuf>,
    /// Maximum schemas kept in memory
    pub cache_capacity: u64,
    /// Quiet window for coalescing resolution requests
    pub debounce_ms: u64,
    /// Recursion cap of the tree walk
    pub max_depth: usize,
    /// Connection timeout
    pub connect_timeout_ms: u64,
    /// Per-request timeout
    pub request_timeout_ms: u64,
}

impl ViewerConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// - `ConfigError::Io` if the file cannot be read
    /// - `ConfigError::Parse` if the TOML is invalid
    /// - `ConfigError::Invalid` if a value is out of range
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::io_error(path, e))?;
        let config: Self = toml::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: Some(path.to_path_buf()),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// - `ConfigError::Parse` if the TOML is invalid
    /// - `ConfigError::Invalid` if a value is out of range
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|e| ConfigError::Parse {
            path: None,
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    ///
    /// # Errors
    /// - `ConfigError::Invalid` naming the offending field
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be at least 1".into()));
        }
        if self.cache_capacity == 0 {
            return Err(ConfigError::Invalid(
                "cache_capacity must be at least 1".into(),
            ));
        }
        if self.api_base_url.is_empty() || self.schema_service_url.is_empty() {
            return Err(ConfigError::Invalid("service URLs must not be empty".into()));
        }
        Ok(())
    }

    /// With articles API URL
    #[inline]
    #[must_use]
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    /// With type-schema service URL
    #[inline]
    #[must_use]
    pub fn with_schema_service_url(mut self, url: impl Into<String>) -> Self {
        self.schema_service_url = url.into();
        self
    }

    /// With persisted cache directory
    #[inline]
    #[must_use]
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// With debounce window in milliseconds
    #[inline]
    #[must_use]
    pub fn with_debounce_ms(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// With maximum tree depth
    #[inline]
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Debounce window
    #[inline]
    #[must_use]
    pub fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// HTTP timeouts
    #[must_use]
    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_BASE_URL.to_string(),
            schema_service_url: DEFAULT_BASE_URL.to_string(),
            cache_dir: None,
            cache_capacity: 10_000,
            debounce_ms: 300,
            max_depth: 64,
            connect_timeout_ms: 5_000,
            request_timeout_ms: 30_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ViewerConfig::new();
        assert_eq!(config.debounce_window(), Duration::from_millis(300));
        assert_eq!(config.max_depth, 64);
        assert!(config.cache_dir.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = ViewerConfig::from_toml_str(
            r#"
            api_base_url = "https://library.example.org"
            debounce_ms = 150
            "#,
        )
        .unwrap();
        assert_eq!(config.api_base_url, "https://library.example.org");
        assert_eq!(config.debounce_ms, 150);
        assert_eq!(config.schema_service_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn rejects_zero_depth() {
        let err = ViewerConfig::from_toml_str("max_depth = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_bad_toml() {
        let err = ViewerConfig::from_toml_str("max_depth = \"deep\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { path: None, .. }));
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.toml");
        std::fs::write(&path, "cache_dir = \"/tmp/stmt\"\nmax_depth = 8\n").unwrap();

        let config = ViewerConfig::load(&path).unwrap();
        assert_eq!(config.cache_dir, Some(PathBuf::from("/tmp/stmt")));
        assert_eq!(config.max_depth, 8);
    }

    #[test]
    fn builder_overrides() {
        let config = ViewerConfig::new()
            .with_api_base_url("http://a")
            .with_max_depth(3)
            .with_cache_dir("/c");
        assert_eq!(config.api_base_url, "http://a");
        assert_eq!(config.max_depth, 3);
        assert_eq!(config.cache_dir, Some(PathBuf::from("/c")));
    }
}
