//! Error types for statement viewing
//!
//! Provides error handling for:
//! - Node resolution (type format, schema fetch, depth guard)
//! - Configuration loading
//! - Facade operations combining the above

use std::path::PathBuf;
use stmt_cache::CacheError;
use stmt_model::ModelError;
use stmt_services::FetchError;

/// Errors resolving one node
///
/// Contained at the node: a failed node renders as an inert leaf with an
/// error indicator and never stops its siblings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// `@type` missing or not prefixed with `doi:`
    #[error("invalid type format: {0}")]
    InvalidTypeFormat(String),

    /// Type-schema service failed or answered an unusable schema
    #[error("schema fetch for '{key}' failed: {source}")]
    SchemaFetch {
        key: String,
        #[source]
        source: FetchError,
    },

    /// Tree walk reached the recursion cap
    #[error("maximum depth {limit} exceeded at depth {depth}")]
    MaxDepthExceeded { depth: usize, limit: usize },

    /// Node references one of its own ancestors
    #[error("reference cycle through '{id}' at depth {depth}")]
    CycleDetected { id: String, depth: usize },
}

impl ResolveError {
    /// Create schema fetch error
    pub fn schema_fetch(key: impl Into<String>, source: FetchError) -> Self {
        Self::SchemaFetch {
            key: key.into(),
            source,
        }
    }

    /// Whether a new render may succeed where this attempt failed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::SchemaFetch {
                source: FetchError::Transport { .. } | FetchError::Status { .. },
                ..
            }
        )
    }
}

impl From<ModelError> for ResolveError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::InvalidTypeFormat(raw) => Self::InvalidTypeFormat(raw),
            other => Self::InvalidTypeFormat(other.to_string()),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading the file
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid TOML
    #[error("invalid configuration{}: {message}", path.as_ref().map(|p| format!(" in {}", p.display())).unwrap_or_default())]
    Parse {
        path: Option<PathBuf>,
        message: String,
    },

    /// Value out of range
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Combined viewer error
#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),

    #[error("cache error: {0}")]
    Cache(#[from] CacheError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for viewer operations
pub type ViewerResult<T> = Result<T, ViewerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_error_display() {
        let err = ResolveError::MaxDepthExceeded {
            depth: 64,
            limit: 64,
        };
        assert_eq!(err.to_string(), "maximum depth 64 exceeded at depth 64");
        let cycle = ResolveError::CycleDetected {
            id: "loop".into(),
            depth: 1,
        };
        assert_eq!(cycle.to_string(), "reference cycle through 'loop' at depth 1");
    }

    #[test]
    fn retryable_only_for_transport_and_status() {
        let status = ResolveError::schema_fetch(
            "P1",
            FetchError::Status {
                url: "u".into(),
                status: 503,
            },
        );
        let invalid = ResolveError::schema_fetch(
            "P1",
            FetchError::InvalidSchema {
                key: "P1".into(),
                reason: "missing schema".into(),
            },
        );
        assert!(status.is_retryable());
        assert!(!invalid.is_retryable());
        assert!(!ResolveError::InvalidTypeFormat("x".into()).is_retryable());
    }

    #[test]
    fn parse_error_mentions_path() {
        let err = ConfigError::Parse {
            path: Some(PathBuf::from("viewer.toml")),
            message: "bad".into(),
        };
        assert_eq!(err.to_string(), "invalid configuration in viewer.toml: bad");
    }

    #[test]
    fn error_conversions() {
        let model_err = ModelError::invalid_type_format("P1");
        let resolve_err: ResolveError = model_err.into();
        let viewer_err: ViewerError = resolve_err.into();
        assert!(matches!(viewer_err, ViewerError::Resolve(_)));
    }
}
