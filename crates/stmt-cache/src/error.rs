//! Error types for the schema cache
//!
//! Provides error handling for:
//! - Store operations (reading/writing the persisted map)
//! - Cache operations (serializing the map, propagating store failures)

use std::path::PathBuf;

/// Errors raised by a [`SchemaStore`](crate::SchemaStore)
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// IO error on the backing file
    #[error("io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Store rejected the write
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Errors during cache operations
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Backing store failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Persisted map could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_display() {
        let err = StoreError::Unavailable("quota exceeded".to_string());
        assert_eq!(err.to_string(), "store unavailable: quota exceeded");
    }

    #[test]
    fn error_conversions() {
        let store_err = StoreError::Unavailable("x".to_string());
        let cache_err: CacheError = store_err.into();
        assert!(matches!(cache_err, CacheError::Store(_)));
    }
}
