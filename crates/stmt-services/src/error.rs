//! Error types for external service calls

use stmt_model::ModelError;

/// Failure talking to an external service
///
/// Carries rendered messages rather than transport errors so it can be
/// cloned into per-node UI state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// Connection, TLS or timeout failure
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    /// Non-2xx response
    #[error("{url} answered with status {status}")]
    Status { url: String, status: u16 },

    /// Body was not the expected JSON
    #[error("undecodable response from {url}: {message}")]
    Decode { url: String, message: String },

    /// Type-schema payload without `schema.Properties`
    #[error("invalid schema for '{key}': {reason}")]
    InvalidSchema { key: String, reason: String },
}

impl FetchError {
    /// Create transport error
    pub fn transport(url: impl Into<String>, source: impl std::fmt::Display) -> Self {
        Self::Transport {
            url: url.into(),
            message: source.to_string(),
        }
    }

    /// Create decode error
    pub fn decode(url: impl Into<String>, source: impl std::fmt::Display) -> Self {
        Self::Decode {
            url: url.into(),
            message: source.to_string(),
        }
    }

    /// Whether the service answered but with an unusable schema
    #[inline]
    #[must_use]
    pub fn is_invalid_schema(&self) -> bool {
        matches!(self, Self::InvalidSchema { .. })
    }
}

impl From<ModelError> for FetchError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::InvalidSchema { key, reason } => Self::InvalidSchema { key, reason },
            other => Self::Decode {
                url: String::new(),
                message: other.to_string(),
            },
        }
    }
}
