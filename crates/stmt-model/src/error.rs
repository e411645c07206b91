//! Error types for the statement model

/// Errors raised while interpreting statement documents
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// `@type` missing or not of the form `doi:<suffix>`
    #[error("invalid type format: '{0}'")]
    InvalidTypeFormat(String),

    /// Expected a JSON object
    #[error("expected a JSON object for {what}")]
    NotAnObject { what: String },

    /// Data type record lacks a required field
    #[error("malformed record: {reason}")]
    MalformedRecord { reason: String },

    /// Type-schema payload lacks `schema.Properties`
    #[error("invalid schema for '{key}': {reason}")]
    InvalidSchema { key: String, reason: String },
}

impl ModelError {
    /// Create invalid type format error
    pub fn invalid_type_format(raw: impl Into<String>) -> Self {
        Self::InvalidTypeFormat(raw.into())
    }

    /// Create not-an-object error
    pub fn not_an_object(what: impl Into<String>) -> Self {
        Self::NotAnObject { what: what.into() }
    }

    /// Create malformed record error
    pub fn malformed_record(reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            reason: reason.into(),
        }
    }

    /// Create invalid schema error
    pub fn invalid_schema(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSchema {
            key: key.into(),
            reason: reason.into(),
        }
    }
}
