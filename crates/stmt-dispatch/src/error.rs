//! Error types for property dispatch

use stmt_model::ModelError;

/// Errors raised while dispatching records
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// Record lacks `type.properties` or `has_part`
    #[error("record {index} skipped: {source}")]
    MalformedRecord {
        index: usize,
        #[source]
        source: ModelError,
    },
}

impl DispatchError {
    /// Create malformed record error
    pub fn malformed(index: usize, source: ModelError) -> Self {
        Self::MalformedRecord { index, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_display() {
        let err = DispatchError::malformed(2, ModelError::malformed_record("missing has_part"));
        assert_eq!(
            err.to_string(),
            "record 2 skipped: malformed record: missing has_part"
        );
    }
}
