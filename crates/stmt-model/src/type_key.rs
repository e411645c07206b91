//! Ontology type keys
//!
//! Provides [`TypeKey`], the normalized form of a node's `@type`.

use crate::error::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Prefix every ontology `@type` must carry
pub const TYPE_PREFIX: &str = "doi:";

/// Optional handle-registry segment following the prefix
pub const REGISTRY_SEGMENT: &str = "21.T11969/";

/// Normalized ontology identifier
///
/// Both `doi:21.T11969/P1004` and `doi:P1004` normalize to `P1004`, so the
/// two spellings share one cache entry and one schema lookup.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeKey(String);

impl TypeKey {
    /// Normalize a raw `@type` value
    ///
    /// # Errors
    /// - `ModelError::InvalidTypeFormat` if the prefix is missing or nothing
    ///   remains after stripping
    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        let rest = raw
            .strip_prefix(TYPE_PREFIX)
            .ok_or_else(|| ModelError::invalid_type_format(raw))?;
        let rest = rest.strip_prefix(REGISTRY_SEGMENT).unwrap_or(rest);

        if rest.is_empty() {
            return Err(ModelError::invalid_type_format(raw));
        }

        Ok(Self(rest.to_string()))
    }

    /// Build a key from an already-normalized string
    #[inline]
    #[must_use]
    pub fn from_normalized(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Key as string slice
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for TypeKey {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for TypeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for TypeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
