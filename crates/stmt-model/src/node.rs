//! JSON-LD statement nodes
//!
//! Provides [`StatementNode`], a read-only view over one node of a
//! statement's semantic graph.

use crate::error::ModelError;
use crate::type_key::TypeKey;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JSON-LD node of a statement graph
///
/// Properties are namespaced as `<@type>#<propertyName>`; accessors strip the
/// namespace so callers see plain property names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatementNode(Map<String, Value>);

impl StatementNode {
    /// Wrap a JSON object
    #[inline]
    #[must_use]
    pub fn new(map: Map<String, Value>) -> Self {
        Self(map)
    }

    /// Wrap a JSON value
    ///
    /// # Errors
    /// - `ModelError::NotAnObject` if the value is not an object
    pub fn from_value(value: Value) -> Result<Self, ModelError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            _ => Err(ModelError::not_an_object("statement node")),
        }
    }

    /// Borrow a JSON value as node when it is an object carrying `@type`
    #[must_use]
    pub fn typed(value: &Value) -> Option<Self> {
        value
            .as_object()
            .filter(|map| map.contains_key("@type"))
            .map(|map| Self(map.clone()))
    }

    /// Raw `@type` value
    #[inline]
    #[must_use]
    pub fn type_iri(&self) -> Option<&str> {
        self.0.get("@type").and_then(Value::as_str)
    }

    /// Normalized type key
    ///
    /// # Errors
    /// - `ModelError::InvalidTypeFormat` if `@type` is missing or malformed
    pub fn type_key(&self) -> Result<TypeKey, ModelError> {
        let raw = self
            .type_iri()
            .ok_or_else(|| ModelError::invalid_type_format("<missing @type>"))?;
        TypeKey::parse(raw)
    }

    /// Node identifier (`@id`)
    #[inline]
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.0.get("@id").and_then(Value::as_str)
    }

    /// Whether this node is a bare `{"@id": ..}` reference to another node
    #[must_use]
    pub fn is_reference(&self) -> bool {
        self.0.len() == 1 && self.id().is_some()
    }

    /// Properties with namespaces stripped, in document order
    ///
    /// JSON-LD keywords (`@type`, `@id`, `@graph`, ...) are skipped.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.0
            .iter()
            .filter(|(key, _)| !key.starts_with('@'))
            .map(|(key, value)| (local_name(key), value))
    }

    /// Value of a property by its plain name
    #[must_use]
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    /// Underlying JSON object
    #[inline]
    #[must_use]
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Convert back into a JSON value
    #[inline]
    #[must_use]
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Strip the `<namespace>#` part of a property key
fn local_name(key: &str) -> &str {
    key.rsplit_once('#').map_or(key, |(_, local)| local)
}
