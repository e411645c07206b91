//! Resolved type descriptors
//!
//! Provides [`TypeInfo`], the schema descriptor returned by the type-schema
//! service and stored in the schema cache.

use crate::error::ModelError;
use crate::type_key::TypeKey;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One property declared by a type schema
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SchemaProperty {
    /// Declared property name
    #[serde(rename = "Name")]
    pub name: String,
}

/// Property declarations of a type schema
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeSchema {
    /// Declared properties, in declaration order
    #[serde(rename = "Properties", default)]
    pub properties: Vec<SchemaProperty>,
}

/// Resolved semantic type
///
/// `properties` is derived from `schema.Properties` and keeps declaration
/// order; nothing downstream may reorder it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeInfo {
    /// Human-readable type name
    #[serde(default)]
    pub name: String,
    /// Raw schema declarations
    #[serde(default)]
    pub schema: TypeSchema,
    /// Flattened property names
    pub properties: Vec<String>,
}

impl TypeInfo {
    /// Build from a schema, deriving the flattened property list
    #[must_use]
    pub fn from_schema(name: impl Into<String>, schema: TypeSchema) -> Self {
        let properties = schema.properties.iter().map(|p| p.name.clone()).collect();
        Self {
            name: name.into(),
            schema,
            properties,
        }
    }

    /// Build from a list of property names
    #[must_use]
    pub fn from_names<I, S>(name: impl Into<String>, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let schema = TypeSchema {
            properties: names
                .into_iter()
                .map(|n| SchemaProperty { name: n.into() })
                .collect(),
        };
        Self::from_schema(name, schema)
    }

    /// Parse the type-schema service payload
    ///
    /// Accepts `schema`/`Schema` and `name`/`Name` spellings; falls back to
    /// the key when the payload carries no name.
    ///
    /// # Errors
    /// - `ModelError::InvalidSchema` if `schema.Properties` is absent or not a
    ///   list of `{Name}` objects
    pub fn from_service_payload(key: &TypeKey, payload: &Value) -> Result<Self, ModelError> {
        let schema_value = payload
            .get("schema")
            .or_else(|| payload.get("Schema"))
            .ok_or_else(|| ModelError::invalid_schema(key.as_str(), "missing schema"))?;

        if !schema_value
            .get("Properties")
            .is_some_and(Value::is_array)
        {
            return Err(ModelError::invalid_schema(
                key.as_str(),
                "missing schema.Properties",
            ));
        }

        let schema: TypeSchema = serde_json::from_value(schema_value.clone())
            .map_err(|e| ModelError::invalid_schema(key.as_str(), e.to_string()))?;

        let name = payload
            .get("name")
            .or_else(|| payload.get("Name"))
            .and_then(Value::as_str)
            .unwrap_or(key.as_str());

        Ok(Self::from_schema(name, schema))
    }

    /// Whether the type declares a property
    #[inline]
    #[must_use]
    pub fn declares(&self, property: &str) -> bool {
        self.properties.iter().any(|p| p == property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn key() -> TypeKey {
        TypeKey::from_normalized("P1004")
    }

    #[test]
    fn properties_follow_declaration_order() {
        let info = TypeInfo::from_names("t", ["level", "label", "evaluates"]);
        assert_eq!(info.properties, vec!["level", "label", "evaluates"]);
        assert_eq!(info.schema.properties[1].name, "label");
    }

    #[test]
    fn parses_service_payload() {
        let payload = json!({
            "name": "data analysis",
            "schema": { "Properties": [{ "Name": "label" }, { "Name": "has_input" }] }
        });
        let info = TypeInfo::from_service_payload(&key(), &payload).unwrap();
        assert_eq!(info.name, "data analysis");
        assert_eq!(info.properties, vec!["label", "has_input"]);
    }

    #[test]
    fn accepts_capitalized_schema() {
        let payload = json!({ "Schema": { "Properties": [{ "Name": "label" }] } });
        let info = TypeInfo::from_service_payload(&key(), &payload).unwrap();
        assert_eq!(info.name, "P1004");
        assert!(info.declares("label"));
    }

    #[test]
    fn missing_properties_is_invalid() {
        let payload = json!({ "name": "x", "schema": {} });
        let err = TypeInfo::from_service_payload(&key(), &payload).unwrap_err();
        assert!(matches!(err, ModelError::InvalidSchema { .. }));
    }

    #[test]
    fn serialized_shape() {
        let info = TypeInfo::from_names("t", ["label"]);
        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "t",
                "schema": { "Properties": [{ "Name": "label" }] },
                "properties": ["label"]
            })
        );
    }
}
