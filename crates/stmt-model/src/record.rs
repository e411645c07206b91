//! Data type records
//!
//! A [`DataTypeRecord`] is one analysis step of a statement (an input, a
//! computation, an output) paired with its resolved [`TypeInfo`].

use crate::error::ModelError;
use crate::node::StatementNode;
use crate::type_info::TypeInfo;
use crate::value::{as_list, label_of, one_or_many};
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// One resolved analysis step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTypeRecord {
    /// Resolved type of the step
    #[serde(rename = "type")]
    pub type_info: TypeInfo,
    /// Property values keyed by property name
    pub has_part: IndexMap<String, Value>,
    /// Implementations (source files, notebooks, links)
    #[serde(default, deserialize_with = "one_or_many")]
    pub is_implemented_by: Vec<Value>,
    /// Cross-reference entries used to decorate labels
    #[serde(default, deserialize_with = "lenient_components")]
    pub components: Vec<Component>,
}

impl DataTypeRecord {
    /// Interpret a record as served inside a statement's `data_type` list
    ///
    /// # Errors
    /// - `ModelError::MalformedRecord` if `type.properties` or `has_part` is
    ///   missing, or the record does not deserialize
    pub fn from_value(value: &Value) -> Result<Self, ModelError> {
        let map = value
            .as_object()
            .ok_or_else(|| ModelError::malformed_record("record is not an object"))?;

        if !map
            .get("type")
            .and_then(|t| t.get("properties"))
            .is_some_and(Value::is_array)
        {
            return Err(ModelError::malformed_record("missing type.properties"));
        }

        if !map.get("has_part").is_some_and(Value::is_object) {
            return Err(ModelError::malformed_record("missing has_part"));
        }

        serde_json::from_value(value.clone())
            .map_err(|e| ModelError::malformed_record(e.to_string()))
    }

    /// Build a record from a resolved JSON-LD node
    ///
    /// `is_implemented_by` and `components` become record-level fields; every
    /// other property lands in `has_part`.
    #[must_use]
    pub fn from_node(node: &StatementNode, type_info: TypeInfo) -> Self {
        let mut has_part = IndexMap::new();
        let mut is_implemented_by = Vec::new();
        let mut components = Vec::new();

        for (name, value) in node.properties() {
            match name {
                "is_implemented_by" => {
                    is_implemented_by.extend(as_list(value).into_iter().cloned());
                }
                "components" => {
                    components.extend(
                        as_list(value)
                            .into_iter()
                            .filter_map(|c| serde_json::from_value(c.clone()).ok()),
                    );
                }
                _ => {
                    has_part.insert(name.to_string(), value.clone());
                }
            }
        }

        Self {
            type_info,
            has_part,
            is_implemented_by,
            components,
        }
    }

    /// Label of the step, if any
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.has_part.get("label").and_then(label_of)
    }

    /// Component whose `string_match` equals the label (case-insensitive)
    #[must_use]
    pub fn component_for(&self, label: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.matches(label))
    }
}

/// Label with an optional link
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "LabeledRefRepr")]
pub struct LabeledRef {
    /// Display label
    pub label: String,
    /// Optional URL
    pub url: Option<String>,
}

impl LabeledRef {
    /// Create a labeled reference
    #[must_use]
    pub fn new(label: impl Into<String>, url: Option<String>) -> Self {
        Self {
            label: label.into(),
            url,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LabeledRefRepr {
    Text(String),
    Object {
        #[serde(default)]
        label: Option<String>,
        #[serde(default, alias = "source_url")]
        url: Option<String>,
    },
}

impl From<LabeledRefRepr> for LabeledRef {
    fn from(repr: LabeledRefRepr) -> Self {
        match repr {
            LabeledRefRepr::Text(label) => Self { label, url: None },
            LabeledRefRepr::Object { label, url } => Self {
                label: label.unwrap_or_default(),
                url: url.filter(|u| !u.is_empty()),
            },
        }
    }
}

/// Cross-reference entry matched against labels
///
/// When a label equals one of `string_match` (ignoring case), the renderer
/// decorates it with a description assembled from the remaining fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    /// Strings this component annotates
    #[serde(default, deserialize_with = "one_or_many")]
    pub string_match: Vec<String>,
    /// Operation performed
    #[serde(default, deserialize_with = "one_or_many")]
    pub operation: Vec<LabeledRef>,
    /// Measured properties
    #[serde(default, deserialize_with = "one_or_many")]
    pub properties: Vec<LabeledRef>,
    /// Objects of interest
    #[serde(default, deserialize_with = "one_or_many")]
    pub object_of_interests: Vec<LabeledRef>,
    /// Matrices the objects live in
    #[serde(default, deserialize_with = "one_or_many")]
    pub matrices: Vec<LabeledRef>,
    /// Units of measure
    #[serde(default, deserialize_with = "one_or_many")]
    pub units: Vec<LabeledRef>,
}

impl Component {
    /// Case-insensitive exact match against `string_match`
    #[must_use]
    pub fn matches(&self, label: &str) -> bool {
        let needle = label.to_lowercase();
        self.string_match.iter().any(|s| s.to_lowercase() == needle)
    }
}

/// Keep well-formed components, drop the rest
fn lenient_components<'de, D>(deserializer: D) -> Result<Vec<Component>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<Value> = one_or_many(deserializer)?;
    Ok(raw
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record_value() -> Value {
        json!({
            "type": { "name": "analysis", "properties": ["label", "has_input"] },
            "has_part": { "label": "Fit", "has_input": [] },
            "is_implemented_by": "https://example.org/fit.py",
            "components": [
                { "string_match": "Fit", "operation": { "label": "regression", "url": "u" } },
                42
            ]
        })
    }

    #[test]
    fn parses_record() {
        let record = DataTypeRecord::from_value(&record_value()).unwrap();
        assert_eq!(record.type_info.properties, vec!["label", "has_input"]);
        assert_eq!(record.label(), Some("Fit"));
        assert_eq!(record.is_implemented_by.len(), 1);
        assert_eq!(record.components.len(), 1);
    }

    #[test]
    fn missing_has_part_is_malformed() {
        let mut value = record_value();
        value.as_object_mut().unwrap().remove("has_part");
        let err = DataTypeRecord::from_value(&value).unwrap_err();
        assert_eq!(err, ModelError::malformed_record("missing has_part"));
    }

    #[test]
    fn missing_properties_is_malformed() {
        let value = json!({ "type": { "name": "x" }, "has_part": {} });
        let err = DataTypeRecord::from_value(&value).unwrap_err();
        assert_eq!(err, ModelError::malformed_record("missing type.properties"));
    }

    #[test]
    fn component_match_is_case_insensitive_exact() {
        let component = Component {
            string_match: vec!["Blood Pressure".into()],
            ..Component::default()
        };
        assert!(component.matches("blood pressure"));
        assert!(!component.matches("blood"));
        assert!(!component.matches("blood pressure level"));
    }

    #[test]
    fn labeled_ref_from_string_or_object() {
        let refs: Vec<LabeledRef> =
            serde_json::from_value(json!(["mg", { "label": "kg", "url": "" }])).unwrap();
        assert_eq!(refs[0], LabeledRef::new("mg", None));
        assert_eq!(refs[1], LabeledRef::new("kg", None));
    }

    #[test]
    fn from_node_splits_record_level_keys() {
        let node = StatementNode::from_value(json!({
            "@type": "doi:P1",
            "doi:P1#label": "step",
            "doi:P1#is_implemented_by": ["a.py", "b.r"],
            "doi:P1#components": { "string_match": ["step"] }
        }))
        .unwrap();
        let record = DataTypeRecord::from_node(&node, TypeInfo::from_names("t", ["label"]));
        assert_eq!(record.has_part.len(), 1);
        assert_eq!(record.is_implemented_by.len(), 2);
        assert!(record.component_for("STEP").is_some());
    }
}
