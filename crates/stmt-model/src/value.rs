//! Helpers for the loosely-shaped JSON served by the articles API
//!
//! Fields documented as arrays frequently arrive as a single object or as
//! `null`; these helpers flatten all three shapes.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// View a value as a list: arrays yield their elements, `null` yields
/// nothing, anything else yields itself.
#[must_use]
pub fn as_list(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

/// First element of [`as_list`]
#[must_use]
pub fn first(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(items) => items.first(),
        Value::Null => None,
        other => Some(other),
    }
}

/// Non-empty string field of an object
#[must_use]
pub fn str_field<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
    value
        .get(field)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// First non-empty string among several candidate field names
#[must_use]
pub fn str_field_any<'a>(value: &'a Value, fields: &[&str]) -> Option<&'a str> {
    fields.iter().find_map(|f| str_field(value, f))
}

/// Label of a value: the string itself, or its `label` field
#[must_use]
pub fn label_of(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.as_str()),
        Value::Object(_) => str_field(value, "label"),
        _ => None,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

/// Serde adapter accepting `null`, a single item, or an array
pub(crate) fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::Many(items)) => items,
        Some(OneOrMany::One(item)) => vec![item],
    })
}
