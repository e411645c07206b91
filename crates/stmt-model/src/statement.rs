//! Statements as served by the articles API

use crate::node::StatementNode;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Machine-extracted scientific statement
///
/// `data_type` records are kept as raw JSON so that one malformed record
/// never fails deserialization of the whole statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    /// Statement identifier
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,
    /// Statement label
    #[serde(default)]
    pub label: Option<String>,
    /// Root JSON-LD node of the statement graph
    #[serde(default)]
    pub content: Option<Value>,
    /// Analysis steps, each shaped like a `DataTypeRecord`
    #[serde(default)]
    pub data_type: Vec<Value>,
}

impl Statement {
    /// Root node of the semantic graph, if the content is a typed object
    #[must_use]
    pub fn root_node(&self) -> Option<StatementNode> {
        self.content.as_ref().and_then(StatementNode::typed)
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}
