//! Node index and child discovery for statement graphs
//!
//! Statements may reference a node by `{"@id": ..}` instead of nesting it.
//! [`NodeIndex`] maps identifiers to their full nodes so such references
//! resolve to the node they name. References may form cycles; the resolver
//! cuts a reference back to an ancestor before following it.

use serde_json::Value;
use std::collections::HashMap;
use stmt_model::StatementNode;

/// Identifier → node lookup over one statement graph
#[derive(Debug, Clone, Default)]
pub struct NodeIndex {
    nodes: HashMap<String, StatementNode>,
}

impl NodeIndex {
    /// Create empty index
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every identified, non-reference node reachable from the root,
    /// including members of `@graph`
    #[must_use]
    pub fn build(root: &StatementNode) -> Self {
        let mut index = Self::new();
        index.insert(root.clone());
        for value in root.as_map().values() {
            index.collect(value);
        }
        index
    }

    fn collect(&mut self, value: &Value) {
        match value {
            Value::Array(items) => {
                for item in items {
                    self.collect(item);
                }
            }
            Value::Object(map) => {
                if map.len() > 1 && map.get("@id").is_some_and(Value::is_string) {
                    self.insert(StatementNode::new(map.clone()));
                }
                for nested in map.values() {
                    self.collect(nested);
                }
            }
            _ => {}
        }
    }

    /// Add a node; the first node seen for an identifier wins
    pub fn insert(&mut self, node: StatementNode) {
        if node.is_reference() {
            return;
        }
        if let Some(id) = node.id().map(str::to_string) {
            self.nodes.entry(id).or_insert(node);
        }
    }

    /// Node by identifier
    #[inline]
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&StatementNode> {
        self.nodes.get(id)
    }

    /// Number of indexed nodes
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the index is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Typed child nodes of a node, in document order
    ///
    /// Walks property values (and `@graph`): typed objects become children,
    /// `{"@id"}` references are followed through the index, and untyped
    /// containers are searched without becoming nodes themselves. Dangling
    /// references are dropped.
    #[must_use]
    pub fn children_of(&self, node: &StatementNode) -> Vec<StatementNode> {
        let mut out = Vec::new();
        for (_, value) in node.properties() {
            self.discover(value, &mut out);
        }
        if let Some(graph) = node.as_map().get("@graph") {
            self.discover(graph, &mut out);
        }
        out
    }

    fn discover(&self, value: &Value, out: &mut Vec<StatementNode>) {
        match value {
            Value::Array(items) => {
                for item in items {
                    self.discover(item, out);
                }
            }
            Value::Object(map) => {
                if map.len() == 1 {
                    if let Some(id) = map.get("@id").and_then(Value::as_str) {
                        match self.get(id) {
                            Some(target) => out.push(target.clone()),
                            None => tracing::debug!(id, "dangling node reference"),
                        }
                        return;
                    }
                }
                if map.contains_key("@type") {
                    out.push(StatementNode::new(map.clone()));
                    return;
                }
                for nested in map.values() {
                    self.discover(nested, out);
                }
            }
            _ => {}
        }
    }
}
