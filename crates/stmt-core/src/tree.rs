//! Resolved statement trees

use crate::error::ResolveError;
use serde::{Serialize, Serializer};
use stmt_dispatch::RenderDirective;
use stmt_model::TypeInfo;

/// Outcome of resolving one node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    /// Type resolved
    Resolved(TypeInfo),
    /// Resolution failed; the node is an inert leaf
    Failed(#[serde(serialize_with = "display")] ResolveError),
}

fn display<S: Serializer>(err: &ResolveError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(err)
}

/// One node of a resolved statement tree
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedNode {
    /// `@id` of the node
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Raw `@type`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_iri: Option<String>,
    /// Distance from the root
    pub depth: usize,
    /// Resolution outcome
    pub status: NodeStatus,
    /// Directives for the node's own properties
    pub directives: Vec<RenderDirective>,
    /// Resolved children, in document order
    pub children: Vec<ResolvedNode>,
}

impl ResolvedNode {
    /// Create failed leaf
    #[must_use]
    pub fn failed(
        id: Option<String>,
        type_iri: Option<String>,
        depth: usize,
        err: ResolveError,
    ) -> Self {
        Self {
            id,
            type_iri,
            depth,
            status: NodeStatus::Failed(err),
            directives: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Resolved type, if any
    #[inline]
    #[must_use]
    pub fn type_info(&self) -> Option<&TypeInfo> {
        match &self.status {
            NodeStatus::Resolved(info) => Some(info),
            NodeStatus::Failed(_) => None,
        }
    }

    /// Failure, if any
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<&ResolveError> {
        match &self.status {
            NodeStatus::Failed(err) => Some(err),
            NodeStatus::Resolved(_) => None,
        }
    }

    /// Nodes of the subtree in depth-first pre-order
    #[must_use]
    pub fn walk(&self) -> Vec<&ResolvedNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// Deepest depth in the subtree
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.walk().iter().map(|n| n.depth).max().unwrap_or(self.depth)
    }

    /// Failed nodes of the subtree
    #[must_use]
    pub fn failures(&self) -> Vec<&ResolvedNode> {
        self.walk().into_iter().filter(|n| n.error().is_some()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn leaf(depth: usize, name: &str) -> ResolvedNode {
        ResolvedNode {
            id: Some(name.to_string()),
            type_iri: None,
            depth,
            status: NodeStatus::Resolved(TypeInfo::from_names(name, ["label"])),
            directives: Vec::new(),
            children: Vec::new(),
        }
    }

    #[test]
    fn walk_is_preorder() {
        let mut root = leaf(0, "root");
        let mut a = leaf(1, "a");
        a.children.push(leaf(2, "a1"));
        root.children.push(a);
        root.children.push(ResolvedNode::failed(
            Some("b".into()),
            None,
            1,
            ResolveError::InvalidTypeFormat("P9".into()),
        ));

        let ids: Vec<_> = root.walk().iter().filter_map(|n| n.id.as_deref()).collect();
        assert_eq!(ids, vec!["root", "a", "a1", "b"]);
        assert_eq!(root.max_depth(), 2);
        assert_eq!(root.failures().len(), 1);
    }

    #[test]
    fn failed_status_serializes_as_message() {
        let node = ResolvedNode::failed(None, None, 3, ResolveError::InvalidTypeFormat("P9".into()));
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["status"], json!({ "failed": "invalid type format: P9" }));
        assert!(value.get("id").is_none());
    }
}
