//! Statement tree resolver
//!
//! Resolves each node's `@type` to a [`TypeInfo`] through the schema cache,
//! falling back to the type-schema service on a miss, then dispatches the
//! node's properties into directives.
//!
//! # Failure containment
//!
//! Every failure is confined to its node: an invalid type, a failed fetch,
//! a reference back to an ancestor or the depth cap turn that node into an
//! inert leaf while siblings and ancestors render normally. A failed cache write is logged and the fetched
//! schema is still used.

use crate::error::ResolveError;
use crate::graph::NodeIndex;
use crate::tree::{NodeStatus, ResolvedNode};
use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use stmt_cache::SchemaCache;
use stmt_dispatch::PropertyDispatcher;
use stmt_model::{DataTypeRecord, StatementNode, TypeInfo, TypeKey};
use stmt_services::SchemaSource;

/// Resolves statement nodes to types and directive trees
#[derive(Clone)]
pub struct StatementTreeResolver {
    cache: Arc<dyn SchemaCache>,
    source: Arc<dyn SchemaSource>,
    dispatcher: PropertyDispatcher,
    max_depth: usize,
}

impl fmt::Debug for StatementTreeResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatementTreeResolver")
            .field("cache", &"<dyn SchemaCache>")
            .field("source", &"<dyn SchemaSource>")
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl StatementTreeResolver {
    /// Default recursion cap
    pub const DEFAULT_MAX_DEPTH: usize = 64;

    /// Create resolver
    #[must_use]
    pub fn new(cache: Arc<dyn SchemaCache>, source: Arc<dyn SchemaSource>) -> Self {
        Self {
            cache,
            source,
            dispatcher: PropertyDispatcher::new(),
            max_depth: Self::DEFAULT_MAX_DEPTH,
        }
    }

    /// With recursion cap
    #[inline]
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Recursion cap
    #[inline]
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Resolve a node's type
    ///
    /// # Errors
    /// - `ResolveError::InvalidTypeFormat` if `@type` is missing or lacks
    ///   the `doi:` prefix
    /// - `ResolveError::SchemaFetch` if the key is uncached and the service
    ///   fails or answers without `schema.Properties`
    pub async fn resolve(&self, node: &StatementNode) -> Result<TypeInfo, ResolveError> {
        let key = node.type_key()?;
        self.resolve_key(&key).await
    }

    /// Resolve a normalized type key
    ///
    /// # Errors
    /// - `ResolveError::SchemaFetch` on service failure
    #[tracing::instrument(skip(self, key), fields(key = %key))]
    pub async fn resolve_key(&self, key: &TypeKey) -> Result<TypeInfo, ResolveError> {
        if let Some(info) = self.cache.get(key).await {
            tracing::trace!("schema cache hit");
            return Ok(info);
        }

        let info = self
            .source
            .fetch_type_info(key)
            .await
            .map_err(|e| ResolveError::schema_fetch(key.as_str(), e))?;

        if let Err(e) = self.cache.set(key.clone(), info.clone()).await {
            tracing::warn!(error = %e, "failed to persist type schema");
        }

        Ok(info)
    }

    /// Resolve a node and every typed node beneath it
    ///
    /// Never fails as a whole; failures appear as [`NodeStatus::Failed`]
    /// leaves. Children are resolved in document order, so repeated types
    /// are served from the cache after their first fetch.
    pub async fn resolve_tree(&self, root: &StatementNode) -> ResolvedNode {
        let index = NodeIndex::build(root);
        tracing::debug!(indexed = index.len(), "resolving statement tree");
        let mut path = HashSet::new();
        self.resolve_at(root, &index, 0, &mut path).await
    }

    /// Dispatch a resolved node's own properties
    #[must_use]
    pub fn directives_for(
        &self,
        node: &StatementNode,
        info: &TypeInfo,
    ) -> Vec<stmt_dispatch::RenderDirective> {
        let record = DataTypeRecord::from_node(node, info.clone());
        self.dispatcher.dispatch(&record)
    }

    /// `path` holds the identifiers of the node's ancestors.
    fn resolve_at<'a>(
        &'a self,
        node: &'a StatementNode,
        index: &'a NodeIndex,
        depth: usize,
        path: &'a mut HashSet<String>,
    ) -> BoxFuture<'a, ResolvedNode> {
        async move {
            let id = node.id().map(str::to_string);
            let type_iri = node.type_iri().map(str::to_string);

            if let Some(seen) = id.as_deref().filter(|id| path.contains(*id)) {
                tracing::debug!(id = seen, depth, "reference cycle cut");
                let err = ResolveError::CycleDetected {
                    id: seen.to_string(),
                    depth,
                };
                return ResolvedNode::failed(id, type_iri, depth, err);
            }

            if depth >= self.max_depth {
                tracing::warn!(depth, limit = self.max_depth, "statement tree too deep");
                return ResolvedNode::failed(
                    id,
                    type_iri,
                    depth,
                    ResolveError::MaxDepthExceeded {
                        depth,
                        limit: self.max_depth,
                    },
                );
            }

            let info = match self.resolve(node).await {
                Ok(info) => info,
                Err(err) => {
                    tracing::warn!(error = %err, depth, "node left unresolved");
                    return ResolvedNode::failed(id, type_iri, depth, err);
                }
            };

            let directives = self.directives_for(node, &info);

            let entered = id.clone().filter(|id| path.insert(id.clone()));
            let mut children = Vec::new();
            for child in index.children_of(node) {
                children.push(self.resolve_at(&child, index, depth + 1, &mut *path).await);
            }
            if let Some(entered) = &entered {
                path.remove(entered);
            }

            ResolvedNode {
                id,
                type_iri,
                depth,
                status: NodeStatus::Resolved(info),
                directives,
                children,
            }
        }
        .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use stmt_services::{FetchError, MockSchemaSource};
    use stmt_test_utils::{
        analysis_type_info, fixture_schema_source, key, memory_cache, node, statement_content,
        typed_node, CountingSchemaSource, ANALYSIS_TYPE, DATA_ITEM_TYPE,
    };

    fn resolver(source: Arc<CountingSchemaSource>) -> StatementTreeResolver {
        StatementTreeResolver::new(memory_cache(), source)
    }

    #[tokio::test]
    async fn warm_cache_fetches_once() {
        let source = Arc::new(fixture_schema_source());
        let resolver = resolver(Arc::clone(&source));

        let first = resolver.resolve(&typed_node(ANALYSIS_TYPE)).await.unwrap();
        let second = resolver.resolve(&typed_node(ANALYSIS_TYPE)).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(source.calls(), vec![key(ANALYSIS_TYPE)]);
    }

    #[tokio::test]
    async fn rejects_unprefixed_type_without_fetching() {
        let source = Arc::new(fixture_schema_source());
        let resolver = resolver(Arc::clone(&source));

        let err = resolver.resolve(&typed_node("21.T11969/P1004")).await.unwrap_err();
        assert!(matches!(err, ResolveError::InvalidTypeFormat(_)));
        assert_eq!(source.call_count(), 0);
    }

    #[tokio::test]
    async fn missing_properties_is_not_cached() {
        let mut mock = MockSchemaSource::new();
        mock.expect_fetch_type_info().times(2).returning(|key| {
            Err(FetchError::InvalidSchema {
                key: key.to_string(),
                reason: "missing schema.Properties".into(),
            })
        });
        let cache = memory_cache();
        let resolver = StatementTreeResolver::new(cache.clone(), Arc::new(mock));

        for _ in 0..2 {
            let err = resolver.resolve(&typed_node(ANALYSIS_TYPE)).await.unwrap_err();
            assert!(matches!(
                err,
                ResolveError::SchemaFetch { source: FetchError::InvalidSchema { .. }, .. }
            ));
        }
        assert!(cache.get(&key(ANALYSIS_TYPE)).await.is_none());
    }

    #[tokio::test]
    async fn tree_resolves_every_typed_node() {
        let source = Arc::new(fixture_schema_source());
        let resolver = resolver(Arc::clone(&source));

        let tree = resolver.resolve_tree(&node(statement_content())).await;

        assert!(tree.failures().is_empty());
        assert_eq!(tree.walk().len(), 4);
        assert_eq!(tree.max_depth(), 2);

        let analysis = &tree.children[0];
        assert_eq!(analysis.type_info(), Some(&analysis_type_info()));
        let kinds: Vec<_> = analysis.directives.iter().map(|d| d.kind()).collect();
        assert_eq!(
            kinds,
            vec!["label", "input_group", "output_group", "evaluates", "implementation"]
        );

        // Both data items share one fetch.
        let item_fetches = source.calls().iter().filter(|k| **k == key(DATA_ITEM_TYPE)).count();
        assert_eq!(item_fetches, 1);
    }

    #[tokio::test]
    async fn failed_child_does_not_stop_siblings() {
        let source = Arc::new(fixture_schema_source());
        let resolver = resolver(Arc::clone(&source));

        let root = node(json!({
            "@type": ANALYSIS_TYPE,
            "doi:P1004#has_input": [
                { "@type": "doi:UNKNOWN" },
                { "@type": "P2" },
                { "@type": DATA_ITEM_TYPE }
            ]
        }));
        let tree = resolver.resolve_tree(&root).await;

        assert!(tree.error().is_none());
        assert_eq!(tree.children.len(), 3);
        assert!(matches!(
            tree.children[0].error(),
            Some(ResolveError::SchemaFetch { .. })
        ));
        assert!(matches!(
            tree.children[1].error(),
            Some(ResolveError::InvalidTypeFormat(_))
        ));
        assert!(tree.children[2].type_info().is_some());
        assert!(tree.children[0].directives.is_empty());
    }

    #[tokio::test]
    async fn self_reference_becomes_cycle_leaf() {
        let source = Arc::new(fixture_schema_source());
        let resolver = resolver(Arc::clone(&source));

        let root = node(json!({
            "@id": "loop",
            "@type": ANALYSIS_TYPE,
            "doi:P1004#has_output": { "@id": "loop" }
        }));
        let tree = resolver.resolve_tree(&root).await;

        assert!(tree.error().is_none());
        assert_eq!(tree.children.len(), 1);
        assert_eq!(
            tree.children[0].error(),
            Some(&ResolveError::CycleDetected { id: "loop".into(), depth: 1 })
        );
        assert_eq!(tree.max_depth(), 1);
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn repeated_self_references_stay_flat() {
        let source = Arc::new(fixture_schema_source());
        let resolver = resolver(Arc::clone(&source));

        let root = node(json!({
            "@id": "loop",
            "@type": ANALYSIS_TYPE,
            "doi:P1004#has_output": [{ "@id": "loop" }, { "@id": "loop" }]
        }));
        let tree = tokio::time::timeout(
            std::time::Duration::from_secs(5),
            resolver.resolve_tree(&root),
        )
        .await
        .unwrap();

        assert_eq!(tree.walk().len(), 3);
        assert_eq!(tree.failures().len(), 2);
        for child in &tree.children {
            assert!(matches!(child.error(), Some(ResolveError::CycleDetected { .. })));
            assert!(child.children.is_empty());
        }
    }

    #[tokio::test]
    async fn shared_node_is_not_a_cycle() {
        let source = Arc::new(fixture_schema_source());
        let resolver = resolver(source);

        let root = node(json!({
            "@type": ANALYSIS_TYPE,
            "doi:P1004#has_input": { "@id": "d1", "@type": DATA_ITEM_TYPE },
            "doi:P1004#has_output": { "@id": "d1" }
        }));
        let tree = resolver.resolve_tree(&root).await;

        assert!(tree.failures().is_empty());
        assert_eq!(tree.children.len(), 2);
        assert_eq!(tree.children[0], tree.children[1]);
    }

    #[tokio::test]
    async fn deep_chain_stops_at_depth_cap() {
        let source = Arc::new(fixture_schema_source());
        let resolver = resolver(Arc::clone(&source));

        let mut chain = json!({ "@type": DATA_ITEM_TYPE });
        for _ in 0..70 {
            chain = json!({ "@type": ANALYSIS_TYPE, "doi:P1004#has_output": chain });
        }
        let tree = resolver.resolve_tree(&node(chain)).await;

        let deepest = tree.walk().into_iter().max_by_key(|n| n.depth).unwrap();
        assert_eq!(deepest.depth, StatementTreeResolver::DEFAULT_MAX_DEPTH);
        assert_eq!(
            deepest.error(),
            Some(&ResolveError::MaxDepthExceeded { depth: 64, limit: 64 })
        );
        assert_eq!(tree.failures().len(), 1);
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn custom_depth_cap() {
        let source = Arc::new(fixture_schema_source());
        let resolver = resolver(source).with_max_depth(1);

        let tree = resolver.resolve_tree(&node(statement_content())).await;
        assert!(tree.error().is_none());
        assert!(matches!(
            tree.children[0].error(),
            Some(ResolveError::MaxDepthExceeded { depth: 1, limit: 1 })
        ));
    }
}
