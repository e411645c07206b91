//! Statement viewer facade
//!
//! Wires the articles API, the schema cache, the type-schema service and the
//! code source together for front-ends.

use crate::config::ViewerConfig;
use crate::debounce::DebouncedResolver;
use crate::error::ViewerResult;
use crate::panel::SourcePanel;
use crate::resolver::StatementTreeResolver;
use crate::tree::ResolvedNode;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use stmt_cache::{FileStore, MemoryStore, SchemaCache, TypeSchemaCache};
use stmt_dispatch::{ImplementationDirective, PropertyDispatcher, RecordOutcome};
use stmt_model::Statement;
use stmt_services::{
    build_client, CodeSource, HttpCodeSource, HttpSchemaSource, HttpStatementApi, StatementApi,
};

/// Which articles endpoint serves a statement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatementEndpoint {
    /// `get_statement_by_id`
    #[default]
    ById,
    /// `get_statement`
    Full,
}

/// Everything a front-end needs to render one statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatementView {
    /// Statement identifier
    pub id: String,
    /// Statement label
    pub label: Option<String>,
    /// One outcome per `data_type` record, in order
    pub records: Vec<RecordOutcome>,
    /// Resolved content graph, absent when the statement has no typed root
    pub tree: Option<ResolvedNode>,
}

/// Statement viewer
#[derive(Clone)]
pub struct StatementViewer {
    api: Arc<dyn StatementApi>,
    resolver: Arc<StatementTreeResolver>,
    code: Arc<dyn CodeSource>,
    dispatcher: PropertyDispatcher,
    config: ViewerConfig,
}

impl fmt::Debug for StatementViewer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatementViewer")
            .field("resolver", &self.resolver)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl StatementViewer {
    /// Create viewer from explicit collaborators
    #[must_use]
    pub fn new(
        api: Arc<dyn StatementApi>,
        resolver: Arc<StatementTreeResolver>,
        code: Arc<dyn CodeSource>,
        config: ViewerConfig,
    ) -> Self {
        Self {
            api,
            resolver,
            code,
            dispatcher: PropertyDispatcher::new(),
            config,
        }
    }

    /// Create viewer talking to the configured HTTP services
    ///
    /// # Errors
    /// - `ViewerError::Config` if the configuration is invalid
    /// - `ViewerError::Fetch` if the HTTP client cannot be built
    pub fn from_config(config: ViewerConfig) -> ViewerResult<Self> {
        config.validate()?;
        let client = build_client(&config.http_settings())?;

        let cache: Arc<dyn SchemaCache> = match &config.cache_dir {
            Some(dir) => Arc::new(TypeSchemaCache::with_capacity(
                FileStore::new(dir),
                config.cache_capacity,
            )),
            None => Arc::new(TypeSchemaCache::with_capacity(
                MemoryStore::new(),
                config.cache_capacity,
            )),
        };

        let schemas = Arc::new(HttpSchemaSource::with_client(
            client.clone(),
            config.schema_service_url.clone(),
        ));
        let resolver =
            StatementTreeResolver::new(cache, schemas).with_max_depth(config.max_depth);

        let api = Arc::new(HttpStatementApi::with_client(
            client.clone(),
            config.api_base_url.clone(),
        ));
        let code = Arc::new(HttpCodeSource::with_client(client));

        Ok(Self::new(api, Arc::new(resolver), code, config))
    }

    /// Configuration in use
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Shared resolver
    #[inline]
    #[must_use]
    pub fn resolver(&self) -> &Arc<StatementTreeResolver> {
        &self.resolver
    }

    /// Fetch a statement
    ///
    /// # Errors
    /// - `ViewerError::Fetch` if the articles API fails
    pub async fn fetch(&self, id: &str, endpoint: StatementEndpoint) -> ViewerResult<Statement> {
        let statement = match endpoint {
            StatementEndpoint::ById => self.api.get_statement_by_id(id).await?,
            StatementEndpoint::Full => self.api.get_statement(id).await?,
        };
        Ok(statement)
    }

    /// Fetch a statement and resolve everything needed to render it
    ///
    /// Malformed records and unresolvable nodes are contained in the view;
    /// only the statement fetch itself can fail.
    ///
    /// # Errors
    /// - `ViewerError::Fetch` if the articles API fails
    #[tracing::instrument(skip(self))]
    pub async fn load(&self, id: &str, endpoint: StatementEndpoint) -> ViewerResult<StatementView> {
        let statement = self.fetch(id, endpoint).await?;
        Ok(self.view(statement).await)
    }

    /// Resolve an already fetched statement
    pub async fn view(&self, statement: Statement) -> StatementView {
        let records = self.dispatcher.dispatch_all(&statement.data_type);
        let tree = match statement.root_node() {
            Some(root) => Some(self.resolver.resolve_tree(&root).await),
            None => {
                tracing::debug!(statement = %statement.id, "statement has no typed content");
                None
            }
        };

        StatementView {
            id: statement.id,
            label: statement.label,
            records,
            tree,
        }
    }

    /// Panel for an implementation directive
    #[must_use]
    pub fn source_panel(&self, directive: ImplementationDirective) -> SourcePanel {
        SourcePanel::new(directive, Arc::clone(&self.code))
    }

    /// Debouncer using the configured window
    #[must_use]
    pub fn debounced(&self) -> DebouncedResolver {
        DebouncedResolver::new(Arc::clone(&self.resolver), self.config.debounce_window())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ViewerError;
    use stmt_dispatch::RenderDirective;
    use stmt_services::FetchError;
    use stmt_test_utils::{
        fixture_schema_source, memory_cache, sample_statement, FakeCodeSource, FakeStatementApi,
    };

    fn viewer() -> StatementViewer {
        let resolver = StatementTreeResolver::new(memory_cache(), Arc::new(fixture_schema_source()));
        StatementViewer::new(
            Arc::new(FakeStatementApi::new().with_statement(sample_statement())),
            Arc::new(resolver),
            Arc::new(FakeCodeSource::new()),
            ViewerConfig::default(),
        )
    }

    #[tokio::test]
    async fn load_builds_records_and_tree() {
        let view = viewer().load("42", StatementEndpoint::ById).await.unwrap();

        assert_eq!(view.records.len(), 2);
        assert!(!view.records[0].is_skipped());
        assert!(view.records[1].is_skipped());

        let tree = view.tree.unwrap();
        assert!(tree.failures().is_empty());
        assert_eq!(tree.walk().len(), 4);
    }

    #[tokio::test]
    async fn unknown_statement_is_an_error() {
        let err = viewer().load("7", StatementEndpoint::Full).await.unwrap_err();
        assert!(matches!(
            err,
            ViewerError::Fetch(FetchError::Status { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn statement_without_content_has_no_tree() {
        let mut statement = sample_statement();
        statement.content = None;
        let view = viewer().view(statement).await;
        assert!(view.tree.is_none());
        assert_eq!(view.records.len(), 2);
    }

    #[tokio::test]
    async fn record_implementation_opens_panel() {
        let view = viewer().load("42", StatementEndpoint::ById).await.unwrap();
        let implementation = view.records[0]
            .directives()
            .iter()
            .find_map(|d| match d {
                RenderDirective::Implementation(i) => Some(i.clone()),
                _ => None,
            })
            .unwrap();

        let panel = viewer().source_panel(implementation);
        assert_eq!(panel.state(), crate::panel::PanelState::Collapsed);
    }

    #[test]
    fn from_config_rejects_invalid_config() {
        let err = StatementViewer::from_config(ViewerConfig::new().with_max_depth(0)).unwrap_err();
        assert!(matches!(err, ViewerError::Config(_)));
    }
}
