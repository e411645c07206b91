//! Statement Viewer Core
//!
//! Resolution and scheduling on top of the model, cache, services and
//! dispatch crates.
//!
//! # Architecture
//!
//! ```text
//! StatementViewer
//!   ├── StatementApi            (statement content)
//!   ├── PropertyDispatcher      (data_type records → directives)
//!   ├── StatementTreeResolver   (content graph → ResolvedNode tree)
//!   │     ├── SchemaCache       (memory + persisted "node-keys")
//!   │     └── SchemaSource      (type-schema service)
//!   ├── DebouncedResolver       (per-node request coalescing)
//!   └── SourcePanel             (lazy implementation sources)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use stmt_core::{StatementEndpoint, StatementViewer, ViewerConfig};
//!
//! let viewer = StatementViewer::from_config(ViewerConfig::load("viewer.toml")?)?;
//! let view = viewer.load("42", StatementEndpoint::ById).await?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod config;
pub mod debounce;
pub mod error;
pub mod graph;
pub mod panel;
pub mod resolver;
pub mod tree;
pub mod viewer;

// Re-exports for convenience
pub use config::{ViewerConfig, DEFAULT_BASE_URL};
pub use debounce::{DebouncedResolver, NodeId, NodeState};
pub use error::{ConfigError, ResolveError, ViewerError, ViewerResult};
pub use graph::NodeIndex;
pub use panel::{PanelState, SourcePanel};
pub use resolver::StatementTreeResolver;
pub use tree::{NodeStatus, ResolvedNode};
pub use viewer::{StatementEndpoint, StatementView, StatementViewer};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prelude for common imports
pub mod prelude {
    pub use super::{
        DebouncedResolver, NodeId, NodeState, ResolveError, ResolvedNode, StatementTreeResolver,
        StatementViewer, ViewerConfig, ViewerError,
    };
    pub use stmt_cache::{SchemaCache, TypeSchemaCache};
    pub use stmt_dispatch::{PropertyDispatcher, RenderDirective};
    pub use stmt_model::{DataTypeRecord, StatementNode, TypeInfo, TypeKey};
}
