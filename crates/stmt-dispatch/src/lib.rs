//! Statement Property Dispatch
//!
//! Turns a resolved [`DataTypeRecord`](stmt_model::DataTypeRecord) into a
//! list of presentation-neutral [`RenderDirective`]s.
//!
//! # Example
//!
//! ```rust,ignore
//! use stmt_dispatch::{render_text, PropertyDispatcher};
//!
//! let outcomes = PropertyDispatcher::new().dispatch_all(&statement.data_type);
//! for outcome in &outcomes {
//!     println!("{}", render_text(outcome.directives()));
//! }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod directive;
pub mod dispatcher;
pub mod error;
mod extract;
pub mod popover;
pub mod property;
mod render;

// Re-exports for convenience
pub use directive::{
    EvaluatesDirective, ExecutesDirective, ExpressionDirective, ImplementationDirective,
    IoGroupDirective, IoItemDirective, LabelDirective, LevelDirective, LinkDirective, Provenance,
    RenderDirective, SourceLanguage,
};
pub use dispatcher::{PropertyDispatcher, RecordOutcome};
pub use error::DispatchError;
pub use popover::Popover;
pub use property::{Property, PropertyPair};
pub use render::render_text;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
