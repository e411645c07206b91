//! Statement Model
//!
//! Typed views over the JSON documents served by the articles API and the
//! type-schema service.
//!
//! # Core Concepts
//!
//! - [`StatementNode`]: JSON-LD node carrying an ontology `@type`
//! - [`TypeKey`]: normalized ontology identifier used for schema lookup
//! - [`TypeInfo`]: resolved schema descriptor with its ordered property list
//! - [`DataTypeRecord`]: one analysis step of a statement, ready for dispatch
//! - [`Component`]: cross-reference entry used to decorate labels
//!
//! # Example
//!
//! ```rust
//! use stmt_model::TypeKey;
//!
//! let key = TypeKey::parse("doi:21.T11969/P1004").unwrap();
//! assert_eq!(key.as_str(), "P1004");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod error;
mod node;
mod record;
mod statement;
mod type_info;
mod type_key;
pub mod value;

// Re-exports
pub use error::ModelError;
pub use node::StatementNode;
pub use record::{Component, DataTypeRecord, LabeledRef};
pub use statement::Statement;
pub use type_info::{SchemaProperty, TypeInfo, TypeSchema};
pub use type_key::{TypeKey, REGISTRY_SEGMENT, TYPE_PREFIX};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn node_to_record_roundtrip() {
        let node = StatementNode::from_value(json!({
            "@type": "doi:21.T11969/P1004",
            "doi:21.T11969/P1004#label": "t-test",
            "doi:21.T11969/P1004#has_input": [{ "label": "samples" }]
        }))
        .unwrap();

        let key = node.type_key().unwrap();
        let info = TypeInfo::from_names("analysis", ["label", "has_input"]);
        let record = DataTypeRecord::from_node(&node, info);

        assert_eq!(key.as_str(), "P1004");
        assert_eq!(record.label(), Some("t-test"));
        assert!(record.has_part.contains_key("has_input"));
    }
}
