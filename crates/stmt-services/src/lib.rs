//! Statement Services
//!
//! Seams to the external collaborators of the viewer:
//!
//! - [`SchemaSource`]: type-schema lookup (`/service/type-info`)
//! - [`StatementApi`]: statement content (`/articles/get_statement*`)
//! - [`CodeSource`]: implementation files shown in source panels
//!
//! Each seam is a trait with a reqwest-backed implementation. Enable the
//! `mock` feature to get mockall doubles (`MockSchemaSource`, ...) in
//! downstream tests.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod code;
pub mod error;
pub mod http;
pub mod schema;
pub mod statements;

pub use code::{CodeSource, HttpCodeSource};
pub use error::FetchError;
pub use http::{build_client, HttpSettings};
pub use schema::{HttpSchemaSource, SchemaSource};
pub use statements::{HttpStatementApi, StatementApi};

#[cfg(any(test, feature = "mock"))]
pub use code::MockCodeSource;
#[cfg(any(test, feature = "mock"))]
pub use schema::MockSchemaSource;
#[cfg(any(test, feature = "mock"))]
pub use statements::MockStatementApi;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
