//! Statement Schema Cache
//!
//! Memoizes resolved ontology types so that each type key is fetched from
//! the type-schema service at most once.
//!
//! # Architecture
//!
//! ```text
//! resolver → SchemaCache::get ─┬─ moka (memory, session lifetime)
//!                              └─ SchemaStore ("node-keys": whole map)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use stmt_cache::{FileStore, SchemaCache, TypeSchemaCache};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let cache = TypeSchemaCache::new(FileStore::new("/var/cache/stmt"));
//! cache.set(key.clone(), info).await?;
//! assert!(cache.get(&key).await.is_some());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

// Core modules
pub mod cache;
pub mod error;
pub mod store;

// Re-exports for convenience
pub use cache::{CacheStats, SchemaCache, SchemaMap, TypeSchemaCache};
pub use error::{CacheError, StoreError};
pub use store::{FileStore, MemoryStore, SchemaStore, NAMESPACE};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
