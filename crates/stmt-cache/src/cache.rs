//! Type-schema cache using moka over a persistent store
//!
//! Memoizes `TypeKey → TypeInfo` so identical ontology types are fetched at
//! most once, within a session and across sessions.

use crate::error::CacheError;
use crate::store::SchemaStore;
use async_trait::async_trait;
use moka::future::Cache;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use stmt_model::{TypeInfo, TypeKey};
use tokio::sync::Mutex;

/// Persisted shape of the cache
pub type SchemaMap = BTreeMap<TypeKey, TypeInfo>;

/// Key → schema memoization consumed by the resolver
#[async_trait]
pub trait SchemaCache: Send + Sync {
    /// Cached schema for a key
    ///
    /// Never fails: unreadable storage is logged and reported as a miss.
    async fn get(&self, key: &TypeKey) -> Option<TypeInfo>;

    /// Record a schema for a key
    async fn set(&self, key: TypeKey, info: TypeInfo) -> Result<(), CacheError>;
}

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Entries held in memory
    pub entry_count: u64,
    /// Lookups answered from memory or storage
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
}

/// Type-schema cache
///
/// - Memory front: moka cache, no TTL; entries live for the whole session
/// - Backing store: one namespaced entry holding the whole [`SchemaMap`]
///
/// # Write behavior
///
/// `set` reads the whole persisted map, merges the new entry and writes the
/// map back. Writers sharing this instance are serialized, so concurrent
/// `set`s for different keys never drop each other. Separate processes
/// sharing one store still race, and the last writer wins.
#[derive(Debug)]
pub struct TypeSchemaCache<S> {
    store: S,
    memory: Cache<TypeKey, TypeInfo>,
    write_lock: Mutex<()>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<S: SchemaStore> TypeSchemaCache<S> {
    /// Create cache over a store with default capacity (10,000 entries)
    #[inline]
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_capacity(store, 10_000)
    }

    /// Create cache with a memory capacity
    #[must_use]
    pub fn with_capacity(store: S, max_capacity: u64) -> Self {
        Self {
            store,
            memory: Cache::new(max_capacity),
            write_lock: Mutex::new(()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Backing store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// All persisted entries
    ///
    /// # Errors
    /// - `CacheError::Store` if the store cannot be read
    /// - `CacheError::Serialization` if the persisted map is corrupt
    pub async fn entries(&self) -> Result<SchemaMap, CacheError> {
        self.load_map().await
    }

    /// Drop every entry, in memory and in storage
    ///
    /// # Errors
    /// - `CacheError::Store` if the store rejects the removal
    pub async fn clear(&self) -> Result<(), CacheError> {
        let _guard = self.write_lock.lock().await;
        self.store.clear().await?;
        self.memory.invalidate_all();
        tracing::info!(namespace = self.store.namespace(), "schema cache cleared");
        Ok(())
    }

    /// Get cache statistics
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.memory.entry_count(),
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    async fn load_map(&self) -> Result<SchemaMap, CacheError> {
        match self.store.load().await? {
            Some(raw) => Ok(serde_json::from_str(&raw)?),
            None => Ok(SchemaMap::new()),
        }
    }

    fn record(&self, hit: bool) {
        let counter = if hit { &self.hits } else { &self.misses };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

#[async_trait]
impl<S: SchemaStore> SchemaCache for TypeSchemaCache<S> {
    async fn get(&self, key: &TypeKey) -> Option<TypeInfo> {
        if let Some(info) = self.memory.get(key).await {
            tracing::trace!(%key, "schema cache hit (memory)");
            self.record(true);
            return Some(info);
        }

        let map = match self.load_map().await {
            Ok(map) => map,
            Err(e) => {
                tracing::warn!(%key, error = %e, "unreadable schema cache, treating as miss");
                self.record(false);
                return None;
            }
        };

        match map.get(key) {
            Some(info) => {
                tracing::debug!(%key, "schema cache hit (store)");
                self.memory.insert(key.clone(), info.clone()).await;
                self.record(true);
                Some(info.clone())
            }
            None => {
                tracing::debug!(%key, "schema cache miss");
                self.record(false);
                None
            }
        }
    }

    async fn set(&self, key: TypeKey, info: TypeInfo) -> Result<(), CacheError> {
        let _guard = self.write_lock.lock().await;

        let mut map = match self.load_map().await {
            Ok(map) => map,
            Err(CacheError::Serialization(e)) => {
                tracing::warn!(error = %e, "discarding corrupt schema cache");
                SchemaMap::new()
            }
            Err(e) => return Err(e),
        };

        map.insert(key.clone(), info.clone());
        self.store.save(serde_json::to_string(&map)?).await?;
        self.memory.insert(key.clone(), info).await;

        tracing::debug!(%key, entries = map.len(), "schema cached");
        Ok(())
    }
}
