//! Persistent key-value stores for the schema map
//!
//! A store holds exactly one namespaced entry: the serialized
//! `TypeKey → TypeInfo` map. It is read and written as a whole.

use crate::error::StoreError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt::Debug;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Namespace under which the schema map is persisted
pub const NAMESPACE: &str = "node-keys";

/// Backing store for the persisted schema map
#[async_trait]
pub trait SchemaStore: Send + Sync + Debug {
    /// Namespace of the persisted entry
    fn namespace(&self) -> &str;

    /// Read the serialized map, `None` if nothing was persisted yet
    async fn load(&self) -> Result<Option<String>, StoreError>;

    /// Replace the serialized map
    async fn save(&self, contents: String) -> Result<(), StoreError>;

    /// Remove the persisted entry
    async fn clear(&self) -> Result<(), StoreError>;
}

/// Process-local store
///
/// Clones share the same slots, so two caches built over clones of one
/// store see each other's writes the way two tabs share browser storage.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    namespace: String,
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    /// Create empty store under the default namespace
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_namespace(NAMESPACE)
    }

    /// Create empty store under a custom namespace
    #[must_use]
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            slots: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Overwrite the raw persisted entry
    pub fn put_raw(&self, contents: impl Into<String>) {
        self.slots
            .lock()
            .insert(self.namespace.clone(), contents.into());
    }

    /// Raw persisted entry
    #[must_use]
    pub fn raw(&self) -> Option<String> {
        self.slots.lock().get(&self.namespace).cloned()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SchemaStore for MemoryStore {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.raw())
    }

    async fn save(&self, contents: String) -> Result<(), StoreError> {
        self.put_raw(contents);
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.slots.lock().remove(&self.namespace);
        Ok(())
    }
}

/// File-backed store: `<dir>/<namespace>.json`
///
/// Writes go to a sibling temp file first and are renamed into place, so a
/// reader never observes a half-written map.
#[derive(Debug, Clone)]
pub struct FileStore {
    namespace: String,
    path: PathBuf,
}

impl FileStore {
    /// Store under the default namespace inside `dir`
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self::with_namespace(dir, NAMESPACE)
    }

    /// Store under a custom namespace inside `dir`
    #[must_use]
    pub fn with_namespace(dir: impl AsRef<Path>, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let path = dir.as_ref().join(format!("{namespace}.json"));
        Self { namespace, path }
    }

    /// Path of the backing file
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl SchemaStore for FileStore {
    fn namespace(&self) -> &str {
        &self.namespace
    }

    async fn load(&self) -> Result<Option<String>, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::io_error(&self.path, e)),
        }
    }

    async fn save(&self, contents: String) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::io_error(parent, e))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, contents)
            .await
            .map_err(|e| StoreError::io_error(&tmp, e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StoreError::io_error(&self.path, e))
    }

    async fn clear(&self) -> Result<(), StoreError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::io_error(&self.path, e)),
        }
    }
}
