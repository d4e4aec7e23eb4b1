//! Where a serialized cart lives between requests.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use thiserror::Error;
use tower_sessions::Session;

/// Errors raised by a cart storage backend.
#[derive(Debug, Error)]
pub enum CartStorageError {
    /// The session store failed to load or save.
    #[error("Session store error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// The cart could not be serialized.
    #[error("Cart serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The in-memory store lock was poisoned.
    #[error("Cart storage lock poisoned")]
    Poisoned,
}

/// A string key-value store for the persisted cart blob.
pub trait CartStorage {
    /// Read the blob stored under `key`, if any.
    fn read(&self, key: &str) -> impl Future<Output = Result<Option<String>, CartStorageError>> + Send;

    /// Replace the blob stored under `key`.
    fn write(&self, key: &str, value: String) -> impl Future<Output = Result<(), CartStorageError>> + Send;
}

/// Cart storage backed by the visitor's `tower-sessions` session.
#[derive(Debug, Clone)]
pub struct SessionCartStorage {
    session: Session,
}

impl SessionCartStorage {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl CartStorage for SessionCartStorage {
    async fn read(&self, key: &str) -> Result<Option<String>, CartStorageError> {
        Ok(self.session.get::<String>(key).await?)
    }

    async fn write(&self, key: &str, value: String) -> Result<(), CartStorageError> {
        self.session.insert(key, value).await?;
        Ok(())
    }
}

/// Process-local cart storage. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryCartStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryCartStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a raw blob, bypassing the cart store.
    ///
    /// # Errors
    ///
    /// Returns an error if the lock is poisoned.
    pub fn insert_raw(&self, key: &str, value: &str) -> Result<(), CartStorageError> {
        self.entries
            .lock()
            .map_err(|_| CartStorageError::Poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

impl CartStorage for MemoryCartStorage {
    async fn read(&self, key: &str) -> Result<Option<String>, CartStorageError> {
        let entries = self.entries.lock().map_err(|_| CartStorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    async fn write(&self, key: &str, value: String) -> Result<(), CartStorageError> {
        self.entries
            .lock()
            .map_err(|_| CartStorageError::Poisoned)?
            .insert(key.to_string(), value);
        Ok(())
    }
}
