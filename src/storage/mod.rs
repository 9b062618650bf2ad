//! Persistence of the working record in a durable key-value slot

mod file;

pub use file::FileStore;

use crate::error::StorageError;
use crate::state::FormRecord;
use std::collections::HashMap;

/// Fixed key holding the autosaved record
pub const STORAGE_KEY: &str = "formulario-cras-dados";

/// A durable string key-value store
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Process-local store, for embedding and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Whole-record save/load over a key-value store; last write wins
#[derive(Debug)]
pub struct Persistence<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> Persistence<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            key: STORAGE_KEY.to_string(),
        }
    }

    /// Overwrite the snapshot with the full record
    pub fn save(&mut self, record: &FormRecord) -> Result<(), StorageError> {
        let payload = serde_json::to_string(record)?;
        self.store.set(&self.key, &payload)
    }

    /// Read the snapshot back; absent or unreadable data counts as no data
    pub fn load(&self) -> Option<FormRecord> {
        let payload = match self.store.get(&self.key) {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(
                    key = %self.key,
                    error = %err,
                    "could not read saved form data"
                );
                return None;
            }
        };
        match serde_json::from_str(&payload) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::warn!(
                    key = %self.key,
                    error = %err,
                    "discarding malformed saved form data"
                );
                None
            }
        }
    }

    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.store.remove(&self.key)
    }

    #[cfg(test)]
    pub(crate) fn store(&self) -> &S {
        &self.store
    }
}
