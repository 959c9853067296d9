//! # Todo Storage Adapter
//!
//! Persists the whole todo collection as one JSON array under a single key of a
//! [`KeyValueStore`]. The adapter owns no state: it borrows a backend and
//! translates between `Vec<Todo>` and the stored string.
//!
//! ## Failure Policy
//!
//! - **Saves** either write the entire collection or fail with exactly one
//!   [`StorageError`]. Classification order: capacity exhaustion is
//!   `QUOTA_EXCEEDED`; otherwise, if the availability probe fails, the store is
//!   `UNAVAILABLE`; anything else is `SAVE_ERROR`.
//! - **Loads** never fail on data: a missing key, unparseable JSON or a value
//!   that is not an array all read as "no todos yet". Array entries that are not
//!   todos are dropped one by one.
//! - **Clears** are best-effort and silent.

use crate::error::{StorageError, StorageErrorCode};
use crate::model::Todo;
use crate::store::{BackendError, KeyValueStore};
use crate::validation::STORAGE_KEY;
use tracing::{debug, warn};

/// Throwaway key written and removed by the availability probe.
pub const PROBE_KEY: &str = "__storage_test__";

pub struct TodoStorage<'a, B: KeyValueStore + ?Sized> {
    backend: &'a B,
}

impl<'a, B: KeyValueStore + ?Sized> TodoStorage<'a, B> {
    pub fn new(backend: &'a B) -> Self {
        Self { backend }
    }

    /// Probes the backend with a write and a delete. Never fails.
    pub fn is_storage_available(&self) -> bool {
        let probe = self
            .backend
            .set_item(PROBE_KEY, "test")
            .and_then(|_| self.backend.remove_item(PROBE_KEY));
        if let Err(e) = probe {
            debug!(error = %e, "storage probe failed");
            return false;
        }
        true
    }

    pub fn save_todos(&self, todos: &[Todo]) -> Result<(), StorageError> {
        self.save_todos_at(todos, STORAGE_KEY)
    }

    pub fn save_todos_at(&self, todos: &[Todo], key: &str) -> Result<(), StorageError> {
        match serde_json::to_string(todos) {
            Ok(serialized) => self.save_serialized_at(&serialized, key),
            Err(e) => {
                warn!(error = %e, "failed to serialize todos");
                Err(self.classify_failure())
            }
        }
    }

    /// Writes an already serialized collection at `key`, with the same failure
    /// classification as [`Self::save_todos_at`].
    pub fn save_serialized_at(&self, serialized: &str, key: &str) -> Result<(), StorageError> {
        match self.backend.set_item(key, serialized) {
            Ok(()) => {
                debug!(key, bytes = serialized.len(), "todos saved");
                Ok(())
            }
            Err(BackendError::QuotaExceeded) => {
                Err(StorageError::new(StorageErrorCode::QuotaExceeded))
            }
            Err(e) => {
                debug!(key, error = %e, "todo write failed");
                Err(self.classify_failure())
            }
        }
    }

    fn classify_failure(&self) -> StorageError {
        if self.is_storage_available() {
            StorageError::new(StorageErrorCode::SaveError)
        } else {
            StorageError::new(StorageErrorCode::Unavailable)
        }
    }

    pub fn load_todos(&self) -> Vec<Todo> {
        self.load_todos_at(STORAGE_KEY)
    }

    /// Reads the collection at `key`, degrading every failure to an empty list.
    pub fn load_todos_at(&self, key: &str) -> Vec<Todo> {
        self.try_load_todos_at(key).unwrap_or_default()
    }

    /// Like [`Self::load_todos_at`], but a backend read failure is reported
    /// instead of reading as empty: `UNAVAILABLE` when the probe also fails,
    /// `LOAD_ERROR` otherwise. A successful read writes nothing. Data-shape
    /// problems still degrade to an empty list.
    pub fn try_load_todos_at(&self, key: &str) -> Result<Vec<Todo>, StorageError> {
        let stored = match self.backend.get_item(key) {
            Ok(Some(stored)) if !stored.is_empty() => stored,
            Ok(_) => return Ok(Vec::new()),
            Err(e) => {
                warn!(key, error = %e, "failed to read todos");
                if !self.is_storage_available() {
                    return Err(StorageError::new(StorageErrorCode::Unavailable));
                }
                return Err(StorageError::new(StorageErrorCode::LoadError));
            }
        };

        Ok(parse_todos(key, &stored))
    }

    pub fn clear_todos(&self) {
        self.clear_todos_at(STORAGE_KEY)
    }

    pub fn clear_todos_at(&self, key: &str) {
        if let Err(e) = self.backend.remove_item(key) {
            debug!(key, error = %e, "ignoring failure to clear todos");
        }
    }
}

fn parse_todos(key: &str, stored: &str) -> Vec<Todo> {
    let parsed: serde_json::Value = match serde_json::from_str(stored) {
        Ok(value) => value,
        Err(e) => {
            warn!(key, error = %e, "stored todos are not valid JSON, starting empty");
            return Vec::new();
        }
    };

    let serde_json::Value::Array(entries) = parsed else {
        warn!(key, "stored todos are not an array, starting empty");
        return Vec::new();
    };

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(position, entry)| match serde_json::from_value(entry) {
            Ok(todo) => Some(todo),
            Err(e) => {
                warn!(key, position, error = %e, "skipping malformed todo");
                None
            }
        })
        .collect()
}
