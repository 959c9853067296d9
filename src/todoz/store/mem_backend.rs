use super::{BackendError, KeyValueStore};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::io;

/// Which failure a [`MemBackend`] should simulate on writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteFailure {
    /// Writes fail with `QuotaExceeded`; the probe key still fits.
    Quota,
    /// Every write fails, including the availability probe.
    Unavailable,
    /// Writes to real keys fail with an I/O error; the probe succeeds.
    Io,
}

/// In-memory storage backend for testing. Single-threaded: state lives in
/// `RefCell`/`Cell` behind the `&self` trait methods.
#[derive(Default)]
pub struct MemBackend {
    items: RefCell<HashMap<String, String>>,
    quota_bytes: Option<usize>,
    write_failure: Cell<Option<WriteFailure>>,
    read_failure: Cell<bool>,
    writes: Cell<usize>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limit the total size of stored keys and values.
    pub fn with_quota(mut self, bytes: usize) -> Self {
        self.quota_bytes = Some(bytes);
        self
    }

    /// Seed a raw value, bypassing quota and failure simulation.
    pub fn with_item(self, key: &str, value: &str) -> Self {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Enable or disable write failure simulation.
    pub fn fail_writes(&self, failure: Option<WriteFailure>) {
        self.write_failure.set(failure);
    }

    /// Make every read fail with an I/O error.
    pub fn fail_reads(&self, fail: bool) {
        self.read_failure.set(fail);
    }

    /// Number of successful `set_item` calls, probe writes included.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    /// Raw value at `key`, ignoring failure simulation.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.items
            .borrow()
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum()
    }
}

impl KeyValueStore for MemBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, BackendError> {
        if self.read_failure.get() {
            return Err(BackendError::Io(io::Error::other("Simulated read error")));
        }
        Ok(self.items.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), BackendError> {
        let is_probe = key == crate::storage::PROBE_KEY;
        match self.write_failure.get() {
            Some(WriteFailure::Unavailable) => {
                return Err(BackendError::Unavailable("Simulated outage".to_string()));
            }
            Some(WriteFailure::Quota) if !is_probe => return Err(BackendError::QuotaExceeded),
            Some(WriteFailure::Io) if !is_probe => {
                return Err(BackendError::Io(io::Error::other("Simulated write error")));
            }
            _ => {}
        }

        if let Some(quota) = self.quota_bytes
            && self.used_bytes_without(key) + key.len() + value.len() > quota
        {
            return Err(BackendError::QuotaExceeded);
        }

        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), BackendError> {
        if self.write_failure.get() == Some(WriteFailure::Unavailable) {
            return Err(BackendError::Unavailable("Simulated outage".to_string()));
        }
        self.items.borrow_mut().remove(key);
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::Todo;
    use crate::validation::STORAGE_KEY;

    /// A backend pre-populated with `count` todos under the default key,
    /// newest first, with strictly decreasing timestamps.
    pub fn backend_with_todos(count: usize) -> (MemBackend, Vec<Todo>) {
        let todos: Vec<Todo> = (0..count)
            .map(|i| {
                let mut todo = Todo::new(format!("Test todo {}", i + 1));
                todo.created_at = 1_700_000_000_000 - i as i64 * 1_000;
                todo
            })
            .collect();
        let raw = serde_json::to_string(&todos).expect("fixture todos serialize");
        (MemBackend::new().with_item(STORAGE_KEY, &raw), todos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let backend = MemBackend::new();
        backend.set_item("k", "v").unwrap();
        assert_eq!(backend.get_item("k").unwrap(), Some("v".to_string()));
        backend.remove_item("k").unwrap();
        assert_eq!(backend.get_item("k").unwrap(), None);
        assert_eq!(backend.writes(), 1);
    }

    #[test]
    fn quota_counts_keys_and_values() {
        let backend = MemBackend::new().with_quota(10);
        backend.set_item("ab", "12345678").unwrap();
        assert!(matches!(
            backend.set_item("c", "1"),
            Err(BackendError::QuotaExceeded)
        ));
        // Replacing an existing key only counts the new value.
        backend.set_item("ab", "1234").unwrap();
    }

    #[test]
    fn quota_failure_lets_probe_through() {
        let backend = MemBackend::new();
        backend.fail_writes(Some(WriteFailure::Quota));
        assert!(matches!(
            backend.set_item("todos", "[]"),
            Err(BackendError::QuotaExceeded)
        ));
        backend.set_item(crate::storage::PROBE_KEY, "test").unwrap();
    }

    #[test]
    fn unavailable_fails_everything() {
        let backend = MemBackend::new();
        backend.fail_writes(Some(WriteFailure::Unavailable));
        assert!(backend.set_item(crate::storage::PROBE_KEY, "test").is_err());
        assert!(backend.remove_item("todos").is_err());
    }

    #[test]
    fn failed_write_keeps_previous_value() {
        let backend = MemBackend::new().with_item("todos", "[]");
        backend.fail_writes(Some(WriteFailure::Io));
        assert!(backend.set_item("todos", "[1]").is_err());
        assert_eq!(backend.raw("todos"), Some("[]".to_string()));
    }
}
