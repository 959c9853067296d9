//! # Storage Layer
//!
//! This module defines the durable key-value substrate todos are written to.
//! The [`KeyValueStore`] trait has the shape of a browser's `localStorage`:
//! string keys, string values, three operations.
//!
//! ## Layers
//!
//! - **Backends** (this module): raw I/O. They know nothing about todos and
//!   report failures as [`BackendError`].
//! - **Adapter** ([`crate::storage`]): serializes the todo collection and turns
//!   backend failures into the user-facing [`crate::error::StorageError`] codes.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: production store, one file per key.
//! - [`mem_backend::MemBackend`]: in-memory store with failure injection,
//!   for testing logic without filesystem I/O.
//!
//! ## Storage Layout
//!
//! ```text
//! <data dir>/
//! ├── config.json         # Settings (see crate::config)
//! └── todos.json          # The whole todo collection under the "todos" key
//! ```
//!
//! Backends take `&self` everywhere. todoz is single-threaded, so backends use
//! `RefCell` where they need interior mutability and are not `Sync`.

use thiserror::Error;

pub mod fs_backend;
pub mod mem_backend;

#[derive(Error, Debug)]
pub enum BackendError {
    /// The store refused the write because it is full.
    #[error("storage quota exceeded")]
    QuotaExceeded,

    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Abstract interface for a durable string-to-string store.
pub trait KeyValueStore {
    /// Read the value at `key`. `Ok(None)` when the key is absent.
    fn get_item(&self, key: &str) -> Result<Option<String>, BackendError>;

    /// Write `value` at `key`, replacing any previous value.
    /// MUST be atomic: after an error the previous value is still intact.
    fn set_item(&self, key: &str, value: &str) -> Result<(), BackendError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove_item(&self, key: &str) -> Result<(), BackendError>;
}
