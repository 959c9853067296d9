//! # Todo State Manager
//!
//! [`TodoManager`] is the single owner of the todo collection for one
//! application session. UIs read snapshots through [`TodoManager::todos`] and
//! [`TodoManager::error`] and express intents through the mutation methods;
//! they never touch the collection or the store directly.
//!
//! ## Mutation Protocol
//!
//! Every mutation (add, update, delete, toggle) runs the same steps:
//!
//! 1. Compute the candidate collection from the current one.
//! 2. Swap it in, keeping the previous collection.
//! 3. Persist the candidate through [`TodoStorage`].
//! 4. On success, clear the error. On failure, swap the previous collection
//!    back and record the failure's message.
//!
//! Mutations take `&mut self`, so one mutation always resolves before the next
//! begins. A multi-threaded host must put the manager behind a single lock.
//!
//! ## Errors
//!
//! Nothing is returned as an error. Storage failures become the fixed message
//! of their [`crate::error::StorageErrorCode`]; a collection that cannot be
//! serialized becomes a short message per operation. The UI shows [`TodoManager::error`] and may dismiss it with
//! [`TodoManager::clear_error`].

use crate::error::{Result, TodozError};
use crate::model::{Todo, TodoPatch};
use crate::storage::TodoStorage;
use crate::store::KeyValueStore;
use crate::validation::{STORAGE_KEY, TodoConstraints};
use tracing::{debug, warn};
use uuid::Uuid;

const ADD_FAILED: &str = "Failed to save todo";
const UPDATE_FAILED: &str = "Failed to update todo";
const DELETE_FAILED: &str = "Failed to delete todo";

/// What a mutation call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// Nothing to do; no write was attempted.
    Skipped,
    /// The change was persisted.
    Committed,
    /// Persisting failed and the change was undone. See [`TodoManager::error`].
    RolledBack,
}

pub struct TodoManager<B: KeyValueStore> {
    backend: B,
    storage_key: String,
    constraints: TodoConstraints,
    todos: Vec<Todo>,
    error: Option<String>,
}

impl<B: KeyValueStore> TodoManager<B> {
    /// Opens a session on `backend` with the default key and text limits.
    pub fn new(backend: B) -> Self {
        Self::with_options(backend, STORAGE_KEY, TodoConstraints::default())
    }

    /// Opens a session and loads the stored collection.
    ///
    /// An unusable store is not fatal: the session starts empty with
    /// [`Self::error`] set.
    pub fn with_options(
        backend: B,
        storage_key: impl Into<String>,
        constraints: TodoConstraints,
    ) -> Self {
        let mut manager = Self {
            backend,
            storage_key: storage_key.into(),
            constraints,
            todos: Vec::new(),
            error: None,
        };
        manager.load();
        manager
    }

    /// Reads the stored collection. Opening never writes, so a store that is
    /// full or read-only still shows what it holds.
    fn load(&mut self) {
        match TodoStorage::new(&self.backend).try_load_todos_at(&self.storage_key) {
            Ok(todos) => {
                debug!(key = %self.storage_key, count = todos.len(), "todos loaded");
                self.todos = todos;
            }
            Err(e) => {
                warn!(key = %self.storage_key, error = %e, "starting with no todos");
                self.todos = Vec::new();
                self.error = Some(e.message().to_string());
            }
        }
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn find(&self, id: &Uuid) -> Option<&Todo> {
        self.todos.iter().find(|t| &t.id == id)
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn constraints(&self) -> TodoConstraints {
        self.constraints
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Adds a todo at the head of the collection.
    ///
    /// Skipped when the text fails validation. The stored text is trimmed.
    pub fn add_todo(&mut self, text: &str) -> Mutation {
        if !self.constraints.accepts(text) {
            debug!("rejected todo text");
            return Mutation::Skipped;
        }

        let todo = Todo::new(text.trim());
        let mut candidate = Vec::with_capacity(self.todos.len() + 1);
        candidate.push(todo);
        candidate.extend(self.todos.iter().cloned());
        self.apply(candidate, ADD_FAILED)
    }

    /// Merges `patch` into the todo with `id`.
    ///
    /// Text is written as given, without validation. Callers validate edits
    /// before submitting them.
    pub fn update_todo(&mut self, id: &Uuid, patch: &TodoPatch) -> Mutation {
        if self.find(id).is_none() {
            return Mutation::Skipped;
        }

        let candidate = self
            .todos
            .iter()
            .map(|t| if &t.id == id { t.patched(patch) } else { t.clone() })
            .collect();
        self.apply(candidate, UPDATE_FAILED)
    }

    /// Removes the todo with `id`. The collection is written even when no todo
    /// matched.
    pub fn delete_todo(&mut self, id: &Uuid) -> Mutation {
        let candidate = self
            .todos
            .iter()
            .filter(|t| &t.id != id)
            .cloned()
            .collect();
        self.apply(candidate, DELETE_FAILED)
    }

    pub fn toggle_todo(&mut self, id: &Uuid) -> Mutation {
        if self.find(id).is_none() {
            return Mutation::Skipped;
        }

        let candidate = self
            .todos
            .iter()
            .map(|t| {
                if &t.id == id {
                    t.patched(&TodoPatch::completed(!t.completed))
                } else {
                    t.clone()
                }
            })
            .collect();
        self.apply(candidate, UPDATE_FAILED)
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    fn apply(&mut self, candidate: Vec<Todo>, fallback: &str) -> Mutation {
        let previous = std::mem::replace(&mut self.todos, candidate);

        match self.persist() {
            Ok(()) => {
                self.error = None;
                Mutation::Committed
            }
            Err(e) => {
                warn!(key = %self.storage_key, error = %e, "rolling back todo change");
                self.todos = previous;
                self.error = Some(failure_message(&e, fallback));
                Mutation::RolledBack
            }
        }
    }

    fn persist(&self) -> Result<()> {
        let serialized = serde_json::to_string(&self.todos)?;
        TodoStorage::new(&self.backend).save_serialized_at(&serialized, &self.storage_key)?;
        Ok(())
    }
}

fn failure_message(err: &TodozError, fallback: &str) -> String {
    match err {
        TodozError::Storage(e) => e.message().to_string(),
        _ => fallback.to_string(),
    }
}
