//! Read-only projections of the todo collection for display.
//!
//! Nothing here is persisted. The stored collection keeps insertion order
//! (newest first); lists are rendered sorted by `created_at` so imported or
//! hand-edited data still shows in a sensible order.
//!
//! ## Display Indexes
//!
//! The CLI refers to todos by their 1-based position in the sorted list
//! (`todoz toggle 2`). Indexes are recomputed on every run, so they are only
//! stable while the collection is unchanged. A todo can also be selected by its
//! UUID or any unambiguous UUID prefix.

use crate::error::{Result, TodozError};
use crate::model::Todo;
use uuid::Uuid;

/// Aggregate counts shown next to the list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodoStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

impl TodoStats {
    pub fn from_todos(todos: &[Todo]) -> Self {
        let total = todos.len();
        let completed = todos.iter().filter(|t| t.completed).count();
        Self {
            total,
            completed,
            pending: total - completed,
        }
    }
}

/// Todos ordered newest first. Ties keep their stored order.
pub fn sorted_newest_first(todos: &[Todo]) -> Vec<&Todo> {
    let mut sorted: Vec<&Todo> = todos.iter().collect();
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayTodo<'a> {
    pub index: usize,
    pub todo: &'a Todo,
}

/// Assigns 1-based display indexes over the newest-first order.
pub fn index_todos(todos: &[Todo]) -> Vec<DisplayTodo<'_>> {
    sorted_newest_first(todos)
        .into_iter()
        .enumerate()
        .map(|(i, todo)| DisplayTodo { index: i + 1, todo })
        .collect()
}

/// Resolves a user selector (display index, UUID or UUID prefix) to an id.
pub fn resolve_selector(todos: &[Todo], selector: &str) -> Result<Uuid> {
    let selector = selector.trim();

    if let Ok(n) = selector.parse::<usize>() {
        return index_todos(todos)
            .into_iter()
            .find(|dt| dt.index == n)
            .map(|dt| dt.todo.id)
            .ok_or_else(|| TodozError::Api(format!("Index {} not found", n)));
    }

    if let Ok(id) = Uuid::parse_str(selector) {
        return todos
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.id)
            .ok_or_else(|| TodozError::Api(format!("Todo {} not found", id)));
    }

    let prefix = selector.to_ascii_lowercase();
    if prefix.is_empty() || !prefix.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
        return Err(TodozError::Api(format!(
            "Invalid selector: {} (expected an index or id)",
            selector
        )));
    }

    let mut matches = todos
        .iter()
        .filter(|t| t.id.to_string().starts_with(&prefix));
    match (matches.next(), matches.next()) {
        (Some(todo), None) => Ok(todo.id),
        (None, _) => Err(TodozError::Api(format!(
            "No todo id starts with {}",
            selector
        ))),
        (Some(_), Some(_)) => Err(TodozError::Api(format!(
            "Id prefix {} is ambiguous",
            selector
        ))),
    }
}
