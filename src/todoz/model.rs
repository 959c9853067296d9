use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single task.
///
/// Serialized with the field names the stored collection has always used:
/// `id`, `text`, `completed`, `createdAt` (milliseconds since the Unix epoch).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
}

impl Todo {
    /// Builds a fresh, incomplete todo. `text` is stored as given; callers trim.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            completed: false,
            created_at: Utc::now().timestamp_millis(),
        }
    }

    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.created_at)
    }

    /// Returns a copy with the patch merged in. `id` and `created_at` never change.
    pub fn patched(&self, patch: &TodoPatch) -> Self {
        Self {
            id: self.id,
            text: patch.text.clone().unwrap_or_else(|| self.text.clone()),
            completed: patch.completed.unwrap_or(self.completed),
            created_at: self.created_at,
        }
    }
}

/// Partial update for a todo. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub text: Option<String>,
    pub completed: Option<bool>,
}

impl TodoPatch {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            completed: None,
        }
    }

    pub fn completed(completed: bool) -> Self {
        Self {
            text: None,
            completed: Some(completed),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.completed.is_none()
    }
}
