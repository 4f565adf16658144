//! Row models for the `todos` table.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// A full row from the `todos` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Todo {
    /// Store-assigned, auto-incrementing primary key.
    pub id: i32,
    /// Client-supplied step number.
    pub number: String,
    /// Free-form category.
    pub category: String,
    /// Main payload: what to do.
    pub content: String,
    /// Execution environment label.
    pub env: String,
    /// Expected result description.
    pub expected: String,
    /// Completion flag, `false` at creation.
    pub is_completed: bool,
    /// Insertion timestamp, assigned by the store and never updated.
    pub created_at: DateTime<Utc>,
}

/// Client-supplied columns of a row about to be inserted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTodo {
    /// Step number.
    pub number: String,
    /// Category.
    pub category: String,
    /// Content.
    pub content: String,
    /// Environment label.
    pub env: String,
    /// Expected result.
    pub expected: String,
}

/// Full replacement of the client-mutable columns of an existing row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoChanges {
    /// Step number.
    pub number: String,
    /// Category.
    pub category: String,
    /// Content.
    pub content: String,
    /// Environment label.
    pub env: String,
    /// Expected result.
    pub expected: String,
    /// Completion flag.
    pub is_completed: bool,
}
