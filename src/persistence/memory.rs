//! In-process store with the same observable semantics as the PostgreSQL
//! gateway.
//!
//! Ids start at 1 and only ever grow, rows are kept in ascending id order,
//! and a path id that is not an integer is rejected the way the database
//! rejects the cast. Nothing is persisted across restarts.

use chrono::Utc;
use futures_util::future::BoxFuture;
use tokio::sync::RwLock;

use super::TodoStore;
use super::models::{NewTodo, Todo, TodoChanges};
use crate::error::StoreError;

#[derive(Debug, Default)]
struct Table {
    last_id: i32,
    rows: Vec<Todo>,
}

/// Thread-safe in-memory `todos` table.
#[derive(Debug, Default)]
pub struct MemoryTodoStore {
    table: RwLock<Table>,
}

impl MemoryTodoStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Interprets a path id the way `CAST($1 AS INTEGER)` does.
fn parse_id(id: &str) -> Result<i32, StoreError> {
    id.trim().parse::<i32>().map_err(|_| {
        StoreError::new(format!("invalid input syntax for type integer: \"{id}\""))
    })
}

impl TodoStore for MemoryTodoStore {
    fn list_all(&self) -> BoxFuture<'_, Result<Vec<Todo>, StoreError>> {
        Box::pin(async move {
            let table = self.table.read().await;
            Ok(table.rows.clone())
        })
    }

    fn insert<'a>(&'a self, todo: &'a NewTodo) -> BoxFuture<'a, Result<Todo, StoreError>> {
        Box::pin(async move {
            let mut table = self.table.write().await;
            let id = table
                .last_id
                .checked_add(1)
                .ok_or_else(|| StoreError::new("nextval: reached maximum value of sequence"))?;
            table.last_id = id;

            let row = Todo {
                id,
                number: todo.number.clone(),
                category: todo.category.clone(),
                content: todo.content.clone(),
                env: todo.env.clone(),
                expected: todo.expected.clone(),
                is_completed: false,
                created_at: Utc::now(),
            };
            table.rows.push(row.clone());
            Ok(row)
        })
    }

    fn update<'a>(
        &'a self,
        id: &'a str,
        changes: &'a TodoChanges,
    ) -> BoxFuture<'a, Result<u64, StoreError>> {
        Box::pin(async move {
            let id = parse_id(id)?;
            let mut table = self.table.write().await;
            let Some(row) = table.rows.iter_mut().find(|row| row.id == id) else {
                return Ok(0);
            };
            row.number.clone_from(&changes.number);
            row.category.clone_from(&changes.category);
            row.content.clone_from(&changes.content);
            row.env.clone_from(&changes.env);
            row.expected.clone_from(&changes.expected);
            row.is_completed = changes.is_completed;
            Ok(1)
        })
    }

    fn delete<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<u64, StoreError>> {
        Box::pin(async move {
            let id = parse_id(id)?;
            let mut table = self.table.write().await;
            let before = table.rows.len();
            table.rows.retain(|row| row.id != id);
            Ok((before - table.rows.len()) as u64)
        })
    }
}
