//! Persistence gateway: the `todos` table and the statements run against it.
//!
//! [`TodoStore`] is the seam the request handlers talk to. The production
//! implementation is [`PostgresTodoStore`], backed by `sqlx::PgPool`;
//! [`MemoryTodoStore`] mirrors its observable behaviour in-process.
//!
//! Every operation is a single statement: no batching, no transactions
//! spanning calls, no retries.

pub mod memory;
pub mod models;
pub mod postgres;

use std::fmt;

use futures_util::future::BoxFuture;

pub use memory::MemoryTodoStore;
pub use models::{NewTodo, Todo, TodoChanges};
pub use postgres::PostgresTodoStore;

use crate::error::StoreError;

/// Operations the request router needs from the store.
///
/// The `id` arguments of [`update`](TodoStore::update) and
/// [`delete`](TodoStore::delete) are the raw path segment; the store is
/// responsible for interpreting it as an integer key and fails with a
/// [`StoreError`] when it cannot.
pub trait TodoStore: Send + Sync + fmt::Debug {
    /// Returns every record ordered by ascending `id`.
    fn list_all(&self) -> BoxFuture<'_, Result<Vec<Todo>, StoreError>>;

    /// Inserts a record and returns it with the store-assigned `id`,
    /// `is_completed` default, and `created_at`.
    fn insert<'a>(&'a self, todo: &'a NewTodo) -> BoxFuture<'a, Result<Todo, StoreError>>;

    /// Overwrites every client-mutable column of the row matching `id`.
    ///
    /// Returns the number of matched rows; zero is not an error.
    fn update<'a>(
        &'a self,
        id: &'a str,
        changes: &'a TodoChanges,
    ) -> BoxFuture<'a, Result<u64, StoreError>>;

    /// Removes the row matching `id`.
    ///
    /// Returns the number of removed rows; zero is not an error.
    fn delete<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<u64, StoreError>>;
}
