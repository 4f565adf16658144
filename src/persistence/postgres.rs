//! PostgreSQL implementation of the persistence gateway.

use std::time::Duration;

use chrono::NaiveDateTime;
use futures_util::future::BoxFuture;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use super::TodoStore;
use super::models::{NewTodo, Todo, TodoChanges};
use crate::config::DatabaseConfig;
use crate::error::{StartupError, StoreError};

/// Idempotent schema statement run before the first request is served.
pub const SCHEMA: &str = "\
CREATE TABLE IF NOT EXISTS todos (
    id SERIAL PRIMARY KEY,
    number TEXT,
    category TEXT,
    content TEXT,
    env TEXT,
    expected TEXT,
    is_completed BOOLEAN DEFAULT false,
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

type TodoRow = (
    i32,
    String,
    String,
    String,
    String,
    String,
    bool,
    NaiveDateTime,
);

/// PostgreSQL-backed store using `sqlx::PgPool`.
///
/// The pool is the only shared state; it is cloned into every handler and
/// never reassigned.
#[derive(Debug, Clone)]
pub struct PostgresTodoStore {
    pool: PgPool,
}

impl PostgresTodoStore {
    /// Wraps an existing connection pool. Does not touch the schema.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool with the given settings and ensures the `todos` table
    /// exists.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::Connect`] if the store cannot be reached
    /// (including a malformed or empty connection string) and
    /// [`StartupError::Schema`] if the table cannot be created.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, StartupError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(StartupError::Connect)?;

        let store = Self::new(pool);
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Runs the idempotent `CREATE TABLE IF NOT EXISTS` statement.
    ///
    /// # Errors
    ///
    /// Returns [`StartupError::Schema`] on database failure.
    pub async fn ensure_schema(&self) -> Result<(), StartupError> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(StartupError::Schema)?;
        tracing::debug!("todos table ensured");
        Ok(())
    }

    async fn fetch_all(&self) -> Result<Vec<Todo>, StoreError> {
        let rows = sqlx::query_as::<_, TodoRow>(
            "SELECT id, number, category, content, env, expected, is_completed, created_at \
             FROM todos ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(
                |(id, number, category, content, env, expected, is_completed, created_at)| Todo {
                    id,
                    number,
                    category,
                    content,
                    env,
                    expected,
                    is_completed,
                    created_at: created_at.and_utc(),
                },
            )
            .collect())
    }

    async fn insert_one(&self, todo: &NewTodo) -> Result<Todo, StoreError> {
        let (id, is_completed, created_at) = sqlx::query_as::<_, (i32, bool, NaiveDateTime)>(
            "INSERT INTO todos (number, category, content, env, expected) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING id, is_completed, created_at",
        )
        .bind(&todo.number)
        .bind(&todo.category)
        .bind(&todo.content)
        .bind(&todo.env)
        .bind(&todo.expected)
        .fetch_one(&self.pool)
        .await?;

        Ok(Todo {
            id,
            number: todo.number.clone(),
            category: todo.category.clone(),
            content: todo.content.clone(),
            env: todo.env.clone(),
            expected: todo.expected.clone(),
            is_completed,
            created_at: created_at.and_utc(),
        })
    }

    async fn update_one(&self, id: &str, changes: &TodoChanges) -> Result<u64, StoreError> {
        let result = sqlx::query(
            "UPDATE todos \
             SET number = $1, category = $2, content = $3, env = $4, expected = $5, is_completed = $6 \
             WHERE id = CAST($7 AS INTEGER)",
        )
        .bind(&changes.number)
        .bind(&changes.category)
        .bind(&changes.content)
        .bind(&changes.env)
        .bind(&changes.expected)
        .bind(changes.is_completed)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn delete_one(&self, id: &str) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM todos WHERE id = CAST($1 AS INTEGER)")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

impl TodoStore for PostgresTodoStore {
    fn list_all(&self) -> BoxFuture<'_, Result<Vec<Todo>, StoreError>> {
        Box::pin(self.fetch_all())
    }

    fn insert<'a>(&'a self, todo: &'a NewTodo) -> BoxFuture<'a, Result<Todo, StoreError>> {
        Box::pin(self.insert_one(todo))
    }

    fn update<'a>(
        &'a self,
        id: &'a str,
        changes: &'a TodoChanges,
    ) -> BoxFuture<'a, Result<u64, StoreError>> {
        Box::pin(self.update_one(id, changes))
    }

    fn delete<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<u64, StoreError>> {
        Box::pin(self.delete_one(id))
    }
}
