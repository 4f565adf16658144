//! Todo CRUD handlers: list, create, update, delete.
//!
//! Each handler maps its own store failure to a 500 and logs it with an
//! `op` field naming the statement kind.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{post, put};
use axum::{Json, Router};

use crate::api::dto::{CreateTodoRequest, UpdateTodoRequest};
use crate::api::extract::JsonBody;
use crate::app_state::AppState;
use crate::error::{ApiError, ErrorResponse, StoreError};
use crate::persistence::{NewTodo, Todo};

fn store_failure(op: &'static str, err: StoreError) -> ApiError {
    tracing::error!(op, error = %err, "store operation failed");
    ApiError::Store(err)
}

/// `GET /todos` — List every todo.
///
/// # Errors
///
/// Returns [`ApiError::Store`] if the query fails.
#[utoipa::path(
    get,
    path = "/todos",
    tag = "Todos",
    summary = "List todos",
    description = "Returns all todos ordered by ascending id. Empty array when there are none.",
    responses(
        (status = 200, description = "All todos", body = Vec<Todo>),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn list_todos(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let todos = state
        .store
        .list_all()
        .await
        .map_err(|e| store_failure("list", e))?;

    Ok(Json(todos))
}

/// `POST /todos` — Create a todo.
///
/// # Errors
///
/// Returns [`ApiError::InvalidRequest`] on a malformed body and
/// [`ApiError::Store`] if the insert fails.
#[utoipa::path(
    post,
    path = "/todos",
    tag = "Todos",
    summary = "Create a todo",
    description = "Inserts a todo. The store assigns `id` and `created_at`; `is_completed` always starts as false.",
    request_body = CreateTodoRequest,
    responses(
        (status = 201, description = "Todo created", body = Todo),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn create_todo(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateTodoRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let new_todo = NewTodo::from(req);
    let todo = state
        .store
        .insert(&new_todo)
        .await
        .map_err(|e| store_failure("insert", e))?;

    tracing::info!(id = todo.id, "todo created");
    Ok((StatusCode::CREATED, Json(todo)))
}

/// `PUT /todos/{id}` — Replace a todo's mutable fields.
///
/// Responds with the submitted body, not a re-read of the row: a request
/// for a missing id still succeeds.
///
/// # Errors
///
/// Returns [`ApiError::InvalidRequest`] on a malformed body and
/// [`ApiError::Store`] if the update fails.
#[utoipa::path(
    put,
    path = "/todos/{id}",
    tag = "Todos",
    summary = "Update a todo",
    description = "Overwrites number, category, content, env, expected, and is_completed of the todo with the given id, then echoes the request body.",
    params(
        ("id" = String, Path, description = "Todo id"),
    ),
    request_body = UpdateTodoRequest,
    responses(
        (status = 200, description = "Submitted todo echoed back", body = UpdateTodoRequest),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn update_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(req): JsonBody<UpdateTodoRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let matched = state
        .store
        .update(&id, &req.changes())
        .await
        .map_err(|e| store_failure("update", e))?;

    tracing::debug!(%id, matched, "todo updated");
    Ok(Json(req))
}

/// `DELETE /todos/{id}` — Remove a todo.
///
/// Idempotent: deleting a missing id still responds 204.
///
/// # Errors
///
/// Returns [`ApiError::Store`] if the delete fails.
#[utoipa::path(
    delete,
    path = "/todos/{id}",
    tag = "Todos",
    summary = "Delete a todo",
    description = "Removes the todo with the given id. Responds 204 whether or not a row matched.",
    params(
        ("id" = String, Path, description = "Todo id"),
    ),
    responses(
        (status = 204, description = "Todo deleted or already absent"),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn delete_todo(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let removed = state
        .store
        .delete(&id)
        .await
        .map_err(|e| store_failure("delete", e))?;

    tracing::debug!(%id, removed, "todo deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Todo routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/todos", post(create_todo).get(list_todos))
        .route("/todos/{id}", put(update_todo).delete(delete_todo))
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request};
    use futures_util::future::BoxFuture;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;
    use crate::persistence::{MemoryTodoStore, TodoChanges, TodoStore};

    #[derive(Debug)]
    struct FailingStore;

    impl TodoStore for FailingStore {
        fn list_all(&self) -> BoxFuture<'_, Result<Vec<Todo>, StoreError>> {
            Box::pin(async { Err(StoreError::new("connection refused")) })
        }

        fn insert<'a>(&'a self, _: &'a NewTodo) -> BoxFuture<'a, Result<Todo, StoreError>> {
            Box::pin(async { Err(StoreError::new("connection refused")) })
        }

        fn update<'a>(
            &'a self,
            _: &'a str,
            _: &'a TodoChanges,
        ) -> BoxFuture<'a, Result<u64, StoreError>> {
            Box::pin(async { Err(StoreError::new("connection refused")) })
        }

        fn delete<'a>(&'a self, _: &'a str) -> BoxFuture<'a, Result<u64, StoreError>> {
            Box::pin(async { Err(StoreError::new("connection refused")) })
        }
    }

    fn app(store: impl TodoStore + 'static) -> Router {
        routes().with_state(AppState::new(store))
    }

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<&str>,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())));
        let Ok(request) = request else {
            panic!("request build failed");
        };
        let Ok(response) = app.clone().oneshot(request).await;
        let status = response.status();
        let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
            panic!("body read failed");
        };
        if bytes.is_empty() {
            return (status, Value::Null);
        }
        let Ok(json) = serde_json::from_slice(&bytes) else {
            panic!("body is not json: {bytes:?}");
        };
        (status, json)
    }

    const SMOKE: &str =
        r#"{"number":"T1","category":"smoke","content":"check","env":"prod","expected":"ok"}"#;

    #[tokio::test]
    async fn list_is_empty_array_initially() {
        let app = app(MemoryTodoStore::new());
        let (status, body) = send(&app, Method::GET, "/todos", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn create_then_list_round_trip() {
        let app = app(MemoryTodoStore::new());
        let (status, created) = send(&app, Method::POST, "/todos", Some(SMOKE)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["id"], json!(1));
        assert_eq!(created["number"], json!("T1"));
        assert_eq!(created["is_completed"], json!(false));
        assert!(created["created_at"].as_str().is_some_and(|s| !s.is_empty()));

        let (status, listed) = send(&app, Method::GET, "/todos", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listed, json!([created]));
    }

    #[tokio::test]
    async fn create_forces_is_completed_false() {
        let app = app(MemoryTodoStore::new());
        let body = r#"{"number":"T1","category":"c","content":"c","env":"e","expected":"x","is_completed":true}"#;
        let (status, created) = send(&app, Method::POST, "/todos", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["is_completed"], json!(false));
    }

    #[tokio::test]
    async fn null_and_capitalized_fields_are_accepted() {
        let app = app(MemoryTodoStore::new());
        let body = r#"{"Number":"T1","category":null,"content":"c","env":"e","expected":"x"}"#;
        let (status, created) = send(&app, Method::POST, "/todos", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["number"], json!("T1"));
        assert_eq!(created["category"], json!(""));

        let body = r#"{"number":"X","category":"Y","content":"Z","env":"E","expected":"Ex","is_completed":null}"#;
        let (status, echoed) = send(&app, Method::PUT, "/todos/1", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(echoed["is_completed"], json!(false));
    }

    #[tokio::test]
    async fn malformed_body_is_rejected_without_insert() {
        let app = app(MemoryTodoStore::new());
        let (status, body) = send(&app, Method::POST, "/todos", Some("\"not json\"")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (status, body) = send(&app, Method::POST, "/todos", Some("not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());

        let (_, listed) = send(&app, Method::GET, "/todos", None).await;
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn missing_content_type_still_parses() {
        let app = app(MemoryTodoStore::new());
        let Ok(request) = Request::builder()
            .method(Method::POST)
            .uri("/todos")
            .body(Body::from(SMOKE))
        else {
            panic!("request build failed");
        };
        let Ok(response) = app.oneshot(request).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn update_overwrites_and_echoes() {
        let app = app(MemoryTodoStore::new());
        let (_, created) = send(&app, Method::POST, "/todos", Some(SMOKE)).await;
        let created_at = created["created_at"].clone();

        let body = r#"{"number":"X","category":"Y","content":"Z","env":"E","expected":"Ex","is_completed":true}"#;
        let (status, echoed) = send(&app, Method::PUT, "/todos/1", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            echoed,
            json!({"number":"X","category":"Y","content":"Z","env":"E","expected":"Ex","is_completed":true})
        );

        let (_, listed) = send(&app, Method::GET, "/todos", None).await;
        assert_eq!(
            listed,
            json!([{
                "id": 1,
                "number": "X",
                "category": "Y",
                "content": "Z",
                "env": "E",
                "expected": "Ex",
                "is_completed": true,
                "created_at": created_at,
            }])
        );
    }

    #[tokio::test]
    async fn update_of_missing_row_still_succeeds() {
        let app = app(MemoryTodoStore::new());
        let body = r#"{"number":"X","category":"Y","content":"Z","env":"E","expected":"Ex","is_completed":true}"#;
        let (status, echoed) = send(&app, Method::PUT, "/todos/999999", Some(body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(echoed["number"], json!("X"));

        let (_, listed) = send(&app, Method::GET, "/todos", None).await;
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn update_with_malformed_body_is_bad_request() {
        let app = app(MemoryTodoStore::new());
        let body = r#"{"is_completed":"yes"}"#;
        let (status, _) = send(&app, Method::PUT, "/todos/1", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn delete_is_idempotent() {
        let app = app(MemoryTodoStore::new());
        let _ = send(&app, Method::POST, "/todos", Some(SMOKE)).await;

        for _ in 0..2 {
            let (status, body) = send(&app, Method::DELETE, "/todos/1", None).await;
            assert_eq!(status, StatusCode::NO_CONTENT);
            assert_eq!(body, Value::Null);
        }

        let (_, listed) = send(&app, Method::GET, "/todos", None).await;
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn non_numeric_id_surfaces_store_error() {
        let app = app(MemoryTodoStore::new());
        let (status, body) = send(&app, Method::DELETE, "/todos/abc", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(
            body["error"]
                .as_str()
                .is_some_and(|m| m.contains("invalid input syntax"))
        );
    }

    #[tokio::test]
    async fn store_failures_map_to_500_with_message() {
        let app = app(FailingStore);
        let expected = json!({ "error": "connection refused" });

        let (status, body) = send(&app, Method::GET, "/todos", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, expected);

        let (status, body) = send(&app, Method::POST, "/todos", Some(SMOKE)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, expected);

        let (status, body) = send(&app, Method::PUT, "/todos/1", Some(SMOKE)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, expected);

        let (status, body) = send(&app, Method::DELETE, "/todos/1", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, expected);
    }

    #[tokio::test]
    async fn malformed_body_never_reaches_store() {
        let app = app(FailingStore);
        let (status, _) = send(&app, Method::POST, "/todos", Some("{")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
