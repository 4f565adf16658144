//! Error types for request handling, persistence, and startup.
//!
//! [`ApiError`] is the per-request error: each variant maps to an HTTP
//! status code and renders as a JSON body of the form
//! `{"error": "<message>"}`. [`StoreError`] carries a store fault message
//! verbatim. [`StartupError`] covers everything that must stop the process
//! before a request is served.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// JSON error response body.
///
/// ```json
/// { "error": "error returned from database: relation \"todos\" does not exist" }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable failure message.
    pub error: String,
}

/// Failure surfaced by the relational store during a query or execute call.
///
/// The message is the driver's own, unmodified.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct StoreError(String);

impl StoreError {
    /// Creates a store error with the given message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }

    /// Returns the underlying message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self(err.to_string())
    }
}

/// Per-request error with HTTP status code mapping.
///
/// | Variant          | HTTP Status               |
/// |------------------|---------------------------|
/// | `InvalidRequest` | 400 Bad Request           |
/// | `Store`          | 500 Internal Server Error |
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request body could not be read or bound to the expected shape.
    #[error("{0}")]
    InvalidRequest(String),

    /// The store rejected or failed the statement.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: self.to_string(),
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

/// Fatal condition raised while bringing the service up.
///
/// None of these are retried: the binary logs the error and exits.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// A configuration value could not be parsed.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The store could not be reached with the configured connection string.
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    /// The schema statement failed.
    #[error("failed to create schema: {0}")]
    Schema(#[source] sqlx::Error),
}
