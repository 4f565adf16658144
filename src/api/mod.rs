//! REST API layer: route handlers, DTOs, CORS policy, and router
//! composition.

pub mod dto;
pub mod extract;
pub mod handlers;

use std::time::Duration;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::app_state::AppState;
use crate::error::StartupError;

/// Preflight cache lifetime.
pub const CORS_MAX_AGE: Duration = Duration::from_secs(12 * 60 * 60);

/// OpenAPI document covering every REST endpoint.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "todo-api",
        description = "CRUD backend for the procedure checklist frontend."
    ),
    paths(
        handlers::todo::list_todos,
        handlers::todo::create_todo,
        handlers::todo::update_todo,
        handlers::todo::delete_todo,
        handlers::system::health_handler,
    ),
    tags(
        (name = "Todos", description = "Todo records"),
        (name = "System", description = "Service status"),
    )
)]
pub struct ApiDoc;

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = handlers::routes();

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    router
}

/// Builds the credentialed CORS policy for the given origin allow-list.
///
/// # Errors
///
/// Returns [`StartupError::InvalidConfig`] if an origin is the `*`
/// wildcard, which cannot be combined with credentials, or is not a valid
/// header value.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, StartupError> {
    let origins = origins
        .iter()
        .map(|origin| {
            if origin == "*" {
                return Err(StartupError::InvalidConfig(
                    "wildcard CORS origin is not allowed with credentials".to_string(),
                ));
            }
            HeaderValue::from_str(origin).map_err(|e| {
                StartupError::InvalidConfig(format!("invalid CORS origin {origin:?}: {e}"))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::ORIGIN, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_LENGTH])
        .allow_credentials(true)
        .max_age(CORS_MAX_AGE))
}

/// Wires routes, request tracing, CORS, and shared state into a servable
/// application.
pub fn build_app(state: AppState, cors: CorsLayer) -> Router {
    build_router()
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
