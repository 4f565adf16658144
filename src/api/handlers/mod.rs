//! REST endpoint handlers organized by resource.

pub mod system;
pub mod todo;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(todo::routes())
        .merge(system::routes())
}
