//! # todo-api
//!
//! REST backend for the procedure checklist frontend: list, create, update,
//! and delete todo records stored in a PostgreSQL table, with credentialed
//! CORS for the browser origins that host the frontend.
//!
//! ## Architecture
//!
//! ```text
//! Browser frontend (CORS allow-list)
//!     │
//!     ├── REST Handlers (api/)
//!     │
//!     ├── TodoStore trait (persistence/)
//!     │
//!     └── PostgreSQL `todos` table
//! ```
//!
//! Every request maps to exactly one SQL statement. The store handle is
//! built once at startup and shared read-only through [`app_state::AppState`].

pub mod api;
pub mod app_state;
pub mod config;
pub mod error;
pub mod persistence;
