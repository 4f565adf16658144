//! Data Transfer Objects for REST request/response serialization.

pub mod todo_dto;

pub use todo_dto::*;
