//! Shared HTTP API functionality
//!
//! Contains only pure functions and shared constants. The server wraps these
//! with axum middleware.

pub mod auth;

pub use auth::{calculate_hash, AdminPassword, ADMIN_PASS_HEADER, ADMIN_PASS_QUERY};
