//! # Tally Common Library
//!
//! Shared code for the election tally service:
//! - Database initialization, schema and row models
//! - Configuration loading and root folder resolution
//! - Admin password checking
//! - Common error type

pub mod api;
pub mod config;
pub mod db;
pub mod error;

pub use error::{Error, Result};
