//! HTTP API handlers for tally-server

pub mod auth;
pub mod candidates;
pub mod extract;
pub mod health;
pub mod overview;
pub mod tally;
pub mod ui;

pub use auth::auth_middleware;
pub use candidates::{create_candidate, import_csv, sync_file};
pub use health::health_routes;
pub use overview::get_overview;
pub use tally::{decrement, increment, reset};
pub use ui::ui_routes;
