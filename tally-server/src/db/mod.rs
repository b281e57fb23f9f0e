//! Database access for tally-server
//!
//! Schema creation lives in tally-common; this module holds the queries the
//! HTTP handlers run.

pub mod candidates;
pub mod positions;
pub mod tallies;

pub use tally_common::db::{init_database, Candidate, Position};

/// True when the error is a UNIQUE constraint violation
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}
