//! Database models

use serde::{Deserialize, Serialize};

/// An electable office, identified by a stable key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Position {
    pub id: i64,
    pub key: String,
    pub title: String,
}

/// A named entrant for exactly one position
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Candidate {
    pub id: i64,
    pub position_key: String,
    pub name: String,
    pub class: String,
}
