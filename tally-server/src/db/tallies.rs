//! Tally mutations
//!
//! Every mutation is a single SQL statement, so concurrent tellers never lose
//! an update: SQLite serializes the writers and each one sees the latest count.
//! Counts are floored at zero.

use sqlx::SqlitePool;
use tally_common::{Error, Result};

use super::positions::position_exists;

const INCREMENT_SQL: &str =
    "UPDATE tallies SET count = count + 1 WHERE candidate_id = ? RETURNING count";

const DECREMENT_SQL: &str =
    "UPDATE tallies SET count = MAX(count - 1, 0) WHERE candidate_id = ? RETURNING count";

/// Add one vote, returning the new count
pub async fn increment(pool: &SqlitePool, candidate_id: i64) -> Result<i64> {
    apply(pool, candidate_id, INCREMENT_SQL).await
}

/// Remove one vote (never below zero), returning the new count
pub async fn decrement(pool: &SqlitePool, candidate_id: i64) -> Result<i64> {
    apply(pool, candidate_id, DECREMENT_SQL).await
}

async fn apply(pool: &SqlitePool, candidate_id: i64, sql: &str) -> Result<i64> {
    // Candidates created outside the API may lack a tally row
    sqlx::query(
        "INSERT OR IGNORE INTO tallies (candidate_id, count) SELECT id, 0 FROM candidates WHERE id = ?",
    )
    .bind(candidate_id)
    .execute(pool)
    .await?;

    let count: Option<i64> = sqlx::query_scalar(sql)
        .bind(candidate_id)
        .fetch_optional(pool)
        .await?;

    count.ok_or_else(|| Error::NotFound(format!("candidate {}", candidate_id)))
}

/// Current count; missing tally rows read as zero
pub async fn get_count(pool: &SqlitePool, candidate_id: i64) -> Result<i64> {
    let count: Option<i64> = sqlx::query_scalar("SELECT count FROM tallies WHERE candidate_id = ?")
        .bind(candidate_id)
        .fetch_optional(pool)
        .await?;
    Ok(count.unwrap_or(0))
}

/// Zero every tally, returning the number of rows touched
pub async fn reset_all(pool: &SqlitePool) -> Result<u64> {
    let result = sqlx::query("UPDATE tallies SET count = 0").execute(pool).await?;
    Ok(result.rows_affected())
}

/// Zero the tallies of one position's candidates
///
/// Other positions are untouched. Unknown keys are `NotFound`.
pub async fn reset_position(pool: &SqlitePool, position_key: &str) -> Result<u64> {
    if !position_exists(pool, position_key).await? {
        return Err(Error::NotFound(format!("position '{}'", position_key)));
    }

    let result = sqlx::query(
        r#"
        UPDATE tallies SET count = 0
        WHERE candidate_id IN (SELECT id FROM candidates WHERE position_key = ?)
        "#,
    )
    .bind(position_key)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
