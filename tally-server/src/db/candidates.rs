//! Candidate queries

use sqlx::SqlitePool;
use tally_common::db::Candidate;
use tally_common::{Error, Result};

use super::{is_unique_violation, positions::position_exists};

/// All candidates in insertion order
pub async fn list_candidates(pool: &SqlitePool) -> Result<Vec<Candidate>> {
    let candidates = sqlx::query_as::<_, Candidate>(
        "SELECT id, position_key, name, class FROM candidates ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(candidates)
}

pub async fn find_candidate(pool: &SqlitePool, id: i64) -> Result<Option<Candidate>> {
    let candidate = sqlx::query_as::<_, Candidate>(
        "SELECT id, position_key, name, class FROM candidates WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(candidate)
}

/// Add one candidate together with its zero tally
///
/// Fails with `NotFound` for an unknown position and `Conflict` when the
/// (position, name, class) triple already exists.
pub async fn insert_candidate(
    pool: &SqlitePool,
    position_key: &str,
    name: &str,
    class: &str,
) -> Result<Candidate> {
    if !position_exists(pool, position_key).await? {
        return Err(Error::NotFound(format!("position '{}'", position_key)));
    }

    let mut tx = pool.begin().await?;

    let inserted = sqlx::query(
        "INSERT INTO candidates (position_key, name, class) VALUES (?, ?, ?)",
    )
    .bind(position_key)
    .bind(name)
    .bind(class)
    .execute(&mut *tx)
    .await;

    let id = match inserted {
        Ok(result) => result.last_insert_rowid(),
        Err(e) if is_unique_violation(&e) => {
            return Err(Error::Conflict(format!(
                "candidate '{}' ({}) already exists for '{}'",
                name, class, position_key
            )));
        }
        Err(e) => return Err(e.into()),
    };

    sqlx::query("INSERT OR IGNORE INTO tallies (candidate_id, count) VALUES (?, 0)")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    tracing::info!(id, position_key, name, class, "Added candidate");

    Ok(Candidate {
        id,
        position_key: position_key.to_string(),
        name: name.to_string(),
        class: class.to_string(),
    })
}
