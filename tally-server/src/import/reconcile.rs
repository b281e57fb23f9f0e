//! Reconcile parsed CSV rows with the candidate table

use std::collections::{BTreeSet, HashSet};

use sqlx::SqlitePool;
use tally_common::{Error, Result};

use super::{CandidateRow, ImportMode, ImportSummary};
use crate::db::positions::list_positions;

/// Apply CSV rows in one transaction
///
/// Rows naming an unknown position reject the whole import; nothing is written.
/// New candidates get a zero tally. In replace mode every candidate whose
/// triple is absent from `rows` is deleted, tally included.
pub async fn import_candidates(
    pool: &SqlitePool,
    rows: &[CandidateRow],
    mode: ImportMode,
) -> Result<ImportSummary> {
    // Positions are only created by seeding, so checking before the write
    // transaction cannot race with another request
    let known: HashSet<String> = list_positions(pool)
        .await?
        .into_iter()
        .map(|p| p.key)
        .collect();
    let unknown: BTreeSet<&str> = rows
        .iter()
        .map(|r| r.position_key.as_str())
        .filter(|key| !known.contains(*key))
        .collect();
    if !unknown.is_empty() {
        return Err(Error::InvalidInput(format!(
            "unknown position key(s): {}",
            unknown.into_iter().collect::<Vec<_>>().join(", ")
        )));
    }

    let mut tx = pool.begin().await?;
    let mut inserted = 0u64;
    let mut deleted = 0u64;

    // Writes come first so the transaction takes the write lock up front
    for row in rows {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO candidates (position_key, name, class) VALUES (?, ?, ?)",
        )
        .bind(&row.position_key)
        .bind(&row.name)
        .bind(&row.class)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 1 {
            inserted += 1;
            sqlx::query("INSERT OR IGNORE INTO tallies (candidate_id, count) VALUES (?, 0)")
                .bind(result.last_insert_rowid())
                .execute(&mut *tx)
                .await?;
        }
    }

    if mode == ImportMode::Replace {
        if rows.is_empty() {
            deleted = sqlx::query("DELETE FROM candidates")
                .execute(&mut *tx)
                .await?
                .rows_affected();
        } else {
            let wanted: HashSet<(String, String, String)> = rows
                .iter()
                .map(|r| (r.position_key.clone(), r.name.clone(), r.class.clone()))
                .collect();

            let existing: Vec<(i64, String, String, String)> =
                sqlx::query_as("SELECT id, position_key, name, class FROM candidates")
                    .fetch_all(&mut *tx)
                    .await?;

            for (id, position_key, name, class) in existing {
                if wanted.contains(&(position_key, name, class)) {
                    continue;
                }
                deleted += sqlx::query("DELETE FROM candidates WHERE id = ?")
                    .bind(id)
                    .execute(&mut *tx)
                    .await?
                    .rows_affected();
            }
        }
    }

    tx.commit().await?;

    Ok(ImportSummary {
        mode,
        inserted,
        deleted,
        total_csv_rows: rows.len(),
        skipped: Vec::new(),
    })
}
