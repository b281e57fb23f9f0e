//! Position queries

use sqlx::SqlitePool;
use tally_common::db::Position;
use tally_common::Result;

/// All positions in display (insertion) order
pub async fn list_positions(pool: &SqlitePool) -> Result<Vec<Position>> {
    let positions = sqlx::query_as::<_, Position>("SELECT id, key, title FROM positions ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(positions)
}

pub async fn position_exists(pool: &SqlitePool, key: &str) -> Result<bool> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM positions WHERE key = ?)")
        .bind(key)
        .fetch_one(pool)
        .await?;
    Ok(exists)
}
