//! Database initialization
//!
//! Opens (or creates) the SQLite store, creates the schema idempotently and
//! seeds the default positions on first run.

use crate::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Positions created on first run, in display order
pub const DEFAULT_POSITIONS: &[(&str, &str)] = &[
    ("president", "Prezidents"),
    ("vice_president", "Viceprezidents"),
    ("min_tech", "Tehnikas ministrs"),
    ("min_media", "Mēdiju ministrs"),
    ("min_art", "Mākslas ministrs"),
    ("min_culture", "Kultūras ministrs"),
    ("min_internal", "Iekšlietu ministrs"),
];

/// How long a connection waits on a locked database before failing
const BUSY_TIMEOUT_MS: u64 = 3000;

/// Initialize database connection and create tables if needed
pub async fn init_database(db_path: &Path) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Pragmas go on the connect options so every pooled connection gets them
    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(Duration::from_millis(BUSY_TIMEOUT_MS));

    let pool = SqlitePoolOptions::new()
        .max_connections(10)
        .connect_with(options)
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;
    seed_default_positions(&pool).await?;

    Ok(pool)
}

/// Create all tables (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_meta_table(pool).await?;
    create_positions_table(pool).await?;
    create_candidates_table(pool).await?;
    create_tallies_table(pool).await?;
    Ok(())
}

async fn create_meta_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS meta (
            k TEXT PRIMARY KEY,
            v TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the positions table
///
/// `id` gives the display order; `key` is what candidates reference.
pub async fn create_positions_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS positions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            key TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Create the candidates table
///
/// A candidate is unique on its (position_key, name, class) triple, which is
/// the identity CSV imports reconcile against.
pub async fn create_candidates_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS candidates (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            position_key TEXT NOT NULL REFERENCES positions(key) ON DELETE CASCADE,
            name TEXT NOT NULL,
            class TEXT NOT NULL,
            UNIQUE (position_key, name, class)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_candidates_position ON candidates(position_key)")
        .execute(pool)
        .await?;

    Ok(())
}

/// Create the tallies table
pub async fn create_tallies_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tallies (
            candidate_id INTEGER PRIMARY KEY REFERENCES candidates(id) ON DELETE CASCADE,
            count INTEGER NOT NULL DEFAULT 0,
            CHECK (count >= 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Seed default positions once
///
/// The `seeded` marker in `meta` keeps positions deleted later from coming back.
pub async fn seed_default_positions(pool: &SqlitePool) -> Result<()> {
    let mut tx = pool.begin().await?;

    let seeded: Option<String> = sqlx::query_scalar("SELECT v FROM meta WHERE k = 'seeded'")
        .fetch_optional(&mut *tx)
        .await?;
    if seeded.is_some() {
        return Ok(());
    }

    for (key, title) in DEFAULT_POSITIONS {
        sqlx::query("INSERT OR IGNORE INTO positions (key, title) VALUES (?, ?)")
            .bind(key)
            .bind(title)
            .execute(&mut *tx)
            .await?;
    }

    sqlx::query("INSERT INTO meta (k, v) VALUES ('seeded', '1')")
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!("Seeded {} default positions", DEFAULT_POSITIONS.len());
    Ok(())
}
