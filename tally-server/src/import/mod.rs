//! CSV candidate import
//!
//! Two reconciliation modes against the existing candidate set:
//! - **merge**: insert candidates missing from the database, never remove any
//! - **replace**: afterwards the candidate set equals the CSV content exactly
//!
//! Candidates are matched on the exact (name, class, position_key) triple.
//! Existing candidates keep their tallies in both modes.

pub mod csv;
pub mod reconcile;

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tally_common::Result;

pub use self::csv::{parse_candidate_csv, CandidateRow, ParsedCsv, SkippedLine};
pub use reconcile::import_candidates;

/// How an import treats candidates absent from the CSV
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Keep them
    #[default]
    Merge,
    /// Delete them
    Replace,
}

impl std::fmt::Display for ImportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportMode::Merge => f.write_str("merge"),
            ImportMode::Replace => f.write_str("replace"),
        }
    }
}

/// Outcome of one import
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub mode: ImportMode,
    /// Candidates newly created
    pub inserted: u64,
    /// Candidates removed (replace mode only)
    pub deleted: u64,
    /// Valid CSV rows, duplicates included
    pub total_csv_rows: usize,
    /// Non-blank lines that were not valid rows
    pub skipped: Vec<SkippedLine>,
}

/// Parse CSV text and reconcile it against the store
pub async fn import_csv_text(
    pool: &SqlitePool,
    text: &str,
    mode: ImportMode,
) -> Result<ImportSummary> {
    let parsed = parse_candidate_csv(text);
    let mut summary = import_candidates(pool, &parsed.rows, mode).await?;
    summary.skipped = parsed.skipped;

    tracing::info!(
        %mode,
        inserted = summary.inserted,
        deleted = summary.deleted,
        rows = summary.total_csv_rows,
        skipped = summary.skipped.len(),
        "Candidate import complete"
    );

    Ok(summary)
}
