//! Overview projection
//!
//! Nests candidates and their counts under positions for the results dashboard
//! and the admin board. Positions and candidates keep insertion order; a
//! candidate without a tally row reads as zero votes.

use serde::Serialize;
use sqlx::SqlitePool;
use tally_common::db::Position;
use tally_common::Result;

/// Candidate with its current count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct CandidateCount {
    pub id: i64,
    #[serde(skip)]
    pub position_key: String,
    pub name: String,
    pub class: String,
    pub count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PositionOverview {
    pub key: String,
    pub title: String,
    pub candidates: Vec<CandidateCount>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub positions: Vec<PositionOverview>,
}

/// Read positions and counted candidates from one snapshot and nest them
pub async fn load_overview(pool: &SqlitePool) -> Result<Overview> {
    let mut tx = pool.begin().await?;

    let positions = sqlx::query_as::<_, Position>("SELECT id, key, title FROM positions ORDER BY id")
        .fetch_all(&mut *tx)
        .await?;

    let candidates = sqlx::query_as::<_, CandidateCount>(
        r#"
        SELECT c.id, c.position_key, c.name, c.class, COALESCE(t.count, 0) AS count
        FROM candidates c
        LEFT JOIN tallies t ON t.candidate_id = c.id
        ORDER BY c.id
        "#,
    )
    .fetch_all(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(project(positions, candidates))
}

/// Group candidates under their positions, preserving both orders
pub fn project(positions: Vec<Position>, candidates: Vec<CandidateCount>) -> Overview {
    let mut grouped: Vec<PositionOverview> = positions
        .into_iter()
        .map(|p| PositionOverview {
            key: p.key,
            title: p.title,
            candidates: Vec::new(),
        })
        .collect();

    for candidate in candidates {
        if let Some(position) = grouped.iter_mut().find(|p| p.key == candidate.position_key) {
            position.candidates.push(candidate);
        }
    }

    Overview { positions: grouped }
}
