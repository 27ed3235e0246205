use deadpool_postgres::PoolError;
use tokio_postgres::{Error as PgError, Row};
use tracing::instrument;

use crate::db::PgPool;
use crate::RankingRecord;

#[derive(Debug, thiserror::Error)]
pub enum RankingStoreError {
    #[error("failed to get postgres connection: {0}")]
    Pool(#[from] PoolError),
    #[error("postgres error: {0}")]
    Postgres(#[from] PgError),
}

fn ranking_from_row(row: &Row) -> RankingRecord {
    RankingRecord {
        candidate_id: row.get("candidate_id"),
        job_id: row.get("job_id"),
        score: row.get("score"),
        status: row.get("status"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

const RANKING_COLUMNS: &str = "candidate_id, job_id, score, status, created_at, updated_at";

/// One page of a candidate's rankings, best match first. Job id breaks
/// score ties so pages are stable across reads.
#[instrument(skip(pool))]
pub async fn fetch_matched_page(
    pool: &PgPool,
    candidate_id: &str,
    limit: i64,
    offset: i64,
) -> Result<Vec<RankingRecord>, RankingStoreError> {
    let client = pool.get().await?;

    let sql = format!(
        "SELECT {RANKING_COLUMNS} FROM rankings
         WHERE candidate_id = $1
         ORDER BY score DESC, job_id ASC
         LIMIT $2 OFFSET $3"
    );
    let rows = client.query(&sql, &[&candidate_id, &limit, &offset]).await?;

    Ok(rows.iter().map(ranking_from_row).collect())
}

#[instrument(skip(pool))]
pub async fn count_rankings(pool: &PgPool, candidate_id: &str) -> Result<i64, RankingStoreError> {
    let client = pool.get().await?;

    let row = client
        .query_one(
            "SELECT COUNT(*) FROM rankings WHERE candidate_id = $1",
            &[&candidate_id],
        )
        .await?;
    Ok(row.get(0))
}

/// Rankings the candidate has acted on, best match first.
#[instrument(skip(pool))]
pub async fn fetch_applied(
    pool: &PgPool,
    candidate_id: &str,
) -> Result<Vec<RankingRecord>, RankingStoreError> {
    let client = pool.get().await?;

    let sql = format!(
        "SELECT {RANKING_COLUMNS} FROM rankings
         WHERE candidate_id = $1 AND status = 'applied'
         ORDER BY score DESC, job_id ASC"
    );
    let rows = client.query(&sql, &[&candidate_id]).await?;

    Ok(rows.iter().map(ranking_from_row).collect())
}

/// Distinct jobs the candidate applied to. The (candidate, job) pair is
/// unique, but DISTINCT keeps the count honest should that ever loosen.
#[instrument(skip(pool))]
pub async fn count_applied_distinct(
    pool: &PgPool,
    candidate_id: &str,
) -> Result<i64, RankingStoreError> {
    let client = pool.get().await?;

    let row = client
        .query_one(
            "SELECT COUNT(DISTINCT job_id) FROM rankings
             WHERE candidate_id = $1 AND status = 'applied'",
            &[&candidate_id],
        )
        .await?;
    Ok(row.get(0))
}

#[instrument(skip(pool))]
pub async fn has_rankings(pool: &PgPool, candidate_id: &str) -> Result<bool, RankingStoreError> {
    let client = pool.get().await?;

    let row = client
        .query_one(
            "SELECT EXISTS (SELECT 1 FROM rankings WHERE candidate_id = $1)",
            &[&candidate_id],
        )
        .await?;
    Ok(row.get(0))
}
