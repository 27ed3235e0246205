use deadpool_postgres::PoolError;
use tokio_postgres::Error as PgError;
use tracing::instrument;

use crate::db::PgPool;
use crate::CandidateProfile;

#[derive(Debug, thiserror::Error)]
pub enum ProfileStoreError {
    #[error("failed to get postgres connection: {0}")]
    Pool(#[from] PoolError),
    #[error("postgres error: {0}")]
    Postgres(#[from] PgError),
}

/// Look up a candidate's search preferences. Profiles are owned by the
/// profile service; this core only reads them for scoring enrichment.
#[instrument(skip(pool))]
pub async fn fetch_profile(
    pool: &PgPool,
    candidate_id: &str,
) -> Result<Option<CandidateProfile>, ProfileStoreError> {
    let client = pool.get().await?;

    let row = client
        .query_opt(
            "SELECT candidate_id, desired_positions, skills, preferred_location
             FROM candidate_profiles
             WHERE candidate_id = $1",
            &[&candidate_id],
        )
        .await?;

    Ok(row.map(|row| CandidateProfile {
        candidate_id: row.get("candidate_id"),
        desired_positions: row.get("desired_positions"),
        skills: row.get("skills"),
        preferred_location: row.get("preferred_location"),
    }))
}
