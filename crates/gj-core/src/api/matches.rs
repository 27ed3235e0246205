use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::RankingRecord;

use super::listing::PageMeta;

/// One previously computed ranking, as served by the matched-jobs surfaces.
#[derive(Debug, Clone, Serialize)]
pub struct MatchedJob {
    pub job_id: i64,
    /// Persisted match score in [0, 100].
    pub score: f64,
    /// Application-state label, e.g. "applied" or "pending".
    pub status: String,
    pub matched_at: DateTime<Utc>,
}

impl From<RankingRecord> for MatchedJob {
    fn from(record: RankingRecord) -> Self {
        Self {
            job_id: record.job_id,
            score: record.score,
            status: record.status,
            matched_at: record.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MatchedJobsResponse {
    pub items: Vec<MatchedJob>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

#[derive(Debug, Clone, Serialize)]
pub struct AppliedJobsResponse {
    pub items: Vec<MatchedJob>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct AppliedCountResponse {
    pub count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matched_job_takes_the_ranking_timestamp() {
        let record = RankingRecord {
            candidate_id: "cand-1".into(),
            job_id: 11,
            score: 87.25,
            status: "applied".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let created_at = record.created_at;

        let job = MatchedJob::from(record);
        assert_eq!(job.job_id, 11);
        assert_eq!(job.score, 87.25);
        assert_eq!(job.matched_at, created_at);
    }
}
