use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use gj_core::api::listing::{parse_limit, parse_page, PageMeta};
use gj_core::api::matches::{
    AppliedCountResponse, AppliedJobsResponse, MatchedJob, MatchedJobsResponse,
};
use gj_core::db::{self, PgPool};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::SharedState;

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// A candidate is known to the ranked-match surfaces when they own ranking
/// rows or at least a profile; anything else is a 404.
async fn ensure_known_candidate(pool: &PgPool, candidate_id: &str) -> Result<(), ApiError> {
    if db::has_rankings(pool, candidate_id).await? {
        return Ok(());
    }
    if db::fetch_profile(pool, candidate_id).await?.is_some() {
        return Ok(());
    }
    Err(ApiError::NotFound(format!(
        "candidate {candidate_id} not found"
    )))
}

/// `GET /api/candidates/:candidate_id/matched-jobs`: previously computed
/// rankings, best score first, paginated like the listing surface. No
/// rescoring and no locale resolution happen here.
pub async fn matched_jobs(
    State(state): State<SharedState>,
    Path(candidate_id): Path<String>,
    Query(params): Query<PageParams>,
    _auth: AuthUser,
) -> Result<Json<MatchedJobsResponse>, ApiError> {
    ensure_known_candidate(&state.pool, &candidate_id).await?;

    let page = parse_page(params.page.as_deref());
    let limit = parse_limit(params.limit.as_deref());

    let total = db::count_rankings(&state.pool, &candidate_id).await?;
    let records =
        db::fetch_matched_page(&state.pool, &candidate_id, limit, (page - 1) * limit).await?;

    Ok(Json(MatchedJobsResponse {
        items: records.into_iter().map(MatchedJob::from).collect(),
        meta: PageMeta::new(total, page, limit),
    }))
}

/// `GET /api/candidates/:candidate_id/applied-jobs`
pub async fn applied_jobs(
    State(state): State<SharedState>,
    Path(candidate_id): Path<String>,
    _auth: AuthUser,
) -> Result<Json<AppliedJobsResponse>, ApiError> {
    ensure_known_candidate(&state.pool, &candidate_id).await?;

    let records = db::fetch_applied(&state.pool, &candidate_id).await?;
    Ok(Json(AppliedJobsResponse {
        items: records.into_iter().map(MatchedJob::from).collect(),
    }))
}

/// `GET /api/candidates/:candidate_id/applied-jobs/count`
pub async fn applied_jobs_count(
    State(state): State<SharedState>,
    Path(candidate_id): Path<String>,
    _auth: AuthUser,
) -> Result<Json<AppliedCountResponse>, ApiError> {
    ensure_known_candidate(&state.pool, &candidate_id).await?;

    let count = db::count_applied_distinct(&state.pool, &candidate_id).await?;
    Ok(Json(AppliedCountResponse { count }))
}
