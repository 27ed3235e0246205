use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use gj_core::api::listing::{JobView, ListingParams, ListingResponse};
use gj_core::listing;
use gj_core::translation::Locale;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::SharedState;

/// `GET /api/jobs`: filtered, sorted, paginated, locale-resolved listing.
/// Malformed filter or pagination values are corrected to defaults by
/// `ListingParams::normalize`, never rejected.
pub async fn list_jobs(
    State(state): State<SharedState>,
    Query(params): Query<ListingParams>,
    _auth: AuthUser,
) -> Result<Json<ListingResponse>, ApiError> {
    let query = params.normalize();

    let response = listing::list_postings(
        &state.pool,
        state.provider.as_ref(),
        &query,
        state.translation_timeout,
    )
    .await?;

    Ok(Json(response))
}

#[derive(Debug, Default, Deserialize)]
pub struct LocaleParam {
    pub locale: Option<String>,
}

/// `GET /api/jobs/:id`: single locale-resolved posting. An Arabic request
/// against a pending row translates synchronously (bounded) and otherwise
/// serves the English fallback.
pub async fn get_job(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    Query(params): Query<LocaleParam>,
    _auth: AuthUser,
) -> Result<Json<JobView>, ApiError> {
    let locale = Locale::from_param(params.locale.as_deref());

    listing::get_posting(
        &state.pool,
        state.provider.as_ref(),
        id,
        locale,
        state.translation_timeout,
    )
    .await?
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("job {id} not found")))
}
