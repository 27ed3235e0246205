use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::info;

use gj_core::api::posting::{parse_new_posting, parse_patch};
use gj_core::db::postings::{insert_posting, update_posting};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::SharedState;

/// `POST /api/jobs`: create a default-locale posting. The row starts
/// `pending` and a background translation is requested; that trigger can
/// never fail the creating request.
pub async fn create_job(
    State(state): State<SharedState>,
    _auth: AuthUser,
    Json(body): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let draft = parse_new_posting(&body)?;

    let id = insert_posting(&state.pool, &draft).await?;
    state.trigger.request(id);

    info!(id, title = %draft.title, "posting created");
    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": id, "translation_status": "pending" })),
    ))
}

/// `PATCH /api/jobs/:id`: partial edit of the default-locale fields. Any
/// edit resets the translation to `pending`, and a fresh background
/// translation is requested.
pub async fn edit_job(
    State(state): State<SharedState>,
    Path(id): Path<i64>,
    _auth: AuthUser,
    Json(body): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let patch = parse_patch(&body)?;

    let updated = update_posting(&state.pool, id, &patch).await?;
    if !updated {
        return Err(ApiError::NotFound(format!("job {id} not found")));
    }
    state.trigger.request(id);

    Ok(Json(
        json!({ "success": true, "translation_status": "pending" }),
    ))
}
