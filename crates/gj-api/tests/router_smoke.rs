use axum::{body::Body, http::Request, http::StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

#[tokio::test]
async fn livez_is_open_and_api_requires_auth() {
    let state = gj_api::test_state("test-key");
    let app = gj_api::create_router(state);

    let livez = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/livez")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(livez.status(), StatusCode::OK);

    let unauthorized = app
        .oneshot(
            Request::builder()
                .uri("/api/jobs")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn wrong_api_key_is_rejected_with_error_body() {
    let state = gj_api::test_state("test-key");
    let app = gj_api::create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/candidates/cand-1/applied-jobs/count")
                .header("x-api-key", "not-the-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["code"], "unauthorized");
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let state = gj_api::test_state("test-key");
    let app = gj_api::create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/livez")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn create_job_rejects_invalid_bodies_before_touching_the_store() {
    let state = gj_api::test_state("test-key");
    let app = gj_api::create_router(state);

    // Missing required fields → 400 from validation, not a store error.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/jobs")
                .header("x-api-key", "test-key")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"title": "Nurse"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Non-string field value → 400 as well.
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/jobs")
                .header("x-api-key", "test-key")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"title": "Nurse", "description": "Care", "city": "Dubai", "salary": 900}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn edit_job_rejects_unknown_fields() {
    let state = gj_api::test_state("test-key");
    let app = gj_api::create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/api/jobs/12")
                .header("x-api-key", "test-key")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"title_ar": "ممرض"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
