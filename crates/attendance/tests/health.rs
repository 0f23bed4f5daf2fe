mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;

use liceo_attendance::build_info;

use common::{body_json, body_string, Harness};

#[tokio::test]
async fn test_livez_is_always_ok() {
    let harness = Harness::with_script_url(None).await;

    let response = harness.get("/_status/livez").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"status": "ok"}));
}

#[tokio::test]
async fn test_readyz_follows_script_configuration() {
    let harness = Harness::new().await;
    let response = harness.get("/_status/readyz").await;
    assert_eq!(response.status(), StatusCode::OK);

    let harness = Harness::with_script_url(None).await;
    let response = harness.get("/_status/readyz").await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body_json(response).await["status"], json!("failure"));
}

#[tokio::test]
async fn test_version_reports_build_info() {
    let harness = Harness::new().await;

    let response = harness.get("/_status/version").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        serde_json::to_value(build_info()).unwrap()
    );
}

#[tokio::test]
async fn test_unknown_routes_fall_through_to_not_found() {
    let harness = Harness::new().await;

    let response = harness.get("/api/nope").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_string(response).await, "not found");

    let response = harness
        .send(
            Request::get("/nope")
                .header("accept", "application/json")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await, json!({"msg": "not found"}));
}
