mod common;

use axum::http::StatusCode;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, ResponseTemplate};

use common::{body_json, body_string, Harness, SCRIPT_PATH};

#[tokio::test]
async fn test_upstream_json_is_passed_through_verbatim() {
    let harness = Harness::new().await;
    let upstream_body = r#"{"success":true,"count":2,"attendees":["A","B"],"registered":[]}"#;

    Mock::given(method("GET"))
        .and(path(SCRIPT_PATH))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(upstream_body, "application/json"))
        .expect(1)
        .mount(&harness.upstream)
        .await;

    let response = harness.get("/api/attendees").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, upstream_body);
}

#[tokio::test]
async fn test_key_order_and_extra_fields_survive() {
    let harness = Harness::new().await;
    let upstream_body = r#"{"registered":[{"z":1,"a":2}],"success":true,"note":"x","count":0}"#;

    Mock::given(method("GET"))
        .and(path(SCRIPT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw(upstream_body, "application/json"))
        .mount(&harness.upstream)
        .await;

    let response = harness.get("/api/attendees").await;
    assert_eq!(body_string(response).await, upstream_body);
}

#[tokio::test]
async fn test_html_error_page_becomes_bad_gateway() {
    let harness = Harness::new().await;

    Mock::given(method("GET"))
        .and(path(SCRIPT_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<!DOCTYPE html><html><body>Script error</body></html>", "text/html"),
        )
        .mount(&harness.upstream)
        .await;

    let response = harness.get("/api/attendees").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
        body_json(response).await,
        json!({
            "success": false,
            "count": 0,
            "attendees": [],
            "registered": [],
            "error": "Apps Script returned HTML error. Please redeploy the script."
        })
    );
}

#[tokio::test]
async fn test_html_sniffed_even_when_labelled_json() {
    let harness = Harness::new().await;

    Mock::given(method("GET"))
        .and(path(SCRIPT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html>nope</html>", "application/json"))
        .mount(&harness.upstream)
        .await;

    let response = harness.get("/api/attendees").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

#[tokio::test]
async fn test_malformed_json_is_a_generic_failure() {
    let harness = Harness::new().await;

    Mock::given(method("GET"))
        .and(path(SCRIPT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{not json", "application/json"))
        .mount(&harness.upstream)
        .await;

    let response = harness.get("/api/attendees").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Failed to fetch attendees"));
    assert_eq!(body["count"], json!(0));
}

#[tokio::test]
async fn test_unreachable_upstream_is_a_generic_failure() {
    let harness = Harness::with_script_url(Some(&format!("{}/exec", common::UNREACHABLE))).await;

    let response = harness.get("/api/attendees").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await["error"],
        json!("Failed to fetch attendees")
    );
}

#[tokio::test]
async fn test_unconfigured_endpoint_never_calls_out() {
    let harness = Harness::with_script_url(Some("YOUR_GOOGLE_APPS_SCRIPT_URL_HERE")).await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&harness.upstream)
        .await;

    let response = harness.get("/api/attendees").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_json(response).await["error"],
        json!("Failed to fetch attendees")
    );
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let harness = Harness::new().await;

    Mock::given(method("GET"))
        .and(path(SCRIPT_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .mount(&harness.upstream)
        .await;

    let response = harness
        .send(
            axum::http::Request::get("/api/attendees")
                .header("origin", "https://attendance.example")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}
