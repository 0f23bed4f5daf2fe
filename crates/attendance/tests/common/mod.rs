#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use axum::Router;
use tower::ServiceExt;
use url::Url;
use wiremock::MockServer;

use liceo_attendance::http_server;
use liceo_attendance::{ServiceConfig, ServiceState};

pub const SCRIPT_PATH: &str = "/macros/s/test/exec";
pub const DRIVE_PATH: &str = "/uc";

/// Nothing listens here, so every request to it fails to connect.
pub const UNREACHABLE: &str = "http://127.0.0.1:1";

/// Twice the proxy's request body limit.
pub const OVERSIZED_BODY_BYTES: usize = 2 * 1024 * 1024;

/// A proxy router wired to a mock upstream standing in for both Apps Script
/// and Drive.
pub struct Harness {
    pub upstream: MockServer,
    router: Router,
}

impl Harness {
    pub async fn new() -> Self {
        let upstream = MockServer::start().await;
        let apps_script_url = format!("{}{}", upstream.uri(), SCRIPT_PATH);
        let router = router_for(Some(apps_script_url), drive_url(&upstream));
        Self { upstream, router }
    }

    /// Same as [`Harness::new`] but with the given Apps Script setting.
    pub async fn with_script_url(apps_script_url: Option<&str>) -> Self {
        let upstream = MockServer::start().await;
        let router = router_for(apps_script_url.map(str::to_string), drive_url(&upstream));
        Self { upstream, router }
    }

    /// Same as [`Harness::new`] but with Drive served from `drive_base_url`.
    pub async fn with_drive_url(drive_base_url: &str) -> Self {
        let upstream = MockServer::start().await;
        let apps_script_url = format!("{}{}", upstream.uri(), SCRIPT_PATH);
        let drive_base_url = Url::parse(drive_base_url).expect("valid Drive URL");
        let router = router_for(Some(apps_script_url), drive_base_url);
        Self { upstream, router }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    pub async fn post_json(&self, uri: &str, body: &str) -> Response<Body> {
        self.send(
            Request::post(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }
}

fn drive_url(upstream: &MockServer) -> Url {
    Url::parse(&format!("{}{}", upstream.uri(), DRIVE_PATH)).expect("valid Drive URL")
}

fn router_for(apps_script_url: Option<String>, drive_base_url: Url) -> Router {
    let config = ServiceConfig {
        apps_script_url,
        drive_base_url,
        ..ServiceConfig::default()
    };
    let state = ServiceState::from_config(&config).expect("state builds");
    http_server::router(state)
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable")
        .to_vec()
}

pub async fn body_string(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).expect("utf-8 body")
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).expect("json body")
}
