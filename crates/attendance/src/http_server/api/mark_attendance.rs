use std::convert::Infallible;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::envelope::MessageEnvelope;
use crate::upstream::ScriptError;
use crate::ServiceState;

pub const HTML_ERROR_MESSAGE: &str = "Apps Script error. Please redeploy the script.";
pub const FAILURE_MESSAGE: &str = "Failed to mark attendance";

#[derive(Debug, Clone, Default, Serialize, Deserialize, clap::Args)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceRequest {
    /// Raw content of the scanned QR code
    #[arg(long, value_parser = scan_arg)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qr_content: Option<Value>,

    /// Certificate id, used when no QR content is given
    #[arg(long, value_parser = scan_arg)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_id: Option<Value>,
}

/// Command-line scans are always sent as JSON strings.
fn scan_arg(raw: &str) -> Result<Value, Infallible> {
    Ok(Value::String(raw.to_string()))
}

/// `null`, `false`, zero and the empty string do not count as a scan.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl MarkAttendanceRequest {
    /// The value forwarded to the sheet: `qrContent` when it holds a scan,
    /// otherwise whatever `certId` holds. Values of any JSON type are
    /// forwarded unchanged.
    pub fn scan_value(&self) -> Option<&Value> {
        match self.qr_content.as_ref() {
            Some(qr_content) if is_truthy(qr_content) => Some(qr_content),
            _ => self.cert_id.as_ref(),
        }
    }
}

/// POST /api/mark-attendance
///
/// The body is read and parsed by hand so an oversized body, a missing or
/// wrong content type, or a body that is not JSON at all, lands in the same
/// failure envelope as an upstream error.
pub async fn handler(
    State(state): State<ServiceState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, MarkAttendanceError> {
    let req: MarkAttendanceRequest = serde_json::from_slice(&body?)?;
    let scan = req.scan_value();
    tracing::debug!(has_scan = scan.is_some(), "MARK ATTENDANCE: forwarding scan");

    let reply = state.script().mark_attendance(scan).await?;

    Ok((http::StatusCode::OK, Json(reply)).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum MarkAttendanceError {
    #[error("Failed to read request body: {0}")]
    UnreadableBody(#[from] BytesRejection),
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),
    #[error("Apps Script error: {0}")]
    Script(#[from] ScriptError),
}

impl IntoResponse for MarkAttendanceError {
    fn into_response(self) -> Response {
        match self {
            MarkAttendanceError::Script(ScriptError::HtmlPage { excerpt }) => {
                tracing::error!("Apps Script returned HTML instead of JSON: {}", excerpt);
                (
                    http::StatusCode::BAD_GATEWAY,
                    Json(MessageEnvelope::failure(HTML_ERROR_MESSAGE)),
                )
                    .into_response()
            }
            e => {
                tracing::error!("Failed to mark attendance: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    Json(MessageEnvelope::failure(FAILURE_MESSAGE)),
                )
                    .into_response()
            }
        }
    }
}

// Client implementation - builds request for this operation
impl ApiRequest for MarkAttendanceRequest {
    type Response = serde_json::Value;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        let full_url = base_url.join("/api/mark-attendance")?;
        Ok(client.post(full_url).json(&self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    fn request(qr_content: Option<Value>, cert_id: Option<Value>) -> MarkAttendanceRequest {
        MarkAttendanceRequest {
            qr_content,
            cert_id,
        }
    }

    #[test]
    fn test_qr_content_preferred() {
        let req = request(Some(json!("QR")), Some(json!("CERT")));
        assert_eq!(req.scan_value(), Some(&json!("QR")));
    }

    #[test]
    fn test_cert_id_fallback() {
        for qr_content in [None, Some(json!("")), Some(json!(false)), Some(json!(0)), Some(json!(null))] {
            let req = request(qr_content.clone(), Some(json!("CERT")));
            assert_eq!(req.scan_value(), Some(&json!("CERT")), "qrContent {:?}", qr_content);
        }
    }

    #[test]
    fn test_non_string_scans_are_kept() {
        assert_eq!(request(Some(json!(12345)), None).scan_value(), Some(&json!(12345)));
        assert_eq!(
            request(Some(json!({"id": "CERT"})), Some(json!("CERT"))).scan_value(),
            Some(&json!({"id": "CERT"}))
        );
        assert_eq!(request(Some(json!(true)), None).scan_value(), Some(&json!(true)));
    }

    #[test]
    fn test_nothing_to_forward() {
        assert_eq!(request(None, None).scan_value(), None);
        // an empty qrContent falls through to certId as-is
        assert_eq!(request(Some(json!("")), Some(json!(""))).scan_value(), Some(&json!("")));
    }

    #[test]
    fn test_request_field_names() {
        let req: MarkAttendanceRequest =
            serde_json::from_str(r#"{"qrContent":"QR","certId":7,"extra":1}"#).unwrap();
        assert_eq!(req.qr_content, Some(json!("QR")));
        assert_eq!(req.cert_id, Some(json!(7)));
    }
}
