use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::envelope::MessageEnvelope;
use crate::upstream::ScriptError;
use crate::ServiceState;

pub const UNCONFIGURED_MESSAGE: &str = "APPS_SCRIPT_URL not configured. Set it in your .env file.";
pub const MISSING_CERT_ID_MESSAGE: &str = "certId is required";
pub const HTML_ERROR_MESSAGE: &str = "Apps Script error. Please redeploy the script.";
pub const FAILURE_MESSAGE: &str = "Failed to revoke payment";

#[derive(Debug, Clone, Default, Serialize, Deserialize, clap::Args)]
#[serde(rename_all = "camelCase")]
pub struct RevokePaymentRequest {
    /// Certificate id whose payment should be revoked
    #[arg(long, required = true)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cert_id: Option<String>,
}

impl RevokePaymentRequest {
    /// The trimmed certificate id, if there is one left after trimming.
    pub fn cert_id(&self) -> Option<&str> {
        self.cert_id
            .as_deref()
            .map(str::trim)
            .filter(|cert_id| !cert_id.is_empty())
    }
}

/// POST /api/revoke-payment
///
/// Checks run in a fixed order, and each one answers before anything is sent
/// upstream: endpoint configured, body readable and parses, certId present.
pub async fn handler(
    State(state): State<ServiceState>,
    body: Result<Bytes, BytesRejection>,
) -> Result<impl IntoResponse, RevokePaymentError> {
    if !state.script().endpoint().is_configured() {
        return Err(RevokePaymentError::Unconfigured);
    }

    let req: RevokePaymentRequest = serde_json::from_slice(&body?)?;
    let cert_id = req.cert_id().ok_or(RevokePaymentError::MissingCertId)?;

    tracing::info!("REVOKE PAYMENT: revoking payment for {}", cert_id);
    let reply = state.script().revoke_payment(cert_id).await?;

    Ok((http::StatusCode::OK, Json(reply)).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum RevokePaymentError {
    #[error("Apps Script URL is not configured")]
    Unconfigured,
    #[error("certId is required")]
    MissingCertId,
    #[error("Failed to read request body: {0}")]
    UnreadableBody(#[from] BytesRejection),
    #[error("Invalid request body: {0}")]
    InvalidBody(#[from] serde_json::Error),
    #[error("Apps Script error: {0}")]
    Script(#[from] ScriptError),
}

impl IntoResponse for RevokePaymentError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            RevokePaymentError::Unconfigured
            | RevokePaymentError::Script(ScriptError::Unconfigured) => {
                tracing::error!("revoke-payment called without APPS_SCRIPT_URL configured");
                (http::StatusCode::INTERNAL_SERVER_ERROR, UNCONFIGURED_MESSAGE)
            }
            RevokePaymentError::MissingCertId => {
                (http::StatusCode::BAD_REQUEST, MISSING_CERT_ID_MESSAGE)
            }
            RevokePaymentError::Script(ScriptError::HtmlPage { excerpt }) => {
                tracing::error!("Apps Script returned HTML instead of JSON: {}", excerpt);
                (http::StatusCode::BAD_GATEWAY, HTML_ERROR_MESSAGE)
            }
            e => {
                tracing::error!("Failed to revoke payment: {}", e);
                (http::StatusCode::INTERNAL_SERVER_ERROR, FAILURE_MESSAGE)
            }
        };

        (status, Json(MessageEnvelope::failure(message))).into_response()
    }
}

// Client implementation - builds request for this operation
impl ApiRequest for RevokePaymentRequest {
    type Response = serde_json::Value;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        let full_url = base_url.join("/api/revoke-payment")?;
        Ok(client.post(full_url).json(&self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cert_id_is_trimmed() {
        let req: RevokePaymentRequest =
            serde_json::from_str(r#"{"certId":"  CERT-42 \n"}"#).unwrap();
        assert_eq!(req.cert_id(), Some("CERT-42"));
    }

    #[test]
    fn test_blank_or_missing_cert_id() {
        for body in [r#"{}"#, r#"{"certId":null}"#, r#"{"certId":""}"#, r#"{"certId":"   "}"#] {
            let req: RevokePaymentRequest = serde_json::from_str(body).unwrap();
            assert_eq!(req.cert_id(), None, "body {}", body);
        }
    }

    #[test]
    fn test_non_string_cert_id_is_a_body_error() {
        assert!(serde_json::from_str::<RevokePaymentRequest>(r#"{"certId":42}"#).is_err());
    }
}
