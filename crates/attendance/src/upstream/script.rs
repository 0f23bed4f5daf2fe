//! Client for the Apps Script deployment backing the attendee sheet.
//!
//! The deployment answers JSON on success. A broken or outdated deployment
//! answers an HTML error page instead, so every reply is sniffed before it
//! is trusted.

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::value::RawValue;
use serde_json::Value;
use url::Url;

/// Placeholder left in unedited environment files; treated as unset.
pub const PLACEHOLDER_URL: &str = "YOUR_GOOGLE_APPS_SCRIPT_URL_HERE";

/// Longest excerpt of an HTML error page kept for logging.
pub const EXCERPT_MAX_CHARS: usize = 200;

const HTML_PREFIXES: [&str; 2] = ["<!DOCTYPE", "<html"];

#[derive(Debug, Clone, Default)]
pub struct ScriptEndpoint(Option<Url>);

impl ScriptEndpoint {
    pub fn from_setting(raw: Option<&str>) -> Self {
        let raw = match raw.map(str::trim) {
            Some(raw) if !raw.is_empty() && raw != PLACEHOLDER_URL => raw,
            _ => return Self(None),
        };

        match Url::parse(raw) {
            Ok(url) => Self(Some(url)),
            Err(e) => {
                tracing::warn!("ignoring unparseable Apps Script URL: {}", e);
                Self(None)
            }
        }
    }

    pub fn is_configured(&self) -> bool {
        self.0.is_some()
    }

    pub fn url(&self) -> Option<&Url> {
        self.0.as_ref()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct MarkAttendancePayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    qr_content: Option<&'a Value>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RevokePaymentPayload<'a> {
    action: &'static str,
    cert_id: &'a str,
}

#[derive(Debug, Clone)]
pub struct ScriptClient {
    client: Client,
    endpoint: ScriptEndpoint,
}

impl ScriptClient {
    pub fn new(client: Client, endpoint: ScriptEndpoint) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> &ScriptEndpoint {
        &self.endpoint
    }

    fn url(&self) -> Result<Url, ScriptError> {
        self.endpoint.url().cloned().ok_or(ScriptError::Unconfigured)
    }

    /// Fetch the attendee and registration lists.
    pub async fn fetch_attendees(&self) -> Result<Box<RawValue>, ScriptError> {
        let response = self
            .client
            .get(self.url()?)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        read_reply(response).await
    }

    /// Submit a scanned QR payload. The deployment only reads plain-text
    /// bodies, so the JSON is sent under a `text/plain` content type.
    pub async fn mark_attendance(
        &self,
        qr_content: Option<&Value>,
    ) -> Result<Box<RawValue>, ScriptError> {
        let body = serde_json::to_string(&MarkAttendancePayload { qr_content })?;
        let response = self
            .client
            .post(self.url()?)
            .header(CONTENT_TYPE, "text/plain")
            .body(body)
            .send()
            .await?;

        read_reply(response).await
    }

    pub async fn revoke_payment(&self, cert_id: &str) -> Result<Box<RawValue>, ScriptError> {
        let response = self
            .client
            .post(self.url()?)
            .json(&RevokePaymentPayload {
                action: "revokePayment",
                cert_id,
            })
            .send()
            .await?;

        read_reply(response).await
    }
}

async fn read_reply(response: Response) -> Result<Box<RawValue>, ScriptError> {
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let body = response.text().await?;

    classify_reply(content_type.as_deref(), &body)
}

/// Decide whether an Apps Script reply is usable JSON.
///
/// The leading-bytes check is authoritative. A declared `text/html` only
/// counts against bodies that also fail to parse as JSON.
pub fn classify_reply(
    content_type: Option<&str>,
    body: &str,
) -> Result<Box<RawValue>, ScriptError> {
    if is_html_page(body) {
        return Err(ScriptError::html_page(body));
    }

    match serde_json::from_str::<Box<RawValue>>(body) {
        Ok(raw) => Ok(raw),
        Err(_) if declares_html(content_type) => Err(ScriptError::html_page(body)),
        Err(e) => Err(ScriptError::Malformed(e)),
    }
}

pub fn is_html_page(body: &str) -> bool {
    HTML_PREFIXES.iter().any(|prefix| body.starts_with(prefix))
}

fn declares_html(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case("text/html"))
        .unwrap_or(false)
}

pub fn excerpt(body: &str) -> String {
    body.chars().take(EXCERPT_MAX_CHARS).collect()
}

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("Apps Script URL is not configured")]
    Unconfigured,
    #[error("Apps Script returned HTML instead of JSON: {excerpt}")]
    HtmlPage { excerpt: String },
    #[error("Apps Script returned malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Apps Script request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ScriptError {
    fn html_page(body: &str) -> Self {
        ScriptError::HtmlPage {
            excerpt: excerpt(body),
        }
    }
}
