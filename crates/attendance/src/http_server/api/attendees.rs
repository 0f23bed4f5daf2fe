use axum::extract::{Json, State};
use axum::response::{IntoResponse, Response};
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::envelope::AttendeesEnvelope;
use crate::upstream::ScriptError;
use crate::ServiceState;

pub const HTML_ERROR_MESSAGE: &str = "Apps Script returned HTML error. Please redeploy the script.";
pub const FAILURE_MESSAGE: &str = "Failed to fetch attendees";

/// Fetch the attendee list. Takes no parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, clap::Args)]
pub struct AttendeesRequest;

/// GET /api/attendees
///
/// Passes the sheet's `{success, count, attendees, registered}` JSON through as-is.
pub async fn handler(
    State(state): State<ServiceState>,
) -> Result<impl IntoResponse, AttendeesError> {
    let attendees = state.script().fetch_attendees().await?;

    Ok((http::StatusCode::OK, Json(attendees)).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum AttendeesError {
    #[error("Apps Script error: {0}")]
    Script(#[from] ScriptError),
}

impl IntoResponse for AttendeesError {
    fn into_response(self) -> Response {
        match self {
            AttendeesError::Script(ScriptError::HtmlPage { excerpt }) => {
                tracing::error!("Apps Script returned HTML instead of JSON: {}", excerpt);
                (
                    http::StatusCode::BAD_GATEWAY,
                    Json(AttendeesEnvelope::failure(HTML_ERROR_MESSAGE)),
                )
                    .into_response()
            }
            AttendeesError::Script(e) => {
                tracing::error!("Failed to fetch attendees: {}", e);
                (
                    http::StatusCode::INTERNAL_SERVER_ERROR,
                    Json(AttendeesEnvelope::failure(FAILURE_MESSAGE)),
                )
                    .into_response()
            }
        }
    }
}

// Client implementation - builds request for this operation
impl ApiRequest for AttendeesRequest {
    type Response = serde_json::Value;

    fn build_request(
        self,
        base_url: &Url,
        client: &Client,
    ) -> Result<RequestBuilder, url::ParseError> {
        let full_url = base_url.join("/api/attendees")?;
        Ok(client.get(full_url))
    }
}
