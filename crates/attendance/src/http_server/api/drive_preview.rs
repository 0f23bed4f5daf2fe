use axum::extract::{RawQuery, State};
use axum::response::{IntoResponse, Response};
use http::header::{CACHE_CONTROL, CONTENT_TYPE};
use http::{HeaderValue, StatusCode};

use crate::upstream::{DriveError, FileId};
use crate::ServiceState;

/// Lets the browser reuse a preview for five minutes without sharing it
/// with intermediate caches.
pub const CACHE_POLICY: &str = "private, max-age=300";

pub const INVALID_ID_MESSAGE: &str = "Invalid id";
pub const FAILURE_MESSAGE: &str = "Failed to load file";

/// GET /api/drive-preview?id=<drive file id>
///
/// Streams a publicly shared Drive file back under this origin so it can be
/// embedded in an `<iframe>` or `<img>`.
pub async fn handler(
    State(state): State<ServiceState>,
    RawQuery(query): RawQuery,
) -> Result<Response, DrivePreviewError> {
    let id = query
        .as_deref()
        .and_then(first_id)
        .and_then(|raw| FileId::parse(&raw))
        .ok_or(DrivePreviewError::InvalidId)?;

    tracing::debug!("DRIVE PREVIEW: fetching file {}", id);
    let file = state.drive().fetch(&id).await?;
    let content_type = file.content_type();

    Ok((
        StatusCode::OK,
        [
            (CONTENT_TYPE, content_type),
            (CACHE_CONTROL, HeaderValue::from_static(CACHE_POLICY)),
        ],
        file.into_body(),
    )
        .into_response())
}

/// First `id` pair of the query string, percent-decoded.
fn first_id(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value.into_owned())
}

#[derive(Debug, thiserror::Error)]
pub enum DrivePreviewError {
    #[error("Invalid id")]
    InvalidId,
    #[error(transparent)]
    Drive(#[from] DriveError),
}

impl IntoResponse for DrivePreviewError {
    fn into_response(self) -> Response {
        match self {
            DrivePreviewError::InvalidId => {
                (StatusCode::BAD_REQUEST, INVALID_ID_MESSAGE).into_response()
            }
            DrivePreviewError::Drive(e @ DriveError::Status(_)) => {
                tracing::warn!("Drive proxy error: {}", e);
                (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
            }
            DrivePreviewError::Drive(e) => {
                tracing::error!("Drive proxy error: {}", e);
                (StatusCode::BAD_GATEWAY, FAILURE_MESSAGE).into_response()
            }
        }
    }
}
