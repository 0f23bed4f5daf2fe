//! Drive download proxy.
//!
//! Files must be shared as "anyone with the link can view"; they are fetched
//! anonymously and streamed back to the caller without buffering.

use std::fmt;
use std::sync::LazyLock;

use axum::body::Body;
use http::{HeaderValue, StatusCode};
use regex::Regex;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Response};
use url::Url;

static FILE_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").unwrap());

const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A Drive file id restricted to characters that cannot escape the
/// `id` query parameter of the download URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileId(String);

impl FileId {
    pub fn parse(raw: &str) -> Option<Self> {
        FILE_ID_REGEX
            .is_match(raw)
            .then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone)]
pub struct DriveClient {
    client: Client,
    base_url: Url,
    user_agent: String,
}

impl DriveClient {
    pub fn new(client: Client, base_url: Url, user_agent: String) -> Self {
        Self {
            client,
            base_url,
            user_agent,
        }
    }

    pub fn download_url(&self, id: &FileId) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("export", "download")
            .append_pair("id", id.as_str());
        url
    }

    pub async fn fetch(&self, id: &FileId) -> Result<DriveFile, DriveError> {
        let response = self
            .client
            .get(self.download_url(id))
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(DriveError::Status(status));
        }

        Ok(DriveFile { response })
    }
}

/// A successful Drive reply whose body has not been read yet.
pub struct DriveFile {
    response: Response,
}

impl DriveFile {
    pub fn content_type(&self) -> HeaderValue {
        self.response
            .headers()
            .get(CONTENT_TYPE)
            .cloned()
            .unwrap_or_else(|| HeaderValue::from_static(DEFAULT_CONTENT_TYPE))
    }

    /// Hand the upstream byte stream to axum as-is.
    pub fn into_body(self) -> Body {
        Body::from_stream(self.response.bytes_stream())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DriveError {
    #[error("Drive returned {}", .0.as_u16())]
    Status(StatusCode),
    #[error("Drive request failed: {0}")]
    Transport(#[from] reqwest::Error),
}
