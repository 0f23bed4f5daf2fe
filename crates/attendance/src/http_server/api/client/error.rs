use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request to proxy failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid proxy URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("proxy answered {}: {message}", .status.as_u16())]
    Status { status: StatusCode, message: String },
}

impl ApiError {
    /// Error for a non-2xx reply. Failure envelopes carry their reason in
    /// `message` or `error`; anything else is reported as the raw body.
    pub fn from_reply(status: StatusCode, body: String) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|reply| {
                reply
                    .get("message")
                    .or_else(|| reply.get("error"))
                    .and_then(|v| v.as_str())
                    .map(str::to_string)
            })
            .unwrap_or(body);

        ApiError::Status { status, message }
    }
}
