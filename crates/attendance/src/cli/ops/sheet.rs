//! Client subcommands for the sheet-backed endpoints of a running proxy.

use liceo_attendance::http_server::api::client::ApiError;
use liceo_attendance::http_server::api::{
    AttendeesRequest, MarkAttendanceRequest, RevokePaymentRequest,
};

#[derive(Debug, thiserror::Error)]
pub enum SheetOpError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("failed to format reply: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Rejected(String),
}

/// Pretty-print a sheet reply, turning `success: false` into an error.
fn render(reply: serde_json::Value) -> Result<String, SheetOpError> {
    if reply.get("success").and_then(|v| v.as_bool()) == Some(false) {
        let reason = reply
            .get("message")
            .or_else(|| reply.get("error"))
            .and_then(|v| v.as_str())
            .unwrap_or("sheet rejected the request");
        return Err(SheetOpError::Rejected(reason.to_string()));
    }

    Ok(serde_json::to_string_pretty(&reply)?)
}

#[async_trait::async_trait]
impl crate::cli::op::Op for AttendeesRequest {
    type Error = SheetOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let reply = ctx.client.call(self.clone()).await?;
        render(reply)
    }
}

#[async_trait::async_trait]
impl crate::cli::op::Op for MarkAttendanceRequest {
    type Error = SheetOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let reply = ctx.client.call(self.clone()).await?;
        render(reply)
    }
}

#[async_trait::async_trait]
impl crate::cli::op::Op for RevokePaymentRequest {
    type Error = SheetOpError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let reply = ctx.client.call(self.clone()).await?;
        render(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    #[test]
    fn test_render_success() {
        let out = render(json!({"success": true, "count": 1})).unwrap();
        assert!(out.contains("\"count\": 1"));
    }

    #[test]
    fn test_render_rejection_uses_message() {
        let err = render(json!({"success": false, "message": "Already scanned"})).unwrap_err();
        assert_eq!(err.to_string(), "Already scanned");

        let err = render(json!({"success": false, "error": "boom"})).unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }
}
