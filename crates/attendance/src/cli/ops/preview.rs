use std::path::PathBuf;

use clap::Args;

#[derive(Args, Debug, Clone)]
pub struct Preview {
    /// Drive file id
    #[arg(long)]
    pub id: String,

    /// Where to write the downloaded file
    #[arg(long, short)]
    pub output: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("HTTP status {0}: {1}")]
    HttpStatus(reqwest::StatusCode, String),
    #[error("failed to write {0}: {1}")]
    Write(PathBuf, std::io::Error),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Preview {
    type Error = PreviewError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut url = ctx.client.base_url().join("/api/drive-preview")?;
        url.query_pairs_mut().append_pair("id", &self.id);

        let response = ctx.client.http_client().get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PreviewError::HttpStatus(status, response.text().await?));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();
        let bytes = response.bytes().await?;

        tokio::fs::write(&self.output, &bytes)
            .await
            .map_err(|e| PreviewError::Write(self.output.clone(), e))?;

        Ok(format!(
            "wrote {} bytes ({}) to {}",
            bytes.len(),
            content_type,
            self.output.display()
        ))
    }
}
