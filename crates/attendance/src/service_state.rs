use reqwest::Client;

use crate::service_config::Config;
use crate::upstream::{DriveClient, ScriptClient, ScriptEndpoint};

/// Main service state - the upstream clients every handler shares
#[derive(Clone, Debug)]
pub struct State {
    script: ScriptClient,
    drive: DriveClient,
}

impl State {
    pub fn from_config(config: &Config) -> Result<Self, StateSetupError> {
        // 1. Shared connection pool; reqwest follows redirects by default
        let client = Client::builder().build()?;

        // 2. Apps Script endpoint, shared by every sheet-backed handler
        let endpoint = ScriptEndpoint::from_setting(config.apps_script_url.as_deref());
        match endpoint.url() {
            Some(url) => tracing::info!(host = ?url.host_str(), "Apps Script endpoint configured"),
            None => tracing::warn!(
                "APPS_SCRIPT_URL is not configured; sheet-backed endpoints will fail until it is set"
            ),
        }

        // 3. Drive download proxy
        let drive = DriveClient::new(
            client.clone(),
            config.drive_base_url.clone(),
            config.drive_user_agent.clone(),
        );

        Ok(Self {
            script: ScriptClient::new(client, endpoint),
            drive,
        })
    }

    pub fn script(&self) -> &ScriptClient {
        &self.script
    }

    pub fn drive(&self) -> &DriveClient {
        &self.drive
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}
