use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::Args;
use url::Url;

use liceo_attendance::service_config::{
    DEFAULT_DRIVE_BASE_URL, DEFAULT_DRIVE_USER_AGENT, DEFAULT_PORT,
};
use liceo_attendance::{spawn_service, ServiceConfig};

#[derive(Args, Debug, Clone)]
pub struct Serve {
    /// Port for the API server
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind the API server to
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub host: IpAddr,

    /// Apps Script deployment URL used by every sheet-backed endpoint
    #[arg(long, env = "APPS_SCRIPT_URL", hide_env_values = true)]
    pub apps_script_url: Option<String>,

    /// Drive download endpoint
    #[arg(long, default_value = DEFAULT_DRIVE_BASE_URL)]
    pub drive_base_url: Url,

    /// User-Agent sent to Drive
    #[arg(long, default_value = DEFAULT_DRIVE_USER_AGENT)]
    pub drive_user_agent: String,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: tracing::Level,

    /// Directory for log files (logs to stdout only if not set)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ServeError {
    #[error("serve failed: {0}")]
    Failed(String),
}

impl Serve {
    fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            listen_addr: SocketAddr::new(self.host, self.port),
            apps_script_url: self.apps_script_url.clone(),
            drive_base_url: self.drive_base_url.clone(),
            drive_user_agent: self.drive_user_agent.clone(),
            log_level: self.log_level,
            log_dir: self.log_dir.clone(),
        }
    }
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Serve {
    type Error = ServeError;
    type Output = String;

    async fn execute(&self, _ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        spawn_service(&self.service_config()).await;
        Ok("server stopped".to_string())
    }
}
