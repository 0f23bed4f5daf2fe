use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use url::Url;

/// Drive endpoint that serves raw file bytes for a file id.
pub const DEFAULT_DRIVE_BASE_URL: &str = "https://drive.google.com/uc";

/// User-Agent sent with every Drive request.
pub const DEFAULT_DRIVE_USER_AGENT: &str = "Mozilla/5.0 (compatible; LiceoAttendance/1.0)";

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct Config {
    // http server configuration
    /// address for the API server to listen on
    pub listen_addr: SocketAddr,

    // upstream configuration
    /// raw Apps Script deployment URL as supplied by the operator,
    ///  validated when the service state is built
    pub apps_script_url: Option<String>,
    /// base of the Drive download endpoint
    pub drive_base_url: Url,
    pub drive_user_agent: String,

    // logging
    pub log_level: tracing::Level,
    /// Directory for log files (optional, logs to stdout only if not set)
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), DEFAULT_PORT),
            apps_script_url: None,
            drive_base_url: Url::parse(DEFAULT_DRIVE_BASE_URL)
                .expect("hardcoded URL must parse"),
            drive_user_agent: DEFAULT_DRIVE_USER_AGENT.to_string(),
            log_level: tracing::Level::INFO,
            log_dir: None,
        }
    }
}
