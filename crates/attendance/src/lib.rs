//! Backend proxy for the attendance web client.
//!
//! The browser talks to this service instead of talking to its upstreams directly:
//! - the Apps Script deployment that owns the attendee sheet (attendee list,
//!   attendance marking, payment revocation)
//! - Google Drive, whose frame-ancestors policy blocks embedding shared files

pub mod http_server;
pub mod process;
pub mod service_config;
pub mod service_state;
pub mod upstream;
pub mod version;

pub use process::{spawn_service, start_service, ShutdownHandle};
pub use service_config::Config as ServiceConfig;
pub use service_state::{State as ServiceState, StateSetupError};
pub use version::{build_info, BuildInfo};
