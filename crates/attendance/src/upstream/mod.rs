//! Outbound clients for the two services this proxy fronts.

pub mod drive;
pub mod script;

pub use drive::{DriveClient, DriveError, DriveFile, FileId};
pub use script::{ScriptClient, ScriptEndpoint, ScriptError};
