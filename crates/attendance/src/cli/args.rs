pub use clap::Parser;

use url::Url;

#[derive(Parser, Debug)]
#[command(name = "liceo")]
#[command(about = "Attendance proxy for the Apps Script sheet and Drive previews")]
#[command(version)]
pub struct Args {
    /// Base URL of a running proxy, used by the client subcommands
    #[arg(long, global = true, default_value = "http://localhost:3000")]
    pub remote: Url,

    #[command(subcommand)]
    pub command: crate::Command,
}
