pub mod health;
pub mod preview;
pub mod serve;
pub mod sheet;
pub mod version;

pub use health::Health;
pub use preview::Preview;
pub use serve::Serve;
pub use version::Version;
