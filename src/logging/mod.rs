//! Logging infrastructure for console output.

mod logger;
mod subscriber;
mod types;

pub use logger::{Logger, ScopedLog};
pub use subscriber::init_subscriber;
#[cfg(test)]
pub use types::MockLog;
pub use types::{Log, ServiceEntry, ServiceStatus};

/// Tracing target for stage headers (`==> ...`).
pub(crate) const STAGE_TARGET: &str = "exporter_deploy::stage";
