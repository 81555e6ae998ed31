//! Shared fixtures for deployment unit tests.
use crate::config::ServiceConfig;
use crate::exec::{ExecResult, Executor, SystemExecutor};

#[path = "../../tests/common/fake_executor.rs"]
mod fake_executor;

pub use fake_executor::{Call, FakeExecutor};

/// A service with no hook and no arguments.
pub fn service(name: &str, dist_url: &str, install_bin: &str) -> ServiceConfig {
    ServiceConfig {
        name: name.to_string(),
        version: "1.8.2".to_string(),
        dist_url: dist_url.to_string(),
        post_download: String::new(),
        install_bin: install_bin.to_string(),
        args: String::new(),
    }
}
