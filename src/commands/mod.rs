//! Top-level subcommand orchestration.
pub mod deploy;
pub mod plan;
pub mod version;

use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::error::DeployError;
use crate::exec::Executor;
use crate::logging::Log;

/// External tools that must be on `PATH` before anything else happens.
pub const REQUIRED_EXECUTABLES: [&str; 3] = ["wget", "execlineb", "s6-svscan"];

/// Check that every [`REQUIRED_EXECUTABLES`] entry resolves on `PATH`.
///
/// # Errors
///
/// Returns [`DeployError::MissingExecutable`] naming the first absent tool.
pub fn preflight(executor: &dyn Executor) -> Result<(), DeployError> {
    REQUIRED_EXECUTABLES
        .iter()
        .find(|program| !executor.which(program))
        .map_or(Ok(()), |program| {
            Err(DeployError::MissingExecutable((*program).to_string()))
        })
}

/// Load and normalize the configuration named by `--config`.
///
/// # Errors
///
/// Returns an error if the file is missing, is not valid TOML, or does not
/// match the schema.
pub fn load_config(global: &GlobalOpts, log: &dyn Log) -> Result<Config> {
    log.stage("Loading configuration");
    let config = Config::load(&global.config)
        .map_err(DeployError::from)
        .with_context(|| format!("loading {}", global.config.display()))?;
    log.info(&format!(
        "{} exporter(s) under {}",
        config.exporters.len(),
        config.deploy.root_dir.display()
    ));
    Ok(config)
}
