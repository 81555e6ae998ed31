//! Command: download, install, and supervise every configured exporter.
use anyhow::{Context as _, Result};

use crate::cli::GlobalOpts;
use crate::config::Config;
use crate::deploy::{self, Formatter, ProvisionReport};
use crate::error::DeployError;
use crate::exec::{Executor, SystemExecutor};
use crate::logging::{Log, Logger, ServiceEntry, ServiceStatus};

/// Run the deploy command.
///
/// # Errors
///
/// Returns an error if a required tool is missing, the configuration cannot
/// be loaded, or a service hits a fatal pipeline error.
pub fn run(global: &GlobalOpts, log: &Logger) -> Result<()> {
    let executor = SystemExecutor;
    log.info(&format!("exporter-deploy {}", super::version::version()));

    super::preflight(&executor)?;
    let config = super::load_config(global, log)?;

    let outcome = deploy_all(&config, &executor, log);
    log.print_summary();
    outcome.context("deployment aborted")
}

/// Provision every service in declared order.
///
/// Each service's result is recorded on `log` for the summary. The first
/// fatal error stops the run; later services are not attempted.
///
/// # Errors
///
/// Returns [`DeployError::RootDir`] if the install root cannot be created,
/// or [`DeployError::Provision`] for the first service that fails fatally.
pub fn deploy_all(
    config: &Config,
    executor: &dyn Executor,
    log: &dyn Log,
) -> Result<(), DeployError> {
    let root = &config.deploy.root_dir;
    std::fs::create_dir_all(root).map_err(|source| DeployError::RootDir {
        path: root.clone(),
        source,
    })?;

    for service in &config.exporters {
        log.stage(&format!("Deploying {}...", service.name));
        let formatter = Formatter::new(service, &config.deploy);
        match deploy::provision(service, &config.deploy, formatter, executor, log) {
            Ok(report) => log.record_service(entry_for(&service.name, &report)),
            Err(source) => {
                log.record_service(ServiceEntry {
                    name: service.name.clone(),
                    status: ServiceStatus::Failed,
                    message: Some(source.to_string()),
                });
                return Err(DeployError::Provision {
                    service: service.name.clone(),
                    source,
                });
            }
        }
    }
    Ok(())
}

fn entry_for(name: &str, report: &ProvisionReport) -> ServiceEntry {
    if report.is_clean() {
        return ServiceEntry {
            name: name.to_string(),
            status: ServiceStatus::Ok,
            message: None,
        };
    }
    let steps: Vec<String> = report.failed_steps.iter().map(ToString::to_string).collect();
    ServiceEntry {
        name: name.to_string(),
        status: ServiceStatus::Partial,
        message: Some(steps.join(", ")),
    }
}
