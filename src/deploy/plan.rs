//! Side-effect-free preview of what a deployment would do.
use std::path::PathBuf;

use serde::Serialize;

use super::pipeline::{RUN_FILE_NAME, TEMP_DIR_NAME, artifact_name, launch_script};
use super::vars::{self, Formatter};
use crate::config::{Config, DeployConfig, ServiceConfig};

/// Every resolved value the pipeline would use for one service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServicePlan {
    /// Service name.
    pub name: String,
    /// Resolved exporter directory.
    pub exporter_dir: PathBuf,
    /// Scratch directory removed after provisioning.
    pub temp_dir: PathBuf,
    /// Resolved log file path.
    pub log_file: String,
    /// Resolved download URL.
    pub dist_url: String,
    /// Where the artifact is downloaded to (`{{DIST_FILE}}`).
    pub dist_file: PathBuf,
    /// Resolved hook, or `None` when the hook is skipped.
    pub post_download: Option<String>,
    /// Binary expected after the hook has run.
    pub install_bin: PathBuf,
    /// Installed binary path.
    pub target_bin: PathBuf,
    /// Launch script path.
    pub run_file: PathBuf,
    /// Launch script text.
    pub launch_script: String,
}

impl ServicePlan {
    /// Resolve `service` with a fresh [`Formatter`], without touching the
    /// filesystem.
    #[must_use]
    pub fn new(service: &ServiceConfig, deploy: &DeployConfig) -> Self {
        Self::resolve(service, deploy, Formatter::new(service, deploy))
    }

    /// Resolve every template of `service` through `formatter`.
    ///
    /// Templates are resolved in pipeline order, so `{{DIST_FILE}}` is
    /// defined for the hook, `install_bin`, and `args` but not for the
    /// directories or the download URL. [`provision`](super::provision)
    /// acts on the result.
    #[must_use]
    pub fn resolve(service: &ServiceConfig, deploy: &DeployConfig, mut formatter: Formatter) -> Self {
        let exporter_dir = PathBuf::from(formatter.format(&deploy.exporter_dir));
        let log_file = formatter.format(&deploy.log_file);
        let temp_dir = exporter_dir.join(TEMP_DIR_NAME);

        let dist_url = formatter.format(&service.dist_url);
        let dist_file = temp_dir.join(artifact_name(&dist_url));
        formatter.add_variable(vars::DIST_FILE, dist_file.to_string_lossy());

        let post_download =
            (!service.post_download.is_empty()).then(|| formatter.format(&service.post_download));
        let install_bin = temp_dir.join(formatter.format(&service.install_bin));
        let target_bin = exporter_dir.join(&service.name);
        let launch_script = launch_script(&log_file, &target_bin, &formatter.format(&service.args));

        Self {
            name: service.name.clone(),
            run_file: exporter_dir.join(RUN_FILE_NAME),
            exporter_dir,
            temp_dir,
            log_file,
            dist_url,
            dist_file,
            post_download,
            install_bin,
            target_bin,
            launch_script,
        }
    }
}

/// Plans for every configured service, in deployment order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentPlan {
    /// Absolute install root.
    pub root_dir: PathBuf,
    /// Per-service plans.
    pub services: Vec<ServicePlan>,
}

impl DeploymentPlan {
    /// Plan every service in `config`.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            root_dir: config.deploy.root_dir.clone(),
            services: config
                .exporters
                .iter()
                .map(|service| ServicePlan::new(service, &config.deploy))
                .collect(),
        }
    }
}
