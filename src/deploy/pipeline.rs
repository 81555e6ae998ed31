//! Per-service provisioning: download, install, and launch-script generation.
use std::fmt;
use std::path::Path;

use anyhow::Result;

use super::plan::ServicePlan;
use super::vars::Formatter;
use crate::config::{DeployConfig, ServiceConfig};
use crate::error::ProvisionError;
use crate::exec::{self, ExecResult, Executor};
use crate::logging::{Log, ScopedLog};

/// Scratch directory name inside each exporter directory.
pub const TEMP_DIR_NAME: &str = "tmp";
/// Launch script file name inside each exporter directory.
pub const RUN_FILE_NAME: &str = "run";

/// A pipeline step whose external command can fail without aborting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// `wget` of the distribution artifact.
    Download,
    /// The configured `post_download` shell snippet.
    PostDownload,
    /// `mv` of the binary into the exporter directory.
    InstallBinary,
    /// `chmod +x` of the installed binary.
    FixPermissions,
    /// `chmod +x` of the launch script.
    LaunchScript,
    /// `rm -rf` of the temp directory.
    Cleanup,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Download => "download",
            Self::PostDownload => "post-download",
            Self::InstallBinary => "install binary",
            Self::FixPermissions => "fix permissions",
            Self::LaunchScript => "launch script",
            Self::Cleanup => "cleanup",
        })
    }
}

/// Outcome of a pipeline that ran to completion.
///
/// Failed steps were logged and skipped over; the service may be only
/// partially provisioned.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProvisionReport {
    /// Steps whose external command failed, in execution order.
    pub failed_steps: Vec<Step>,
}

impl ProvisionReport {
    /// `true` if every external command succeeded.
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failed_steps.is_empty()
    }

    /// Log and record a failed command; successes pass through silently.
    fn observe(&mut self, log: &dyn Log, step: Step, result: Result<ExecResult>) {
        match result {
            Ok(output) => {
                if !output.stdout.trim().is_empty() {
                    log.debug(output.stdout.trim());
                }
            }
            Err(err) => {
                log.error(&format!("{step} failed: {err:#}"));
                self.failed_steps.push(step);
            }
        }
    }
}

/// File name of the artifact behind `url`: its last path segment, without
/// any query string or fragment.
#[must_use]
pub fn artifact_name(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    let path = url.get(..end).unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path)
}

/// Render the execline launch script.
#[must_use]
pub fn launch_script(log_file: &str, binary: &Path, args: &str) -> String {
    format!(
        "#!/bin/execlineb -P\n\
         redirfd -a 1 {log_file}\n\
         redirfd -a 2 {log_file}\n\
         {} {args}\n",
        binary.display()
    )
}

/// Provision one service.
///
/// Templates are resolved by [`ServicePlan::resolve`], the same code the
/// `plan` command uses, so `{{DIST_FILE}}` is available from the
/// post-download hook onward. Steps then run in a fixed order. External
/// command failures are logged and recorded in the returned report without
/// stopping the pipeline, and cleanup always runs once the launch script is
/// written.
///
/// # Errors
///
/// Returns [`ProvisionError::BinaryNotFound`] if `install_bin` is absent
/// after download, or [`ProvisionError::Io`] if a directory or the launch
/// script cannot be written.
pub fn provision(
    service: &ServiceConfig,
    deploy: &DeployConfig,
    formatter: Formatter,
    executor: &dyn Executor,
    log: &dyn Log,
) -> Result<ProvisionReport, ProvisionError> {
    let log = ScopedLog::new(log, &service.name);
    let plan = ServicePlan::resolve(service, deploy, formatter);
    let mut report = ProvisionReport::default();

    make_dirs(&plan.exporter_dir)?;
    make_dirs(&plan.temp_dir)?;

    log.info(&format!("Downloading package {}...", plan.dist_file.display()));
    report.observe(
        &log,
        Step::Download,
        executor.run(
            "wget",
            &["-O", &plan.dist_file.to_string_lossy(), &plan.dist_url],
        ),
    );

    if let Some(script) = &plan.post_download {
        log.info("Running post download script...");
        log.debug(script);
        report.observe(
            &log,
            Step::PostDownload,
            exec::run_shell_in(executor, &plan.temp_dir, script),
        );
    }

    if !plan.install_bin.exists() {
        return Err(ProvisionError::BinaryNotFound {
            install_bin: service.install_bin.clone(),
            path: plan.install_bin,
        });
    }
    report.observe(
        &log,
        Step::InstallBinary,
        executor.run(
            "mv",
            &[
                &plan.install_bin.to_string_lossy(),
                &plan.target_bin.to_string_lossy(),
            ],
        ),
    );

    log.info("Fixing permission...");
    if plan.target_bin.exists() {
        report.observe(
            &log,
            Step::FixPermissions,
            executor.run("chmod", &["+x", &plan.target_bin.to_string_lossy()]),
        );
    }

    log.info("Generating s6 run file...");
    std::fs::write(&plan.run_file, &plan.launch_script).map_err(|source| {
        ProvisionError::Io {
            action: "write launch script",
            path: plan.run_file.clone(),
            source,
        }
    })?;
    report.observe(
        &log,
        Step::LaunchScript,
        executor.run("chmod", &["+x", &plan.run_file.to_string_lossy()]),
    );

    log.info("Cleaning up...");
    report.observe(
        &log,
        Step::Cleanup,
        executor.run("rm", &["-rf", &plan.temp_dir.to_string_lossy()]),
    );

    Ok(report)
}

/// Create `path` and any missing parents; an existing directory is fine.
fn make_dirs(path: &Path) -> Result<(), ProvisionError> {
    std::fs::create_dir_all(path).map_err(|source| ProvisionError::Io {
        action: "create directory",
        path: path.to_path_buf(),
        source,
    })
}
