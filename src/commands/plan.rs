//! Command: show what `deploy` would do without doing it.
use std::fmt::Write as _;

use anyhow::Result;

use crate::cli::{GlobalOpts, PlanOpts};
use crate::deploy::{DeploymentPlan, ServicePlan};
use crate::logging::Logger;

/// Run the plan command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or the plan
/// cannot be serialized.
pub fn run(global: &GlobalOpts, opts: &PlanOpts, log: &Logger) -> Result<()> {
    let config = super::load_config(global, log)?;
    let plan = DeploymentPlan::new(&config);
    if opts.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print!("{}", render(&plan));
    }
    Ok(())
}

/// Human-readable rendering of `plan`.
#[must_use]
pub fn render(plan: &DeploymentPlan) -> String {
    let mut out = format!("root: {}\n", plan.root_dir.display());
    for service in &plan.services {
        render_service(&mut out, service);
    }
    out
}

fn render_service(out: &mut String, service: &ServicePlan) {
    let _ = writeln!(out, "\n{}", service.name);
    let _ = writeln!(out, "  directory:     {}", service.exporter_dir.display());
    let _ = writeln!(out, "  download:      {}", service.dist_url);
    let _ = writeln!(out, "  save as:       {}", service.dist_file.display());
    match &service.post_download {
        Some(script) => {
            let _ = writeln!(out, "  post-download: {script}");
        }
        None => {
            let _ = writeln!(out, "  post-download: (none)");
        }
    }
    let _ = writeln!(
        out,
        "  install:       {} -> {}",
        service.install_bin.display(),
        service.target_bin.display()
    );
    let _ = writeln!(out, "  log file:      {}", service.log_file);
    let _ = writeln!(out, "  {}:", service.run_file.display());
    for line in service.launch_script.lines() {
        let _ = writeln!(out, "    {line}");
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::{DeployConfig, ServiceConfig};
    use std::path::PathBuf;

    #[test]
    fn renders_service_details() {
        let deploy = DeployConfig {
            listen_host: "127.0.0.1".to_string(),
            root_dir: PathBuf::from("/srv"),
            exporter_dir: "/srv/{{NAME}}".to_string(),
            log_file: "/srv/{{NAME}}/current".to_string(),
        };
        let service = ServiceConfig {
            name: "node".to_string(),
            version: "1.0".to_string(),
            dist_url: "http://x/node-{{VERSION}}".to_string(),
            post_download: String::new(),
            install_bin: "node-{{VERSION}}".to_string(),
            args: "--port=9100".to_string(),
        };
        let plan = DeploymentPlan {
            root_dir: deploy.root_dir.clone(),
            services: vec![ServicePlan::new(&service, &deploy)],
        };

        insta::assert_snapshot!(render(&plan), @r"
        root: /srv

        node
          directory:     /srv/node
          download:      http://x/node-1.0
          save as:       /srv/node/tmp/node-1.0
          post-download: (none)
          install:       /srv/node/tmp/node-1.0 -> /srv/node/node
          log file:      /srv/node/current
          /srv/node/run:
            #!/bin/execlineb -P
            redirfd -a 1 /srv/node/current
            redirfd -a 2 /srv/node/current
            /srv/node/node --port=9100
        ");
    }
}
