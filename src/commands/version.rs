//! Command: print version information.

/// Version string, from `DEPLOY_VERSION` at build time when available.
#[must_use]
pub fn version() -> &'static str {
    option_env!("DEPLOY_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the version to stdout.
pub fn run() {
    println!("exporter-deploy {}", version());
}
