//! Deployment configuration: schema, loading, and path normalization.
pub mod loader;
pub mod paths;

use std::path::{Path, PathBuf};

use toml::Table;

use crate::error::ConfigError;
use loader::record;

/// Configuration file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "deploy.toml";

record! {
    /// Host-wide settings shared by every exporter.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct DeployConfig {
        /// Address exporters should bind to, exposed as `{{LISTEN_HOST}}`.
        pub listen_host: String,
        /// Root of the install tree. Absolute after loading.
        pub root_dir: PathBuf,
        /// Per-exporter directory template, relative to `root_dir`.
        pub exporter_dir: String,
        /// Log file template, relative to the exporter directory.
        pub log_file: String,
    }
}

record! {
    /// One exporter to download, install, and supervise.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct ServiceConfig {
        /// Identifier, also used as the installed binary's file name.
        pub name: String,
        /// Opaque version string, exposed as `{{VERSION}}`.
        pub version: String,
        /// Download URL template.
        pub dist_url: String,
        /// Shell snippet run in the temp dir after download; empty skips it.
        pub post_download: String,
        /// Path template of the binary inside the temp dir.
        pub install_bin: String,
        /// Argument template passed to the binary by the launch script.
        pub args: String,
    }
}

record! {
    /// The whole deployment document.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Config {
        /// Host-wide settings (`[deploy]`).
        pub deploy: DeployConfig,
        /// Exporters in deployment order (`[[exporters]]`).
        pub exporters: Vec<ServiceConfig>,
    }
}

impl Config {
    /// Read, decode, and normalize the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotFound`] if the file does not exist,
    /// [`ConfigError::Io`] or [`ConfigError::Parse`] if it cannot be read as
    /// TOML, or a schema error from [`Config::from_document`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let document: Table = content.parse().map_err(|e: toml::de::Error| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.message().to_string(),
        })?;
        Self::from_document(&document)
    }

    /// Decode an already-parsed document and normalize its paths against the
    /// process's working directory and `HOME`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] or [`ConfigError::Type`] if the
    /// document does not match the schema, [`ConfigError::Io`] if the
    /// working directory cannot be determined, or [`ConfigError::NoHome`]
    /// if `root_dir` needs a home directory that cannot be found.
    pub fn from_document(document: &Table) -> Result<Self, ConfigError> {
        let config: Self = loader::load(document)?;
        let cwd = std::env::current_dir().map_err(|source| ConfigError::Io {
            path: "current directory".to_string(),
            source,
        })?;
        config.normalized(&cwd, paths::home_dir().as_deref())
    }

    /// Resolve every deploy path to absolute form.
    ///
    /// `root_dir` is home-expanded and made absolute; `exporter_dir` is then
    /// resolved under it and `log_file` under that. Placeholders are kept.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoHome`] if `root_dir` starts with `~` and
    /// `home` is `None`.
    pub fn normalized(mut self, cwd: &Path, home: Option<&Path>) -> Result<Self, ConfigError> {
        let deploy = &mut self.deploy;
        let root_dir = paths::expand_home(&deploy.root_dir, home)
            .ok_or_else(|| ConfigError::NoHome(deploy.root_dir.clone()))?;
        deploy.root_dir = paths::absolutize(&root_dir, cwd);
        let exporter_dir = paths::absolutize(&deploy.root_dir.join(&deploy.exporter_dir), cwd);
        let log_file = paths::absolutize(&exporter_dir.join(&deploy.log_file), cwd);
        deploy.exporter_dir = exporter_dir.to_string_lossy().into_owned();
        deploy.log_file = log_file.to_string_lossy().into_owned();
        Ok(self)
    }
}
