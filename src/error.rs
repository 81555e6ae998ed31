//! Domain-specific error types for the deployment engine.
//!
//! Internal modules return typed errors (e.g., [`ConfigError`],
//! [`ProvisionError`]) while command handlers at the CLI boundary convert them
//! to [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! DeployError
//! ├── Config(ConfigError)          : document read, syntax, schema decoding
//! ├── MissingExecutable(String)    : preflight tool lookup
//! ├── RootDir { path, .. }         : install root creation
//! └── Provision { service, .. }    : fatal per-service pipeline failure
//! ```
//!
//! External command failures inside the pipeline are *not* errors at this
//! level: they are logged and collected in a
//! [`ProvisionReport`](crate::deploy::pipeline::ProvisionReport).

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for a deployment run.
#[derive(Error, Debug)]
pub enum DeployError {
    /// The configuration document could not be read or decoded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A required external tool is not on `PATH`.
    #[error("Required executable '{0}' not found on PATH")]
    MissingExecutable(String),

    /// The install root could not be created.
    #[error("Cannot create root directory {}: {source}", .path.display())]
    RootDir {
        /// The normalized `root_dir`.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A service pipeline hit a fatal condition.
    #[error("Deploying '{service}' failed: {source}")]
    Provision {
        /// Name of the service being deployed.
        service: String,
        /// Underlying pipeline error.
        source: ProvisionError,
    },
}

/// Errors that arise while reading and decoding the configuration document.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file does not exist.
    #[error("{} not found", .0.display())]
    NotFound(PathBuf),

    /// An I/O error occurred while reading the configuration file.
    #[error("IO error reading config file {path}: {source}")]
    Io {
        /// Path to the file that could not be read.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// `root_dir` starts with `~` but no home directory could be found.
    #[error("cannot expand {}: home directory is unknown", .0.display())]
    NoHome(PathBuf),

    /// The file is not valid TOML.
    #[error("Invalid TOML in {path}: {message}")]
    Parse {
        /// Path to the offending file.
        path: String,
        /// Parser diagnostic.
        message: String,
    },

    /// A required key is absent from a mapping.
    #[error("missing field '{path}'")]
    MissingField {
        /// Dotted path of the absent field (e.g. `exporters[0].name`).
        path: String,
    },

    /// A value does not have the shape the schema declares, or a scalar
    /// could not be coerced.
    #[error("field '{path}': expected {expected}, found {found}")]
    Type {
        /// Dotted path of the offending field.
        path: String,
        /// What the schema wanted.
        expected: &'static str,
        /// Description of what the document held.
        found: String,
    },
}

/// Fatal errors inside one service's provisioning pipeline.
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// The binary named by `install_bin` is not present after download and
    /// the post-download hook.
    #[error("install_bin \"{install_bin}\" not found at {}", .path.display())]
    BinaryNotFound {
        /// The unresolved `install_bin` template from the configuration.
        install_bin: String,
        /// Where the binary was expected.
        path: PathBuf,
    },

    /// A filesystem operation performed in-process failed.
    #[error("{action} {}: {source}", .path.display())]
    Io {
        /// What was being attempted (e.g. `"create directory"`).
        action: &'static str,
        /// Path the operation targeted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
