//! Exporter deployment engine.
//!
//! Reads a declarative TOML description of metrics exporters and, for each
//! one, downloads its release artifact, installs the binary, and writes an
//! s6/execline launch script.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]**: decode the TOML document into typed records and
//!   normalize its paths
//! - **[`deploy`]**: `{{NAME}}` substitution and the per-service
//!   provisioning pipeline
//! - **[`commands`]**: top-level subcommand orchestration (`deploy`, `plan`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod deploy;
pub mod error;
pub mod exec;
pub mod logging;
