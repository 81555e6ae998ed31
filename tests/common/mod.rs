// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed deployment root and a builder for
// the TOML document. The scripted executor lives in `fake_executor.rs`,
// which the library's unit tests compile as well.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::PathBuf;

use exporter_deploy::config::Config;
use exporter_deploy::exec::{ExecResult, Executor, SystemExecutor};
use toml::{Table, Value};

mod fake_executor;

pub use fake_executor::{Call, FakeExecutor};

/// One `[[exporters]]` entry.
#[derive(Debug, Clone)]
pub struct ServiceSpec {
    pub name: String,
    pub version: String,
    pub dist_url: String,
    pub post_download: String,
    pub install_bin: String,
    pub args: String,
}

impl ServiceSpec {
    /// A service whose download is the binary itself.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            version: "1.0.0".to_string(),
            dist_url: format!("http://dl.test/{name}-{{{{VERSION}}}}"),
            post_download: String::new(),
            install_bin: format!("{name}-{{{{VERSION}}}}"),
            args: "--web.listen-address={{LISTEN_HOST}}:9100".to_string(),
        }
    }

    pub fn post_download(mut self, script: &str) -> Self {
        self.post_download = script.to_string();
        self
    }

    pub fn install_bin(mut self, install_bin: &str) -> Self {
        self.install_bin = install_bin.to_string();
        self
    }

    pub fn dist_url(mut self, dist_url: &str) -> Self {
        self.dist_url = dist_url.to_string();
        self
    }

    fn to_table(&self) -> Table {
        let mut table = Table::new();
        for (key, value) in [
            ("name", &self.name),
            ("version", &self.version),
            ("dist_url", &self.dist_url),
            ("post_download", &self.post_download),
            ("install_bin", &self.install_bin),
            ("args", &self.args),
        ] {
            table.insert(key.to_string(), Value::String(value.clone()));
        }
        table
    }
}

/// An isolated deployment backed by a [`tempfile::TempDir`].
///
/// The configuration lives at `<tmp>/deploy.toml` and `root_dir` is
/// `<tmp>/root`.
#[derive(Debug)]
pub struct DeployFixture {
    /// Temporary directory holding the config and install root.
    pub dir: tempfile::TempDir,
    services: Vec<ServiceSpec>,
}

impl DeployFixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
            services: Vec::new(),
        }
    }

    pub fn service(mut self, spec: ServiceSpec) -> Self {
        self.services.push(spec);
        self
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("deploy.toml")
    }

    pub fn root(&self) -> PathBuf {
        self.dir.path().join("root")
    }

    /// Directory a service named `name` is installed into.
    pub fn exporter_dir(&self, name: &str) -> PathBuf {
        self.root().join(name)
    }

    /// Render the TOML document.
    pub fn document(&self) -> String {
        let mut deploy = Table::new();
        deploy.insert("listen_host".into(), Value::String("127.0.0.1".into()));
        deploy.insert(
            "root_dir".into(),
            Value::String(self.root().display().to_string()),
        );
        deploy.insert("exporter_dir".into(), Value::String("{{NAME}}".into()));
        deploy.insert("log_file".into(), Value::String("current.log".into()));

        let mut document = Table::new();
        document.insert("deploy".into(), Value::Table(deploy));
        document.insert(
            "exporters".into(),
            Value::Array(
                self.services
                    .iter()
                    .map(|s| Value::Table(s.to_table()))
                    .collect(),
            ),
        );
        toml::to_string(&document).expect("serialize document")
    }

    /// Write the document and return its path.
    pub fn write(&self) -> PathBuf {
        let path = self.config_path();
        std::fs::write(&path, self.document()).expect("write deploy.toml");
        path
    }

    /// Write and load the configuration.
    pub fn load(&self) -> Config {
        Config::load(&self.write()).expect("load config")
    }
}
