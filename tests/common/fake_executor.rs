// Scripted `Executor` shared by unit and integration tests.
//
// `wget` is served from an in-memory URL table and every other program runs
// for real. The including module must bring `ExecResult`, `Executor`, and
// `SystemExecutor` into scope.
#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use super::{ExecResult, Executor, SystemExecutor};

/// One recorded executor invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub program: String,
    pub args: Vec<String>,
    pub dir: Option<PathBuf>,
}

/// Executor that fakes `wget` and records every call.
///
/// Unknown URLs fail like a 404. Programs listed with
/// [`FakeExecutor::failing`] fail without running.
#[derive(Debug, Default)]
pub struct FakeExecutor {
    downloads: HashMap<String, String>,
    failing: Vec<String>,
    missing: Vec<String>,
    calls: RefCell<Vec<Call>>,
}

impl FakeExecutor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `content` for `url`.
    #[must_use]
    pub fn with_download(mut self, url: &str, content: &str) -> Self {
        self.downloads.insert(url.to_string(), content.to_string());
        self
    }

    /// Make every invocation of `program` fail.
    #[must_use]
    pub fn failing(mut self, program: &str) -> Self {
        self.failing.push(program.to_string());
        self
    }

    /// Report `program` as absent from `PATH`.
    #[must_use]
    pub fn without(mut self, program: &str) -> Self {
        self.missing.push(program.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn programs(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|c| c.program.clone()).collect()
    }

    /// Number of recorded invocations of `program`.
    pub fn count(&self, program: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.program == program)
            .count()
    }

    fn dispatch(&self, dir: Option<&Path>, program: &str, args: &[&str]) -> Result<ExecResult> {
        self.calls.borrow_mut().push(Call {
            program: program.to_string(),
            args: args.iter().map(ToString::to_string).collect(),
            dir: dir.map(Path::to_path_buf),
        });
        if self.failing.iter().any(|p| p == program) {
            bail!("{program} failed (exit 1): scripted failure");
        }
        if program == "wget" {
            return self.download(args);
        }
        dir.map_or_else(
            || SystemExecutor.run(program, args),
            |dir| SystemExecutor.run_in(dir, program, args),
        )
    }

    fn download(&self, args: &[&str]) -> Result<ExecResult> {
        let ["-O", dest, url] = args else {
            bail!("unexpected wget arguments: {args:?}");
        };
        let Some(content) = self.downloads.get(*url) else {
            bail!("wget failed (exit 8): {url}: 404 Not Found");
        };
        std::fs::write(dest, content)?;
        Ok(ExecResult {
            stdout: String::new(),
            stderr: String::new(),
            success: true,
            code: Some(0),
        })
    }
}

impl Executor for FakeExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult> {
        self.dispatch(None, program, args)
    }

    fn run_in(&self, dir: &Path, program: &str, args: &[&str]) -> Result<ExecResult> {
        self.dispatch(Some(dir), program, args)
    }

    fn which(&self, program: &str) -> bool {
        !self.missing.iter().any(|p| p == program)
    }
}
