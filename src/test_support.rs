//! Mocks shared across unit tests.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::sources::SourceProvider;
use crate::util::process::{CommandRunner, ProcessBuilder, ProcessOutput};

/// A [`CommandRunner`] that records every invocation instead of spawning
/// processes. Doubles as the process-invocation counter for tests that
/// assert nothing external was started.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    invocations: RefCell<Vec<String>>,
    capture_stdout: String,
    fail_matching: Option<String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        RecordingRunner::default()
    }

    /// Stdout returned by every captured invocation.
    pub fn with_capture_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.capture_stdout = stdout.into();
        self
    }

    /// Make streamed invocations whose command line contains `fragment`
    /// exit with code 1.
    pub fn fail_matching(mut self, fragment: impl Into<String>) -> Self {
        self.fail_matching = Some(fragment.into());
        self
    }

    /// All recorded command lines, in invocation order.
    pub fn invocations(&self) -> Vec<String> {
        self.invocations.borrow().clone()
    }

    fn record(&self, cmd: &ProcessBuilder) -> String {
        let line = cmd.display_command();
        self.invocations.borrow_mut().push(line.clone());
        line
    }
}

impl CommandRunner for RecordingRunner {
    fn capture(&self, cmd: &ProcessBuilder) -> Result<ProcessOutput> {
        self.record(cmd);
        Ok(ProcessOutput {
            code: 0,
            stdout: self.capture_stdout.clone(),
            stderr: String::new(),
        })
    }

    fn stream(&self, cmd: &ProcessBuilder) -> Result<i32> {
        let line = self.record(cmd);
        match &self.fail_matching {
            Some(fragment) if line.contains(fragment.as_str()) => Ok(1),
            _ => Ok(0),
        }
    }

    fn find_tool(&self, name: &str) -> Option<PathBuf> {
        Some(PathBuf::from(name))
    }
}

/// A [`SourceProvider`] that hands out a pre-built directory instead of
/// touching the network.
pub struct FixedSourceProvider {
    dir: PathBuf,
}

impl FixedSourceProvider {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        FixedSourceProvider {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

impl SourceProvider for FixedSourceProvider {
    fn checkout(
        &self,
        _remote: &str,
        _reference: &str,
        _shallow: bool,
        _cache_dir: &Path,
    ) -> Result<PathBuf> {
        Ok(self.dir.clone())
    }
}
