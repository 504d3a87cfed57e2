//! Shared test utilities for the installer crate.

use crate::artefact::ArchiveFetcher;
use crate::env::Environment;
use crate::error::{InstallerError, Result};
use crate::exec::CommandExecutor;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Creates an `ExitStatus` from an exit code (Unix implementation).
#[cfg(unix)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;

    ExitStatus::from_raw(code << 8)
}

/// Creates an `ExitStatus` from an exit code (Windows implementation).
#[cfg(windows)]
#[must_use]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;

    ExitStatus::from_raw(code as u32)
}

/// Creates a successful command `Output` with empty stdout and stderr.
#[must_use]
pub fn success_output() -> Output {
    Output {
        status: exit_status(0),
        stdout: Vec::new(),
        stderr: Vec::new(),
    }
}

/// Creates a failed command `Output` with the given stderr message.
#[must_use]
pub fn failure_output(stderr: &str) -> Output {
    Output {
        status: exit_status(1),
        stdout: Vec::new(),
        stderr: stderr.as_bytes().to_vec(),
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Represents an expected command invocation for testing.
#[derive(Debug)]
pub struct ExpectedCall {
    /// The command to execute (e.g., "which").
    pub cmd: String,
    /// The arguments to pass to the command.
    pub args: Vec<String>,
    /// The result to return when this command is invoked.
    pub result: Result<Output>,
}

impl ExpectedCall {
    /// Expects `cmd args...` and answers with `result`.
    #[must_use]
    pub fn new(cmd: &str, args: &[&str], result: Result<Output>) -> Self {
        Self {
            cmd: cmd.to_owned(),
            args: args.iter().map(|arg| (*arg).to_owned()).collect(),
            result,
        }
    }

    fn matches(&self, cmd: &str, args: &[&str]) -> bool {
        self.cmd == cmd && self.args.iter().map(String::as_str).eq(args.iter().copied())
    }
}

/// A stub implementation of `CommandExecutor` for testing.
///
/// Expected calls are matched by command and arguments rather than by
/// position, because the installation and PATH registration branches run
/// concurrently. Every invocation is recorded.
#[derive(Debug, Default)]
pub struct StubExecutor {
    expected: Mutex<Vec<ExpectedCall>>,
    invoked: Mutex<Vec<String>>,
}

impl StubExecutor {
    /// Creates a new `StubExecutor` with the given expected calls.
    #[must_use]
    pub fn new(expected: Vec<ExpectedCall>) -> Self {
        Self {
            expected: Mutex::new(expected),
            invoked: Mutex::new(Vec::new()),
        }
    }

    /// Returns every command line the stub was asked to run.
    #[must_use]
    pub fn invocations(&self) -> Vec<String> {
        lock(&self.invoked).clone()
    }

    /// Asserts that all expected command invocations have been consumed.
    ///
    /// # Panics
    ///
    /// Panics if there are remaining expected calls that were not invoked.
    pub fn assert_finished(&self) {
        let remaining = lock(&self.expected);
        assert!(
            remaining.is_empty(),
            "expected no further command invocations, still waiting for {remaining:?}"
        );
    }

    fn take(&self, cmd: &str, args: &[&str]) -> Result<Output> {
        lock(&self.invoked).push(crate::exec::display_command(cmd, args));
        let mut expected = lock(&self.expected);
        let Some(position) = expected.iter().position(|call| call.matches(cmd, args)) else {
            return Err(InstallerError::StubMismatch {
                message: format!(
                    "unexpected command `{}`",
                    crate::exec::display_command(cmd, args)
                ),
            });
        };
        expected.remove(position).result
    }
}

impl CommandExecutor for StubExecutor {
    fn run<'a>(&self, cmd: &str, args: &[&'a str]) -> Result<Output> {
        self.take(cmd, args)
    }

    fn run_visible<'a>(&self, cmd: &str, args: &[&'a str]) -> Result<Output> {
        self.take(cmd, args)
    }
}

/// Map-backed [`Environment`] for tests.
#[derive(Debug, Clone, Default)]
pub struct FakeEnvironment {
    vars: HashMap<String, String>,
}

impl FakeEnvironment {
    /// Creates an empty environment.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the environment with `key` set to `value`.
    #[must_use]
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.vars.insert(key.to_owned(), value.to_owned());
        self
    }
}

impl Environment for FakeEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

/// One call observed by [`RecordingFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchEvent {
    /// `fetch(url)`.
    Fetch(String),
    /// `clear_directory(dir)`.
    Clear(PathBuf),
    /// `extract(archive, dest)`.
    Extract {
        /// The archive bytes passed in.
        archive: Vec<u8>,
        /// The destination directory.
        dest: PathBuf,
    },
}

/// An [`ArchiveFetcher`] that records calls and serves fixed bytes.
#[derive(Debug, Default)]
pub struct RecordingFetcher {
    archive: Vec<u8>,
    fetch_error: Option<String>,
    events: Mutex<Vec<FetchEvent>>,
}

impl RecordingFetcher {
    /// Serves `archive` from every fetch.
    #[must_use]
    pub fn serving(archive: &[u8]) -> Self {
        Self {
            archive: archive.to_vec(),
            ..Self::default()
        }
    }

    /// Fails every fetch with `reason`.
    #[must_use]
    pub fn failing(reason: &str) -> Self {
        Self {
            fetch_error: Some(reason.to_owned()),
            ..Self::default()
        }
    }

    /// Returns the calls observed so far, in order.
    #[must_use]
    pub fn events(&self) -> Vec<FetchEvent> {
        lock(&self.events).clone()
    }
}

impl ArchiveFetcher for RecordingFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        lock(&self.events).push(FetchEvent::Fetch(url.to_owned()));
        match &self.fetch_error {
            Some(reason) => Err(InstallerError::Download(
                crate::artefact::download::DownloadError::HttpError {
                    url: url.to_owned(),
                    reason: reason.clone(),
                },
            )),
            None => Ok(self.archive.clone()),
        }
    }

    fn extract(&self, archive: &[u8], dest_dir: &Path) -> Result<()> {
        lock(&self.events).push(FetchEvent::Extract {
            archive: archive.to_vec(),
            dest: dest_dir.to_path_buf(),
        });
        Ok(())
    }

    fn clear_directory(&self, dir: &Path) -> Result<()> {
        lock(&self.events).push(FetchEvent::Clear(dir.to_path_buf()));
        Ok(())
    }
}
