//! External command execution.
//!
//! Every child process the installer starts (the PATH probe, the installer
//! script, `install.bat`, the PowerShell environment setter, and the
//! components update) goes through [`CommandExecutor`], so tests can
//! substitute a fake without touching real processes.

use crate::error::{InstallerError, Result};
use std::process::{Command, Output, Stdio};

/// How the standard streams of user-visible child processes are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StdioPolicy {
    /// Inherit stdin, stdout, and stderr from the installer.
    #[default]
    Inherit,
    /// Discard stdin and stdout; keep stderr visible.
    StderrOnly,
    /// Discard all streams.
    Silent,
}

impl StdioPolicy {
    fn stdin(self) -> Stdio {
        match self {
            Self::Inherit => Stdio::inherit(),
            Self::StderrOnly | Self::Silent => Stdio::null(),
        }
    }

    fn stdout(self) -> Stdio {
        match self {
            Self::Inherit => Stdio::inherit(),
            Self::StderrOnly | Self::Silent => Stdio::null(),
        }
    }

    fn stderr(self) -> Stdio {
        match self {
            Self::Inherit | Self::StderrOnly => Stdio::inherit(),
            Self::Silent => Stdio::null(),
        }
    }
}

/// Abstraction for running external commands.
///
/// Implementations must be shareable across threads because the binary
/// installation and PATH registration branches run concurrently.
#[cfg_attr(test, mockall::automock)]
pub trait CommandExecutor: Send + Sync {
    /// Runs a command with arguments and returns the captured output.
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the command.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use gcloud_installer::exec::{CommandExecutor, SystemCommandExecutor};
    ///
    /// let executor = SystemCommandExecutor::default();
    /// let output = executor.run("which", &["gcloud"])?;
    /// assert!(output.status.success());
    /// # Ok::<(), gcloud_installer::error::InstallerError>(())
    /// ```
    fn run<'a>(&self, cmd: &str, args: &[&'a str]) -> Result<Output>;

    /// Runs a command whose output the user should see, wired according to
    /// the executor's [`StdioPolicy`].
    ///
    /// Streams that are not captured come back empty in the returned
    /// [`Output`].
    ///
    /// # Errors
    ///
    /// Returns any I/O errors encountered while spawning or running the command.
    fn run_visible<'a>(&self, cmd: &str, args: &[&'a str]) -> Result<Output>;
}

/// Executes commands on the host system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor {
    stdio: StdioPolicy,
}

impl SystemCommandExecutor {
    /// Creates an executor that wires visible commands using `stdio`.
    #[must_use]
    pub const fn new(stdio: StdioPolicy) -> Self {
        Self { stdio }
    }
}

impl CommandExecutor for SystemCommandExecutor {
    fn run<'a>(&self, cmd: &str, args: &[&'a str]) -> Result<Output> {
        Command::new(cmd)
            .args(args)
            .output()
            .map_err(InstallerError::from)
    }

    fn run_visible<'a>(&self, cmd: &str, args: &[&'a str]) -> Result<Output> {
        Command::new(cmd)
            .args(args)
            .stdin(self.stdio.stdin())
            .stdout(self.stdio.stdout())
            .stderr(self.stdio.stderr())
            .output()
            .map_err(InstallerError::from)
    }
}

/// Formats a command and its arguments for log and error messages.
///
/// # Examples
///
/// ```
/// use gcloud_installer::exec::display_command;
///
/// assert_eq!(display_command("where", &["/q", "gcloud"]), "where /q gcloud");
/// ```
#[must_use]
pub fn display_command(cmd: &str, args: &[&str]) -> String {
    std::iter::once(cmd)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Converts a non-zero exit into [`InstallerError::CommandFailed`].
///
/// # Errors
///
/// Returns [`InstallerError::CommandFailed`] when `output` reports failure.
pub fn ensure_success(cmd: &str, args: &[&str], output: &Output) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }
    Err(InstallerError::CommandFailed {
        command: display_command(cmd, args),
        status: output.status,
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Runs a visible command and fails unless it exits successfully.
///
/// # Errors
///
/// Returns spawn errors from the executor, or
/// [`InstallerError::CommandFailed`] for a non-zero exit.
pub fn run_checked(executor: &dyn CommandExecutor, cmd: &str, args: &[&str]) -> Result<()> {
    log::debug!("Running command: {}", display_command(cmd, args));
    let output = executor.run_visible(cmd, args)?;
    ensure_success(cmd, args, &output)
}
