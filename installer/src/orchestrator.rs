//! Installation orchestration.
//!
//! A run probes for an existing SDK and either updates it or installs it.
//! Installation runs two independent branches concurrently, binary
//! installation and PATH registration, and waits for both to settle before
//! classifying their results: a binary failure is fatal, a PATH failure is
//! downgraded to a warning.

use crate::error::{InstallerError, Result};
use crate::exec::{CommandExecutor, run_checked};
use crate::strategy::InstallStrategy;
use std::thread::ScopedJoinHandle;

/// Arguments passed to the SDK to update an existing installation.
pub const UPDATE_ARGS: &[&str] = &["components", "update", "--quiet"];

/// Results of the two installation branches, collected after both settle.
#[derive(Debug)]
pub struct InstallOutcome {
    /// Result of downloading and running the SDK installer.
    pub binaries: Result<()>,
    /// Result of putting the SDK on the user's PATH.
    pub path_registration: Result<()>,
}

impl InstallOutcome {
    /// Applies the failure policy.
    ///
    /// A PATH registration failure is logged as a warning and otherwise
    /// ignored; a binary installation failure is wrapped as
    /// [`InstallerError::InstallFailed`].
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::InstallFailed`] when binary installation
    /// failed, regardless of the PATH registration result.
    pub fn into_result(self) -> Result<()> {
        if let Err(err) = &self.path_registration {
            log::warn!("{}", path_warning(err));
        }
        self.binaries.map_err(InstallerError::install_failed)
    }
}

/// Formats the warning logged for a PATH registration failure.
///
/// # Examples
///
/// ```
/// use gcloud_installer::error::InstallerError;
/// use gcloud_installer::orchestrator::path_warning;
///
/// let warning = path_warning(&InstallerError::HomeNotSet);
/// assert!(warning.starts_with("Warning: error adding SDK to PATH: "));
/// ```
#[must_use]
pub fn path_warning(err: &InstallerError) -> String {
    format!("Warning: error adding SDK to PATH: {err}")
}

/// What a run ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunAction {
    /// The SDK was not found and has been installed.
    Installed,
    /// The SDK was already on PATH and its components were updated.
    Updated,
}

/// Runs both installation branches on scoped threads and joins them.
///
/// Both branches always run to completion; neither cancels the other.
pub fn run_concurrently<B, P>(install_binaries: B, register_path: P) -> InstallOutcome
where
    B: FnOnce() -> Result<()> + Send,
    P: FnOnce() -> Result<()> + Send,
{
    std::thread::scope(|scope| {
        let binaries = scope.spawn(install_binaries);
        let path_registration = scope.spawn(register_path);
        InstallOutcome {
            binaries: join_branch(binaries, "binary installation"),
            path_registration: join_branch(path_registration, "PATH registration"),
        }
    })
}

fn join_branch(handle: ScopedJoinHandle<'_, Result<()>>, branch: &'static str) -> Result<()> {
    handle
        .join()
        .unwrap_or(Err(InstallerError::BranchPanicked { branch }))
}

/// Installs or updates the SDK using `strategy`.
///
/// # Errors
///
/// Returns [`InstallerError::InstallFailed`] when binary installation fails
/// and [`InstallerError::UpdateFailed`] when the components update fails.
pub fn run(
    strategy: &dyn InstallStrategy,
    executor: &dyn CommandExecutor,
    sdk_command: &str,
) -> Result<RunAction> {
    if strategy.is_installed() {
        update_sdk(executor, sdk_command)?;
        return Ok(RunAction::Updated);
    }

    strategy.install().into_result()?;
    Ok(RunAction::Installed)
}

/// Runs `gcloud components update --quiet`.
///
/// # Errors
///
/// Returns [`InstallerError::UpdateFailed`] if the command cannot be started
/// or exits unsuccessfully.
pub fn update_sdk(executor: &dyn CommandExecutor, sdk_command: &str) -> Result<()> {
    log::info!("Updating existing gcloud installation...");
    run_checked(executor, sdk_command, UPDATE_ARGS).map_err(|source| {
        InstallerError::UpdateFailed {
            source: Box::new(source),
        }
    })
}
