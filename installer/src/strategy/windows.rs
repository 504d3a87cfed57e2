//! Windows installation.
//!
//! Binaries come from a versioned zip archive that is unpacked under the SDK
//! root and installed with its bundled `install.bat`. PATH registration
//! rewrites the user-scoped `Path` variable through PowerShell.

use crate::artefact::ArchiveFetcher;
use crate::config::InstallerConfig;
use crate::env::{Environment, PATH_VAR};
use crate::error::{InstallerError, Result};
use crate::exec::{CommandExecutor, run_checked};
use crate::orchestrator::{InstallOutcome, run_concurrently};
use crate::probe::is_sdk_installed;
use crate::strategy::{Capabilities, InstallStrategy};
use camino::Utf8PathBuf;

/// Installs the SDK from the Windows archive.
#[derive(Clone, Copy)]
pub struct WindowsStrategy<'a> {
    config: &'a InstallerConfig,
    executor: &'a dyn CommandExecutor,
    fetcher: &'a dyn ArchiveFetcher,
    env: &'a dyn Environment,
}

impl<'a> WindowsStrategy<'a> {
    /// Creates a strategy bound to the given services.
    #[must_use]
    pub fn new(config: &'a InstallerConfig, capabilities: Capabilities<'a>) -> Self {
        Self {
            config,
            executor: capabilities.executor,
            fetcher: capabilities.fetcher,
            env: capabilities.env,
        }
    }

    /// Clears the SDK root, downloads and unpacks the archive into it, then
    /// runs the bundled installer quietly.
    ///
    /// # Errors
    ///
    /// Returns the first failure among clearing, downloading, extracting,
    /// and running `install.bat`.
    pub fn install_binaries(&self) -> Result<()> {
        let sdk_root = self.config.sdk_root.as_std_path();
        self.fetcher.clear_directory(sdk_root)?;

        let url = self.config.windows_archive_url();
        log::debug!("Downloading {url}");
        let archive = self.fetcher.fetch(&url)?;

        log::debug!("Unpacking {} bytes into {}", archive.len(), self.config.sdk_root);
        self.fetcher.extract(&archive, sdk_root)?;

        let installer = self.installer_script();
        run_checked(self.executor, installer.as_str(), &["-q"])
    }

    /// Adds the SDK `bin` directory to the user's `Path`.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::PathNotSet`] when `PATH` is unset or empty,
    /// and an error if PowerShell cannot be run or exits non-zero.
    pub fn register_path(&self) -> Result<()> {
        let bin_dir = self.bin_dir();
        let current = self
            .env
            .var(PATH_VAR)
            .filter(|path| !path.trim().is_empty())
            .ok_or(InstallerError::PathNotSet)?;
        if path_contains(&current, bin_dir.as_str()) {
            log::info!("{bin_dir} is already on PATH.");
            return Ok(());
        }

        let script = set_user_path_script(&append_path_entry(&current, bin_dir.as_str()));
        run_checked(
            self.executor,
            "powershell",
            &["-NoProfile", "-NonInteractive", "-Command", &script],
        )?;
        log::info!("Added {bin_dir} to the user PATH.");
        Ok(())
    }

    fn installer_script(&self) -> Utf8PathBuf {
        self.config.extracted_sdk_dir().join("install.bat")
    }

    fn bin_dir(&self) -> Utf8PathBuf {
        self.config.extracted_sdk_dir().join("bin")
    }
}

impl InstallStrategy for WindowsStrategy<'_> {
    fn is_installed(&self) -> bool {
        is_sdk_installed(self.executor, self.config.platform.family())
    }

    fn install(&self) -> InstallOutcome {
        log::info!("Installing gcloud SDK for Windows...");
        run_concurrently(|| self.install_binaries(), || self.register_path())
    }
}

/// Returns `path` with `entry` appended, separated by exactly one `;`.
///
/// # Examples
///
/// ```
/// use gcloud_installer::strategy::windows::append_path_entry;
///
/// assert_eq!(append_path_entry(r"C:\Windows", r"C:\sdk\bin"), r"C:\Windows;C:\sdk\bin");
/// assert_eq!(append_path_entry(r"C:\Windows;", r"C:\sdk\bin"), r"C:\Windows;C:\sdk\bin");
/// assert_eq!(append_path_entry("", r"C:\sdk\bin"), r"C:\sdk\bin");
/// ```
#[must_use]
pub fn append_path_entry(path: &str, entry: &str) -> String {
    if path.is_empty() {
        return entry.to_owned();
    }
    if path.ends_with(';') {
        format!("{path}{entry}")
    } else {
        format!("{path};{entry}")
    }
}

/// Builds the PowerShell command that persists `value` as the user `Path`.
#[must_use]
pub fn set_user_path_script(value: &str) -> String {
    format!(
        "[Environment]::SetEnvironmentVariable('Path', '{}', 'User')",
        value.replace('\'', "''")
    )
}

fn path_contains(path: &str, entry: &str) -> bool {
    let wanted = normalise_entry(entry);
    path.split(';')
        .any(|existing| normalise_entry(existing) == wanted)
}

fn normalise_entry(entry: &str) -> String {
    entry
        .trim()
        .trim_end_matches(['\\', '/'])
        .replace('/', "\\")
        .to_lowercase()
}
