//! Error types for the Google Cloud SDK installer.
//!
//! Errors fall into two classes. Fatal errors (an unsupported platform, a
//! failed binary installation, a failed update) abort the run and produce a
//! non-zero exit status. PATH registration errors are recoverable: the
//! orchestrator logs them as warnings and the run still succeeds.

use crate::artefact::download::DownloadError;
use crate::artefact::extraction::ExtractionError;
use std::process::ExitStatus;
use thiserror::Error;

/// Errors that can occur during the installation process.
#[derive(Debug, Error)]
pub enum InstallerError {
    /// The host operating system is not one of the supported families.
    #[error("This platform ({os}) is not supported.\nPlease install the SDK manually.")]
    UnsupportedPlatform {
        /// The operating-system identifier that was rejected.
        os: String,
    },

    /// Binary installation failed; the run must abort.
    #[error("Fatal: error installing the SDK: {source}")]
    InstallFailed {
        /// The failure raised by the installation branch.
        #[source]
        source: Box<InstallerError>,
    },

    /// The `gcloud components update` command failed.
    #[error("Fatal: error updating the SDK: {source}")]
    UpdateFailed {
        /// The failure raised by the update command.
        #[source]
        source: Box<InstallerError>,
    },

    /// The invoking shell is missing or not one of bash, zsh, or fish.
    #[error(
        "unknown shell type{}.\nThe installer supports zsh, fish, and bash.\nYou will have to add the SDK to your PATH yourself.",
        .detected.as_deref().map(|shell| format!(" '{shell}'")).unwrap_or_default()
    )]
    ShellNotDetected {
        /// The raw value of `SHELL`, when one was set.
        detected: Option<String>,
    },

    /// The home directory is unknown, so the rc file cannot be located.
    #[error(
        "could not find the .rc file for the current shell: HOME is not set.\nYou will have to add the SDK to your PATH yourself."
    )]
    HomeNotSet,

    /// `PATH` is unset or empty, so the user `Path` cannot be extended
    /// without discarding its existing entries.
    #[error(
        "PATH is not set; refusing to overwrite the user Path.\nYou will have to add the SDK to your PATH yourself."
    )]
    PathNotSet,

    /// A child process exited with a non-zero status.
    #[error("`{command}` exited with {status}{}", format_stderr(.stderr))]
    CommandFailed {
        /// The command line that was executed.
        command: String,
        /// The exit status reported by the child.
        status: ExitStatus,
        /// Captured standard error, if any.
        stderr: String,
    },

    /// Downloading the installer archive failed.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// Clearing or extracting the installer archive failed.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A concurrent installation branch panicked.
    #[error("{branch} branch panicked")]
    BranchPanicked {
        /// Which branch panicked.
        branch: &'static str,
    },

    /// Test stub received an unexpected or mismatched command invocation.
    #[cfg(any(test, feature = "test-support"))]
    #[error("stub mismatch: {message}")]
    StubMismatch {
        /// Description of what was expected versus what was received.
        message: String,
    },
}

impl InstallerError {
    /// Wraps a binary-installation failure as fatal.
    #[must_use]
    pub fn install_failed(source: Self) -> Self {
        Self::InstallFailed {
            source: Box::new(source),
        }
    }

    /// Returns `true` for errors that must abort the run.
    ///
    /// # Examples
    ///
    /// ```
    /// use gcloud_installer::error::InstallerError;
    ///
    /// assert!(InstallerError::UnsupportedPlatform { os: "aix".to_owned() }.is_fatal());
    /// assert!(!InstallerError::HomeNotSet.is_fatal());
    /// ```
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedPlatform { .. } | Self::InstallFailed { .. } | Self::UpdateFailed { .. }
        )
    }
}

fn format_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

/// Result type alias using [`InstallerError`].
pub type Result<T> = std::result::Result<T, InstallerError>;
