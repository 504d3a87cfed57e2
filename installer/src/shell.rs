//! Shell detection and rc-file resolution for PATH registration.
//!
//! On UNIX-family hosts the SDK is put on the PATH by appending a line that
//! sources the SDK's shell-specific include file to the user's rc file.
//!
//! ## Supported Shells
//!
//! - Bash: `~/.bashrc` (`~/.bash_profile` on macOS)
//! - Zsh: `~/.zshrc`
//! - Fish: `~/.config/fish/config.fish`

use crate::env::{Environment, SHELL_VAR};
use crate::error::{InstallerError, Result};
use crate::platform::Platform;
use camino::Utf8Path;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Marker comment written above the sourcing line.
pub const RC_MARKER: &str = "# gcloud sdk";

/// Shells for which the SDK ships a `path.<shell>.inc` script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shell {
    /// GNU Bash.
    Bash,
    /// Z shell.
    Zsh,
    /// Friendly interactive shell.
    Fish,
}

impl Shell {
    /// Detects the user's shell from the `SHELL` environment variable.
    ///
    /// Returns `None` if the variable is unset or names an unsupported shell.
    #[must_use]
    pub fn detect(env: &dyn Environment) -> Option<Self> {
        let shell = env.var(SHELL_VAR);
        let detected = shell.as_deref().and_then(Self::from_path);
        log::debug!(
            "Detected shell type: {detected:?} from SHELL={shell:?} (None -> unsupported shell)"
        );
        detected
    }

    /// Classifies a shell program path by its executable name.
    ///
    /// # Examples
    ///
    /// ```
    /// use gcloud_installer::shell::Shell;
    ///
    /// assert_eq!(Shell::from_path("/usr/local/bin/zsh"), Some(Shell::Zsh));
    /// assert_eq!(Shell::from_path("/bin/tcsh"), None);
    /// ```
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let shell_name = Path::new(path).file_name()?.to_str()?;
        match shell_name {
            "bash" => Some(Self::Bash),
            "zsh" => Some(Self::Zsh),
            "fish" => Some(Self::Fish),
            _ => None,
        }
    }

    /// Returns the shell's name as used in the SDK include file name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bash => "bash",
            Self::Zsh => "zsh",
            Self::Fish => "fish",
        }
    }

    /// Returns the rc file path relative to the home directory.
    #[must_use]
    pub const fn rc_file(self, platform: Platform) -> &'static str {
        match (self, platform) {
            (Self::Bash, Platform::MacOs) => ".bash_profile",
            (Self::Bash, _) => ".bashrc",
            (Self::Zsh, _) => ".zshrc",
            (Self::Fish, _) => ".config/fish/config.fish",
        }
    }

    /// Returns the SDK include file sourced for this shell.
    #[must_use]
    pub fn include_path(self, sdk_root: &Utf8Path) -> camino::Utf8PathBuf {
        sdk_root.join(format!("path.{}.inc", self.as_str()))
    }
}

impl fmt::Display for Shell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Joins the shell's rc file onto the user's home directory.
///
/// No existence check is made; the file is created on append if absent.
///
/// # Errors
///
/// Returns [`InstallerError::HomeNotSet`] when the home directory is unknown.
pub fn resolve_rc_path(shell: Shell, platform: Platform, env: &dyn Environment) -> Result<PathBuf> {
    let home = env.home_dir().ok_or(InstallerError::HomeNotSet)?;
    let rc_path = home.join(shell.rc_file(platform));
    log::debug!("Detected .*shrc file at {}.", rc_path.display());
    Ok(rc_path)
}

/// Everything needed to register the SDK in a shell rc file.
///
/// Resolved once per installation so the include file and the rc file always
/// agree on the shell, even if `SHELL` changes mid-run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RcRegistration {
    /// The detected shell.
    pub shell: Shell,
    /// The rc file to append to.
    pub rc_path: PathBuf,
    /// The text appended to the rc file.
    pub snippet: String,
}

impl RcRegistration {
    /// Detects the shell and resolves its rc file and sourcing snippet.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::ShellNotDetected`] for a missing or
    /// unsupported shell and [`InstallerError::HomeNotSet`] when the home
    /// directory is unknown.
    pub fn resolve(env: &dyn Environment, platform: Platform, sdk_root: &Utf8Path) -> Result<Self> {
        let shell = Shell::detect(env).ok_or_else(|| InstallerError::ShellNotDetected {
            detected: env.var(SHELL_VAR),
        })?;
        let rc_path = resolve_rc_path(shell, platform, env)?;
        Ok(Self {
            shell,
            rc_path,
            snippet: rc_snippet(&shell.include_path(sdk_root)),
        })
    }

    /// Appends the sourcing snippet to the rc file.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be opened or written.
    pub fn apply(&self) -> Result<()> {
        log::debug!(
            "Appending SDK include to {}: {:?}",
            self.rc_path.display(),
            self.snippet
        );
        append_line(&self.rc_path, &self.snippet)?;
        log::info!("Added 'gcloud' to PATH in {}.", self.rc_path.display());
        Ok(())
    }
}

/// Builds the text appended to the rc file.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use gcloud_installer::shell::rc_snippet;
///
/// let snippet = rc_snippet(Utf8Path::new("/opt/google-cloud-sdk/path.zsh.inc"));
/// assert_eq!(snippet, "\n\n# gcloud sdk\nsource /opt/google-cloud-sdk/path.zsh.inc");
/// ```
#[must_use]
pub fn rc_snippet(include_path: &Utf8Path) -> String {
    format!("\n\n{RC_MARKER}\nsource {include_path}")
}

/// Appends `line` plus a terminating newline, creating the file if needed.
fn append_line(path: &Path, line: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    writeln!(file, "{line}")?;
    Ok(())
}
