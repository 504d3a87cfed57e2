//! Startup configuration.
//!
//! Platform, architecture, and installation paths are resolved once, before
//! any strategy runs, and passed down explicitly.

use crate::error::{InstallerError, Result};
use crate::platform::{Arch, Platform};
use camino::{Utf8Path, Utf8PathBuf};

/// SDK release installed on Windows.
pub const SDK_VERSION: &str = "158.0.0";

/// Directory name of the SDK, both as extracted and as installed.
pub const SDK_DIR_NAME: &str = "google-cloud-sdk";

/// Bootstrap script used on Linux and macOS.
pub const UNIX_INSTALLER_URL: &str =
    "https://dl.google.com/dl/cloudsdk/channels/rapid/install_google_cloud_sdk.bash";

const WINDOWS_DOWNLOAD_BASE: &str = "https://dl.google.com/dl/cloudsdk/channels/rapid/downloads";

/// Resolved installer configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallerConfig {
    /// Host operating system.
    pub platform: Platform,
    /// Host CPU architecture.
    pub arch: Arch,
    /// SDK root: `<install dir>/google-cloud-sdk`.
    pub sdk_root: Utf8PathBuf,
    /// Pinned SDK version for the Windows archive.
    pub sdk_version: String,
}

impl InstallerConfig {
    /// Builds a configuration for an explicit platform and install directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use gcloud_installer::config::InstallerConfig;
    /// use gcloud_installer::platform::{Arch, Platform};
    ///
    /// let config = InstallerConfig::new(Platform::Linux, Arch::X86_64, Utf8Path::new("/opt/npm"));
    /// assert_eq!(config.sdk_root.as_str(), "/opt/npm/google-cloud-sdk");
    /// ```
    #[must_use]
    pub fn new(platform: Platform, arch: Arch, install_dir: &Utf8Path) -> Self {
        Self {
            platform,
            arch,
            sdk_root: install_dir.join(SDK_DIR_NAME),
            sdk_version: SDK_VERSION.to_owned(),
        }
    }

    /// Detects the host platform and resolves the install directory.
    ///
    /// When `install_dir` is `None`, the directory containing the running
    /// executable is used.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::UnsupportedPlatform`] on unsupported hosts,
    /// or an I/O error if the executable location cannot be determined.
    pub fn detect(install_dir: Option<Utf8PathBuf>) -> Result<Self> {
        let platform = Platform::detect()?;
        let install_dir = match install_dir {
            Some(dir) => dir,
            None => executable_dir()?,
        };
        Ok(Self::new(platform, Arch::detect(), &install_dir))
    }

    /// Directory passed to the bootstrap script's `--install-dir`.
    #[must_use]
    pub fn install_dir(&self) -> &Utf8Path {
        self.sdk_root.parent().unwrap_or(&self.sdk_root)
    }

    /// URL of the versioned Windows archive for this architecture.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use gcloud_installer::config::InstallerConfig;
    /// use gcloud_installer::platform::{Arch, Platform};
    ///
    /// let config = InstallerConfig::new(Platform::Windows, Arch::X86, Utf8Path::new("C:/npm"));
    /// assert!(config.windows_archive_url().ends_with("-windows-x86-bundled-python.zip"));
    /// ```
    #[must_use]
    pub fn windows_archive_url(&self) -> String {
        format!(
            "{WINDOWS_DOWNLOAD_BASE}/google-cloud-sdk-{}-windows-{}-bundled-python.zip",
            self.sdk_version, self.arch
        )
    }

    /// Root of the unpacked SDK inside the extracted Windows archive.
    #[must_use]
    pub fn extracted_sdk_dir(&self) -> Utf8PathBuf {
        self.sdk_root.join(SDK_DIR_NAME)
    }
}

fn executable_dir() -> Result<Utf8PathBuf> {
    let exe = std::env::current_exe()?;
    let exe = Utf8PathBuf::try_from(exe).map_err(|e| {
        InstallerError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("installer path is not valid UTF-8: {e}"),
        ))
    })?;
    exe.parent().map(Utf8Path::to_path_buf).ok_or_else(|| {
        InstallerError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("installer path {exe} has no parent directory"),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::x86_64(Arch::X86_64, "google-cloud-sdk-158.0.0-windows-x86_64-bundled-python.zip")]
    #[case::x86(Arch::X86, "google-cloud-sdk-158.0.0-windows-x86-bundled-python.zip")]
    fn windows_archive_url_names_version_and_arch(#[case] arch: Arch, #[case] file: &str) {
        let config = InstallerConfig::new(Platform::Windows, arch, Utf8Path::new("C:/npm"));
        let url = config.windows_archive_url();
        assert!(url.starts_with("https://dl.google.com/"));
        assert!(url.ends_with(file), "url: {url}");
    }

    #[test]
    fn install_dir_is_parent_of_sdk_root() {
        let config =
            InstallerConfig::new(Platform::MacOs, Arch::X86_64, Utf8Path::new("/usr/lib/gcloud"));
        assert_eq!(config.install_dir(), Utf8Path::new("/usr/lib/gcloud"));
    }

    #[test]
    fn extracted_sdk_dir_is_nested() {
        let config = InstallerConfig::new(Platform::Windows, Arch::X86_64, Utf8Path::new("/npm"));
        assert_eq!(
            config.extracted_sdk_dir(),
            Utf8PathBuf::from("/npm/google-cloud-sdk/google-cloud-sdk")
        );
    }

    #[test]
    fn detect_honours_explicit_install_dir() {
        let dir = Utf8PathBuf::from("/tmp/gcloud-npm");
        let result = InstallerConfig::detect(Some(dir));
        #[cfg(any(target_os = "linux", target_os = "macos", target_os = "windows"))]
        {
            let config = result.expect("supported host");
            assert_eq!(config.sdk_root, Utf8PathBuf::from("/tmp/gcloud-npm/google-cloud-sdk"));
        }
        #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
        assert!(result.is_err());
    }
}
