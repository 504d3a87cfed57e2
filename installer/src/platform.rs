//! Host platform and architecture detection.
//!
//! The operating-system identifier is resolved once at startup and passed
//! to the strategy selector. Identifiers outside the three supported
//! families are rejected before any side effect occurs.

use crate::error::{InstallerError, Result};
use std::fmt;

/// Supported host operating systems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Linux.
    Linux,
    /// macOS.
    MacOs,
    /// Windows.
    Windows,
}

/// Installation strategy family for a [`Platform`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlatformFamily {
    /// Linux and macOS share the bootstrap-script installer.
    Unix,
    /// Windows uses the zip archive and `install.bat`.
    Windows,
}

impl Platform {
    /// Detects the platform the installer was compiled for.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::UnsupportedPlatform`] on other systems.
    pub fn detect() -> Result<Self> {
        Self::from_os_id(std::env::consts::OS)
    }

    /// Parses an operating-system identifier.
    ///
    /// Accepts Rust's `std::env::consts::OS` names as well as the Node.js
    /// spellings (`darwin`, `win32`) used by package-manager tooling.
    ///
    /// # Errors
    ///
    /// Returns [`InstallerError::UnsupportedPlatform`] for any other value.
    ///
    /// # Examples
    ///
    /// ```
    /// use gcloud_installer::platform::{Platform, PlatformFamily};
    ///
    /// let platform = Platform::from_os_id("darwin")?;
    /// assert_eq!(platform, Platform::MacOs);
    /// assert_eq!(platform.family(), PlatformFamily::Unix);
    /// assert!(Platform::from_os_id("solaris").is_err());
    /// # Ok::<(), gcloud_installer::error::InstallerError>(())
    /// ```
    pub fn from_os_id(os: &str) -> Result<Self> {
        match os {
            "linux" => Ok(Self::Linux),
            "macos" | "darwin" => Ok(Self::MacOs),
            "windows" | "win32" => Ok(Self::Windows),
            other => Err(InstallerError::UnsupportedPlatform {
                os: other.to_owned(),
            }),
        }
    }

    /// Returns the strategy family for this platform.
    #[must_use]
    pub const fn family(self) -> PlatformFamily {
        match self {
            Self::Linux | Self::MacOs => PlatformFamily::Unix,
            Self::Windows => PlatformFamily::Windows,
        }
    }

    /// Returns the name used to invoke the SDK's CLI.
    #[must_use]
    pub const fn sdk_command(self) -> &'static str {
        match self {
            Self::Linux | Self::MacOs => "gcloud",
            Self::Windows => "gcloud.cmd",
        }
    }

    /// Returns the platform name as used in log messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::MacOs => "macos",
            Self::Windows => "windows",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CPU architecture names used in the Windows archive file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arch {
    /// 64-bit x86.
    X86_64,
    /// Any other architecture; the 32-bit bundle is the fallback.
    X86,
}

impl Arch {
    /// Detects the architecture the installer was compiled for.
    #[must_use]
    pub fn detect() -> Self {
        Self::from_arch_id(std::env::consts::ARCH)
    }

    /// Maps an architecture identifier to the archive naming scheme.
    #[must_use]
    pub fn from_arch_id(arch: &str) -> Self {
        match arch {
            "x86_64" | "x64" => Self::X86_64,
            _ => Self::X86,
        }
    }

    /// Returns the name embedded in archive file names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::X86 => "x86",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::linux("linux", Platform::Linux, PlatformFamily::Unix)]
    #[case::macos("macos", Platform::MacOs, PlatformFamily::Unix)]
    #[case::darwin("darwin", Platform::MacOs, PlatformFamily::Unix)]
    #[case::windows("windows", Platform::Windows, PlatformFamily::Windows)]
    #[case::win32("win32", Platform::Windows, PlatformFamily::Windows)]
    fn supported_identifiers_map_to_families(
        #[case] os: &str,
        #[case] platform: Platform,
        #[case] family: PlatformFamily,
    ) {
        let detected = Platform::from_os_id(os).expect("supported platform");
        assert_eq!(detected, platform);
        assert_eq!(detected.family(), family);
    }

    #[rstest]
    #[case::freebsd("freebsd")]
    #[case::aix("aix")]
    #[case::empty("")]
    #[case::uppercase("Linux")]
    fn unsupported_identifiers_are_rejected(#[case] os: &str) {
        let err = Platform::from_os_id(os).expect_err("unsupported platform");
        assert!(
            matches!(&err, InstallerError::UnsupportedPlatform { os: rejected } if rejected == os)
        );
        assert!(err.is_fatal());
    }

    #[rstest]
    #[case::x86_64("x86_64", Arch::X86_64)]
    #[case::node_x64("x64", Arch::X86_64)]
    #[case::x86("x86", Arch::X86)]
    #[case::aarch64("aarch64", Arch::X86)]
    fn arch_identifiers(#[case] id: &str, #[case] expected: Arch) {
        assert_eq!(Arch::from_arch_id(id), expected);
    }

    #[test]
    fn sdk_command_uses_cmd_shim_on_windows() {
        assert_eq!(Platform::Windows.sdk_command(), "gcloud.cmd");
        assert_eq!(Platform::Linux.sdk_command(), "gcloud");
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(Platform::MacOs.to_string(), "macos");
        assert_eq!(Arch::X86_64.to_string(), "x86_64");
    }
}
