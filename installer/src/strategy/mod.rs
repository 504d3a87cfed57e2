//! Platform installation strategies.
//!
//! Each strategy knows how to tell whether the SDK is already present and
//! how to install it. Installing produces an [`InstallOutcome`] holding the
//! results of both branches; the orchestrator decides what is fatal.

pub mod unix;
pub mod windows;

pub use unix::UnixStrategy;
pub use windows::WindowsStrategy;

use crate::artefact::ArchiveFetcher;
use crate::config::InstallerConfig;
use crate::env::Environment;
use crate::exec::CommandExecutor;
use crate::orchestrator::InstallOutcome;
use crate::platform::PlatformFamily;

/// Installs the SDK on one platform family.
#[cfg_attr(test, mockall::automock)]
pub trait InstallStrategy {
    /// Returns `true` if `gcloud` is already on PATH.
    fn is_installed(&self) -> bool;

    /// Runs binary installation and PATH registration concurrently and
    /// returns both results once both have settled.
    fn install(&self) -> InstallOutcome;
}

/// Side-effecting services a strategy is allowed to use.
#[derive(Clone, Copy)]
pub struct Capabilities<'a> {
    /// Runs external commands.
    pub executor: &'a dyn CommandExecutor,
    /// Downloads and unpacks archives.
    pub fetcher: &'a dyn ArchiveFetcher,
    /// Reads environment variables.
    pub env: &'a dyn Environment,
}

/// The strategy chosen for the host platform.
pub enum Strategy<'a> {
    /// Linux and macOS.
    Unix(UnixStrategy<'a>),
    /// Windows.
    Windows(WindowsStrategy<'a>),
}

impl<'a> Strategy<'a> {
    /// Picks the strategy matching `config.platform`.
    ///
    /// Unsupported hosts never reach this point: they are rejected when the
    /// platform is detected, before any side effect.
    #[must_use]
    pub fn select(config: &'a InstallerConfig, capabilities: Capabilities<'a>) -> Self {
        match config.platform.family() {
            PlatformFamily::Unix => Self::Unix(UnixStrategy::new(
                config,
                capabilities.executor,
                capabilities.env,
            )),
            PlatformFamily::Windows => Self::Windows(WindowsStrategy::new(config, capabilities)),
        }
    }

    fn inner(&self) -> &dyn InstallStrategy {
        match self {
            Self::Unix(strategy) => strategy,
            Self::Windows(strategy) => strategy,
        }
    }
}

impl InstallStrategy for Strategy<'_> {
    fn is_installed(&self) -> bool {
        self.inner().is_installed()
    }

    fn install(&self) -> InstallOutcome {
        self.inner().install()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{Arch, Platform};
    use crate::test_utils::{FakeEnvironment, RecordingFetcher, StubExecutor};
    use camino::Utf8Path;
    use rstest::rstest;

    #[rstest]
    #[case::linux("linux", true)]
    #[case::macos("macos", true)]
    #[case::darwin("darwin", true)]
    #[case::windows("windows", false)]
    #[case::win32("win32", false)]
    fn selects_strategy_for_supported_os(#[case] os: &str, #[case] expect_unix: bool) {
        let platform = Platform::from_os_id(os).expect("supported os");
        let config = InstallerConfig::new(platform, Arch::X86_64, Utf8Path::new("/npm"));
        let executor = StubExecutor::default();
        let fetcher = RecordingFetcher::default();
        let env = FakeEnvironment::new();
        let capabilities = Capabilities {
            executor: &executor,
            fetcher: &fetcher,
            env: &env,
        };

        let strategy = Strategy::select(&config, capabilities);
        assert_eq!(matches!(strategy, Strategy::Unix(_)), expect_unix);
        assert_eq!(matches!(strategy, Strategy::Windows(_)), !expect_unix);
    }

    #[test]
    fn probe_delegates_to_selected_strategy() {
        let config = InstallerConfig::new(Platform::Windows, Arch::X86, Utf8Path::new("C:/npm"));
        let executor = StubExecutor::new(vec![crate::test_utils::ExpectedCall::new(
            "where",
            &["/q", "gcloud"],
            Ok(crate::test_utils::success_output()),
        )]);
        let fetcher = RecordingFetcher::default();
        let env = FakeEnvironment::new();
        let strategy = Strategy::select(
            &config,
            Capabilities {
                executor: &executor,
                fetcher: &fetcher,
                env: &env,
            },
        );

        assert!(strategy.is_installed());
        executor.assert_finished();
    }
}
