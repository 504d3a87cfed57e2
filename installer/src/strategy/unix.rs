//! Linux and macOS installation.
//!
//! Binaries come from Google's bootstrap script piped into `bash`. PATH
//! registration appends a `source` line for the SDK's shell include file to
//! the user's rc file.

use crate::config::{InstallerConfig, UNIX_INSTALLER_URL};
use crate::env::Environment;
use crate::error::Result;
use crate::exec::{CommandExecutor, run_checked};
use crate::orchestrator::{InstallOutcome, run_concurrently};
use crate::probe::is_sdk_installed;
use crate::shell::RcRegistration;
use crate::strategy::InstallStrategy;
use camino::Utf8Path;

/// Installs the SDK via the bootstrap script.
#[derive(Clone, Copy)]
pub struct UnixStrategy<'a> {
    config: &'a InstallerConfig,
    executor: &'a dyn CommandExecutor,
    env: &'a dyn Environment,
}

impl<'a> UnixStrategy<'a> {
    /// Creates a strategy bound to the given services.
    #[must_use]
    pub fn new(
        config: &'a InstallerConfig,
        executor: &'a dyn CommandExecutor,
        env: &'a dyn Environment,
    ) -> Self {
        Self {
            config,
            executor,
            env,
        }
    }

    /// Downloads the bootstrap script and runs it non-interactively.
    ///
    /// # Errors
    ///
    /// Returns an error if the pipeline cannot be spawned or exits non-zero.
    pub fn install_binaries(&self) -> Result<()> {
        let script = bootstrap_script(self.config.install_dir());
        run_checked(self.executor, "bash", &["-o", "pipefail", "-c", &script])
    }
}

impl InstallStrategy for UnixStrategy<'_> {
    fn is_installed(&self) -> bool {
        is_sdk_installed(self.executor, self.config.platform.family())
    }

    fn install(&self) -> InstallOutcome {
        log::info!("Installing gcloud SDK for UNIX (macOS/Linux)...");
        let registration =
            RcRegistration::resolve(self.env, self.config.platform, &self.config.sdk_root);
        run_concurrently(
            || self.install_binaries(),
            move || registration.and_then(|rc| rc.apply()),
        )
    }
}

/// Builds the `curl | bash` pipeline that installs into `install_dir`.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use gcloud_installer::strategy::unix::bootstrap_script;
///
/// let script = bootstrap_script(Utf8Path::new("/opt/npm"));
/// assert!(script.starts_with("curl -fsSL https://dl.google.com/"));
/// assert!(script.ends_with("--disable-prompts --install-dir='/opt/npm'"));
/// ```
#[must_use]
pub fn bootstrap_script(install_dir: &Utf8Path) -> String {
    format!(
        "curl -fsSL {UNIX_INSTALLER_URL} | bash -s -- --disable-prompts --install-dir={}",
        single_quote(install_dir.as_str())
    )
}

fn single_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{HOME_VAR, SHELL_VAR};
    use crate::error::InstallerError;
    use crate::platform::{Arch, Platform};
    use crate::test_utils::{
        ExpectedCall, FakeEnvironment, StubExecutor, failure_output, success_output,
    };
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    fn bootstrap_call(install_dir: &Utf8Path, result: Result<std::process::Output>) -> ExpectedCall {
        let script = bootstrap_script(install_dir);
        ExpectedCall::new("bash", &["-o", "pipefail", "-c", &script], result)
    }

    fn fixture(platform: Platform) -> (TempDir, InstallerConfig) {
        let home = TempDir::new().expect("temp home");
        let install_dir = Utf8PathBuf::from("/opt/npm/gcloud");
        (home, InstallerConfig::new(platform, Arch::X86_64, &install_dir))
    }

    #[test]
    fn quotes_install_dir_with_spaces_and_quotes() {
        let script = bootstrap_script(Utf8Path::new("/Users/o'neil/my modules"));
        assert!(script.ends_with(r"--install-dir='/Users/o'\''neil/my modules'"));
    }

    #[test]
    fn installs_and_registers_bash_on_linux() {
        let (home, config) = fixture(Platform::Linux);
        let env = FakeEnvironment::new()
            .with(SHELL_VAR, "/bin/bash")
            .with(HOME_VAR, home.path().to_str().expect("utf-8 temp dir"));
        let executor = StubExecutor::new(vec![bootstrap_call(
            config.install_dir(),
            Ok(success_output()),
        )]);

        let outcome = UnixStrategy::new(&config, &executor, &env).install();

        assert!(outcome.binaries.is_ok());
        assert!(outcome.path_registration.is_ok());
        executor.assert_finished();
        let rc = std::fs::read_to_string(home.path().join(".bashrc")).expect("rc written");
        assert_eq!(
            rc,
            "\n\n# gcloud sdk\nsource /opt/npm/gcloud/google-cloud-sdk/path.bash.inc\n"
        );
    }

    #[test]
    fn macos_bash_uses_bash_profile() {
        let (home, config) = fixture(Platform::MacOs);
        let env = FakeEnvironment::new()
            .with(SHELL_VAR, "/usr/local/bin/bash")
            .with(HOME_VAR, home.path().to_str().expect("utf-8 temp dir"));
        let executor = StubExecutor::new(vec![bootstrap_call(
            config.install_dir(),
            Ok(success_output()),
        )]);

        let outcome = UnixStrategy::new(&config, &executor, &env).install();

        assert!(outcome.path_registration.is_ok());
        assert!(home.path().join(".bash_profile").exists());
        assert!(!home.path().join(".bashrc").exists());
    }

    #[test]
    fn unsupported_shell_fails_registration_without_writing() {
        let (home, config) = fixture(Platform::Linux);
        let env = FakeEnvironment::new()
            .with(SHELL_VAR, "/bin/tcsh")
            .with(HOME_VAR, home.path().to_str().expect("utf-8 temp dir"));
        let executor = StubExecutor::new(vec![bootstrap_call(
            config.install_dir(),
            Ok(success_output()),
        )]);

        let outcome = UnixStrategy::new(&config, &executor, &env).install();

        assert!(outcome.binaries.is_ok());
        assert!(matches!(
            outcome.path_registration,
            Err(InstallerError::ShellNotDetected { .. })
        ));
        let entries = std::fs::read_dir(home.path()).expect("read home").count();
        assert_eq!(entries, 0);
    }

    #[test]
    fn bootstrap_failure_still_registers_path() {
        let (home, config) = fixture(Platform::Linux);
        let env = FakeEnvironment::new()
            .with(SHELL_VAR, "/usr/bin/fish")
            .with(HOME_VAR, home.path().to_str().expect("utf-8 temp dir"));
        let executor = StubExecutor::new(vec![bootstrap_call(
            config.install_dir(),
            Ok(failure_output("curl: (6) Could not resolve host")),
        )]);

        let outcome = UnixStrategy::new(&config, &executor, &env).install();

        let err = outcome.binaries.expect_err("bootstrap fails");
        assert!(err.to_string().contains("Could not resolve host"));
        assert!(outcome.path_registration.is_ok());
        assert!(home.path().join(".config/fish/config.fish").exists());
    }

    #[test]
    fn probe_uses_which() {
        let (_home, config) = fixture(Platform::Linux);
        let env = FakeEnvironment::new();
        let executor = StubExecutor::new(vec![ExpectedCall::new(
            "which",
            &["gcloud"],
            Ok(failure_output("")),
        )]);

        assert!(!UnixStrategy::new(&config, &executor, &env).is_installed());
        executor.assert_finished();
    }
}
