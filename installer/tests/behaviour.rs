//! Behaviour-driven tests for the installer.
//!
//! Scenarios drive the full install-or-update flow against stubbed
//! processes, a recording archive fetcher, and a temporary home directory.

use camino::Utf8Path;
use gcloud_installer::config::InstallerConfig;
use gcloud_installer::env::{HOME_VAR, PATH_VAR, SHELL_VAR};
use gcloud_installer::error::InstallerError;
use gcloud_installer::orchestrator::{self, RunAction, UPDATE_ARGS};
use gcloud_installer::platform::{Arch, Platform, PlatformFamily};
use gcloud_installer::probe::lookup_command;
use gcloud_installer::strategy::unix::bootstrap_script;
use gcloud_installer::strategy::windows::{append_path_entry, set_user_path_script};
use gcloud_installer::strategy::{Capabilities, Strategy};
use gcloud_installer::test_utils::{
    ExpectedCall, FakeEnvironment, FetchEvent, RecordingFetcher, StubExecutor, failure_output,
    success_output,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

type InstallResult<T> = gcloud_installer::error::Result<T>;

const ARCHIVE: &[u8] = b"PK\x03\x04 windows sdk";
const WINDOWS_PATH: &str = r"C:\Windows\system32";

struct InstallWorld {
    home: TempDir,
    platform: Option<InstallResult<Platform>>,
    already_installed: bool,
    shell: Option<String>,
    bootstrap_fails: bool,
    update_fails: bool,
    result: Option<InstallResult<RunAction>>,
    invocations: Vec<String>,
    fetch_events: Vec<FetchEvent>,
}

#[fixture]
fn world() -> InstallWorld {
    InstallWorld {
        home: tempfile::tempdir().expect("temp home"),
        platform: None,
        already_installed: false,
        shell: None,
        bootstrap_fails: false,
        update_fails: false,
        result: None,
        invocations: Vec::new(),
        fetch_events: Vec::new(),
    }
}

impl InstallWorld {
    fn install_dir(platform: Platform) -> &'static Utf8Path {
        match platform.family() {
            PlatformFamily::Unix => Utf8Path::new("/opt/npm/gcloud"),
            PlatformFamily::Windows => Utf8Path::new("C:/npm/gcloud"),
        }
    }

    fn environment(&self) -> FakeEnvironment {
        let home = self.home.path().to_str().expect("UTF-8 temp dir");
        let env = FakeEnvironment::new()
            .with(HOME_VAR, home)
            .with(PATH_VAR, WINDOWS_PATH);
        match &self.shell {
            Some(shell) => env.with(SHELL_VAR, shell),
            None => env,
        }
    }

    fn expected_calls(&self, config: &InstallerConfig) -> Vec<ExpectedCall> {
        let (probe_cmd, probe_args) = lookup_command(config.platform.family());
        let probe_result = if self.already_installed {
            success_output()
        } else {
            failure_output("")
        };
        let mut calls = vec![ExpectedCall::new(probe_cmd, probe_args, Ok(probe_result))];

        if self.already_installed {
            let update_result = if self.update_fails {
                failure_output("ERROR: (gcloud.components.update) network unreachable")
            } else {
                success_output()
            };
            calls.push(ExpectedCall::new(
                config.platform.sdk_command(),
                UPDATE_ARGS,
                Ok(update_result),
            ));
            return calls;
        }

        match config.platform.family() {
            PlatformFamily::Unix => {
                let script = bootstrap_script(config.install_dir());
                let result = if self.bootstrap_fails {
                    failure_output("curl: (6) Could not resolve host: dl.google.com")
                } else {
                    success_output()
                };
                calls.push(ExpectedCall::new(
                    "bash",
                    &["-o", "pipefail", "-c", &script],
                    Ok(result),
                ));
            }
            PlatformFamily::Windows => {
                let sdk = config.extracted_sdk_dir();
                let installer = sdk.join("install.bat");
                calls.push(ExpectedCall::new(
                    installer.as_str(),
                    &["-q"],
                    Ok(success_output()),
                ));
                let script = set_user_path_script(&append_path_entry(
                    WINDOWS_PATH,
                    sdk.join("bin").as_str(),
                ));
                calls.push(ExpectedCall::new(
                    "powershell",
                    &["-NoProfile", "-NonInteractive", "-Command", &script],
                    Ok(success_output()),
                ));
            }
        }
        calls
    }

    fn result(&self) -> &InstallResult<RunAction> {
        self.result.as_ref().expect("installer has run")
    }
}

#[given("the host platform is \"{os}\"")]
fn given_platform(world: &mut InstallWorld, os: String) {
    world.platform = Some(Platform::from_os_id(&os));
}

#[given("gcloud is already on PATH")]
fn given_installed(world: &mut InstallWorld) {
    world.already_installed = true;
}

#[given("gcloud is not on PATH")]
fn given_not_installed(world: &mut InstallWorld) {
    world.already_installed = false;
}

#[given("the user's shell is \"{shell}\"")]
fn given_shell(world: &mut InstallWorld, shell: String) {
    world.shell = Some(shell);
}

#[given("the bootstrap script fails")]
fn given_bootstrap_fails(world: &mut InstallWorld) {
    world.bootstrap_fails = true;
}

#[given("the components update fails")]
fn given_update_fails(world: &mut InstallWorld) {
    world.update_fails = true;
}

#[when("the installer runs")]
fn when_installer_runs(world: &mut InstallWorld) {
    let platform = match world.platform.take().expect("platform set") {
        Ok(platform) => platform,
        Err(err) => {
            world.result = Some(Err(err));
            return;
        }
    };

    let config = InstallerConfig::new(
        platform,
        Arch::X86_64,
        InstallWorld::install_dir(platform),
    );
    let executor = StubExecutor::new(world.expected_calls(&config));
    let fetcher = RecordingFetcher::serving(ARCHIVE);
    let env = world.environment();
    let strategy = Strategy::select(
        &config,
        Capabilities {
            executor: &executor,
            fetcher: &fetcher,
            env: &env,
        },
    );

    world.result = Some(orchestrator::run(
        &strategy,
        &executor,
        platform.sdk_command(),
    ));
    world.invocations = executor.invocations();
    world.fetch_events = fetcher.events();
    if world.result().is_ok() {
        executor.assert_finished();
    }
}

#[then("the SDK is updated")]
fn then_updated(world: &mut InstallWorld) {
    assert!(
        matches!(world.result(), Ok(RunAction::Updated)),
        "expected update, got {:?}",
        world.result()
    );
}

#[then("the SDK is installed")]
fn then_installed(world: &mut InstallWorld) {
    assert!(
        matches!(world.result(), Ok(RunAction::Installed)),
        "expected install, got {:?}",
        world.result()
    );
}

#[then("the run fails with \"{prefix}\"")]
fn then_fails_with(world: &mut InstallWorld, prefix: String) {
    let message = match world.result() {
        Err(err) => err.to_string(),
        Ok(action) => panic!("expected failure, got {action:?}"),
    };
    assert!(
        message.starts_with(&prefix),
        "expected message starting with '{prefix}', got: {message}"
    );
    assert!(!matches!(
        world.result(),
        Err(InstallerError::StubMismatch { .. })
    ));
}

#[then("no installer is started")]
fn then_no_installer(world: &mut InstallWorld) {
    let started = world.invocations.iter().any(|command| {
        command.starts_with("bash ") || command.contains("install.bat")
    });
    assert!(!started, "unexpected installer run: {:?}", world.invocations);
    assert!(world.fetch_events.is_empty());
}

#[then("the rc file \"{name}\" sources \"{include}\"")]
fn then_rc_sources(world: &mut InstallWorld, name: String, include: String) {
    let rc = std::fs::read_to_string(world.home.path().join(&name)).expect("rc file written");
    assert!(rc.contains("# gcloud sdk"), "rc file: {rc}");
    let source_line = rc
        .lines()
        .find(|line| line.starts_with("source "))
        .expect("source line");
    assert!(source_line.ends_with(&include), "source line: {source_line}");
}

#[then("no rc file is written")]
fn then_no_rc_file(world: &mut InstallWorld) {
    let entries = std::fs::read_dir(world.home.path())
        .expect("read home")
        .count();
    assert_eq!(entries, 0);
}

#[then("the archive is cleared, fetched, then extracted")]
fn then_archive_order(world: &mut InstallWorld) {
    let kinds: Vec<&str> = world
        .fetch_events
        .iter()
        .map(|event| match event {
            FetchEvent::Clear(_) => "clear",
            FetchEvent::Fetch(_) => "fetch",
            FetchEvent::Extract { .. } => "extract",
        })
        .collect();
    assert_eq!(kinds, ["clear", "fetch", "extract"]);
}

#[scenario(
    path = "tests/features/installer.feature",
    name = "An SDK already on PATH is updated"
)]
fn scenario_update_existing(world: InstallWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/installer.feature",
    name = "A failed update is fatal"
)]
fn scenario_update_fails(world: InstallWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/installer.feature",
    name = "A fresh Linux install registers zsh"
)]
fn scenario_linux_zsh(world: InstallWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/installer.feature",
    name = "An unsupported shell only produces a warning"
)]
fn scenario_unsupported_shell(world: InstallWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/installer.feature",
    name = "A failed bootstrap script is fatal"
)]
fn scenario_bootstrap_fails(world: InstallWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/installer.feature",
    name = "A fresh Windows install unpacks the archive before installing"
)]
fn scenario_windows_install(world: InstallWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/installer.feature",
    name = "An unsupported platform is rejected before any side effect"
)]
fn scenario_unsupported_platform(world: InstallWorld) {
    let _ = world;
}
