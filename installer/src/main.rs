//! gcloud installer CLI entrypoint.
//!
//! Runs as an npm post-install hook: updates the Google Cloud SDK when it is
//! already on PATH, otherwise installs it and registers it on the user's PATH.

use clap::Parser;
use gcloud_installer::artefact::HttpZipFetcher;
use gcloud_installer::cli::Cli;
use gcloud_installer::config::InstallerConfig;
use gcloud_installer::env::SystemEnvironment;
use gcloud_installer::error::Result;
use gcloud_installer::exec::SystemCommandExecutor;
use gcloud_installer::logging::LogSettings;
use gcloud_installer::orchestrator::{self, RunAction};
use gcloud_installer::strategy::{Capabilities, Strategy};
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli) -> Result<RunAction> {
    let env = SystemEnvironment;

    let settings = LogSettings::resolve(
        cli.loglevel.as_deref(),
        &env,
        &SystemCommandExecutor::default(),
    );
    settings.install();

    // Unsupported platforms fail here, before any side effect.
    let config = InstallerConfig::detect(cli.install_dir.clone())?;
    log::debug!(
        "Platform {} ({}), SDK root {}",
        config.platform,
        config.arch,
        config.sdk_root
    );

    let executor = SystemCommandExecutor::new(settings.stdio);
    let fetcher = HttpZipFetcher;
    let strategy = Strategy::select(
        &config,
        Capabilities {
            executor: &executor,
            fetcher: &fetcher,
            env: &env,
        },
    );

    let action = orchestrator::run(&strategy, &executor, config.platform.sdk_command())?;
    log::info!("{}", completion_message(action));
    Ok(action)
}

fn completion_message(action: RunAction) -> &'static str {
    match action {
        RunAction::Installed => "gcloud SDK installed.",
        RunAction::Updated => "gcloud SDK updated.",
    }
}

fn exit_code_for_run_result(result: Result<RunAction>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(_) => 0,
        Err(err) => {
            write_stderr_line(stderr, err);
            1
        }
    }
}

fn write_stderr_line(stderr: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort logging; ignore write failures.
    }
}
