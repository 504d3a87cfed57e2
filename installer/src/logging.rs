//! Log level selection and the stderr logger.
//!
//! The installer runs as an npm lifecycle script, so verbosity follows npm's
//! own `loglevel` setting. The same setting decides how much output from
//! child installers reaches the terminal.

use crate::env::{Environment, NPM_LOGLEVEL_VAR};
use crate::error::Result;
use crate::exec::{CommandExecutor, StdioPolicy, ensure_success};
use log::{LevelFilter, Log, Metadata, Record};
use std::io::Write;

/// Level used when npm reports something unrecognised.
pub const DEFAULT_LEVEL: LevelFilter = LevelFilter::Warn;

/// The resolved logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// The raw npm level the settings were derived from, if any.
    pub npm_level: Option<String>,
    /// Maximum level emitted by the logger.
    pub filter: LevelFilter,
    /// Stream wiring for user-visible child processes.
    pub stdio: StdioPolicy,
    /// Whether `npm_level` was set but not recognised.
    pub unrecognised: bool,
    /// Why `npm config get loglevel` could not be used, when it was tried
    /// and failed.
    pub query_error: Option<String>,
}

impl LogSettings {
    /// Derives settings from an npm log level name.
    ///
    /// # Examples
    ///
    /// ```
    /// use gcloud_installer::exec::StdioPolicy;
    /// use gcloud_installer::logging::LogSettings;
    /// use log::LevelFilter;
    ///
    /// let settings = LogSettings::from_npm_level(Some("verbose"));
    /// assert_eq!(settings.filter, LevelFilter::Debug);
    /// assert_eq!(settings.stdio, StdioPolicy::Inherit);
    ///
    /// let settings = LogSettings::from_npm_level(Some("nyan cat"));
    /// assert_eq!(settings.filter, LevelFilter::Warn);
    /// assert!(settings.unrecognised);
    /// ```
    #[must_use]
    pub fn from_npm_level(level: Option<&str>) -> Self {
        let trimmed = level.map(str::trim).filter(|value| !value.is_empty());
        let mapped = trimmed.and_then(map_npm_level);
        Self {
            npm_level: trimmed.map(str::to_owned),
            filter: mapped.unwrap_or(DEFAULT_LEVEL),
            stdio: stdio_for(trimmed),
            unrecognised: trimmed.is_some() && mapped.is_none(),
            query_error: None,
        }
    }

    /// Resolves settings from, in order: an explicit override, the
    /// `npm_config_loglevel` variable, and `npm config get loglevel`.
    #[must_use]
    pub fn resolve(
        override_level: Option<&str>,
        env: &dyn Environment,
        executor: &dyn CommandExecutor,
    ) -> Self {
        if let Some(level) = override_level {
            return Self::from_npm_level(Some(level));
        }
        if let Some(level) = env.var(NPM_LOGLEVEL_VAR) {
            return Self::from_npm_level(Some(&level));
        }
        match query_npm_level(executor) {
            Ok(level) => Self::from_npm_level(Some(&level)),
            Err(err) => Self {
                query_error: Some(err.to_string()),
                ..Self::from_npm_level(None)
            },
        }
    }

    /// Installs the stderr logger and reports an unrecognised npm level.
    ///
    /// Calling this more than once keeps the first logger.
    pub fn install(&self) {
        if log::set_boxed_logger(Box::new(StderrLogger)).is_ok() {
            log::set_max_level(self.filter);
        }
        if let Some(reason) = &self.query_error {
            log::debug!("Could not read the npm log level ({reason}); using default of 'warn'");
        }
        if self.unrecognised {
            log::warn!(
                "npm log level '{}' is unsupported; using default of 'warn'",
                self.npm_level.as_deref().unwrap_or_default()
            );
        }
    }
}

const NPM_QUERY_ARGS: &[&str] = &["config", "get", "loglevel"];

fn query_npm_level(executor: &dyn CommandExecutor) -> Result<String> {
    let output = executor.run("npm", NPM_QUERY_ARGS)?;
    ensure_success("npm", NPM_QUERY_ARGS, &output)?;
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Maps npm log level names to `log` filters.
fn map_npm_level(level: &str) -> Option<LevelFilter> {
    match level {
        "silly" => Some(LevelFilter::Trace),
        "verbose" | "http" => Some(LevelFilter::Debug),
        "info" | "notice" => Some(LevelFilter::Info),
        "warn" => Some(LevelFilter::Warn),
        "error" => Some(LevelFilter::Error),
        "silent" => Some(LevelFilter::Off),
        _ => None,
    }
}

fn stdio_for(level: Option<&str>) -> StdioPolicy {
    match level {
        Some("silent") => StdioPolicy::Silent,
        Some("warn" | "error") => StdioPolicy::StderrOnly,
        _ => StdioPolicy::Inherit,
    }
}

/// Writes log records to stderr, one per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut stderr = std::io::stderr().lock();
        if writeln!(stderr, "{}", format_record(record)).is_err() {
            // Best-effort logging; ignore write failures.
        }
    }

    fn flush(&self) {
        if std::io::stderr().flush().is_err() {
            // Best-effort logging; ignore flush failures.
        }
    }
}

fn format_record(record: &Record<'_>) -> String {
    match record.level() {
        log::Level::Error | log::Level::Warn | log::Level::Info => record.args().to_string(),
        level => format!("[{}] {}", level.as_str().to_lowercase(), record.args()),
    }
}
