//! Access to the environment variables the installer consumes.
//!
//! Reading the process environment through a trait keeps shell detection,
//! rc-path resolution, and Windows PATH registration testable without
//! mutating global state.

use std::path::PathBuf;

/// Variable naming the user's login shell program.
pub const SHELL_VAR: &str = "SHELL";
/// Variable naming the user's home directory.
pub const HOME_VAR: &str = "HOME";
/// Executable search path.
pub const PATH_VAR: &str = "PATH";
/// Log level npm exports to lifecycle scripts.
pub const NPM_LOGLEVEL_VAR: &str = "npm_config_loglevel";

/// Read-only view of environment variables.
pub trait Environment: Send + Sync {
    /// Returns the value of `key`, or `None` when unset or not valid Unicode.
    fn var(&self, key: &str) -> Option<String>;

    /// Returns the home directory, when `HOME` is set and non-empty.
    fn home_dir(&self) -> Option<PathBuf> {
        self.var(HOME_VAR)
            .filter(|home| !home.is_empty())
            .map(PathBuf::from)
    }
}

/// Reads the real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnvironment;

impl Environment for SystemEnvironment {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_environment_reads_process_variables() {
        temp_env::with_var("GCLOUD_INSTALLER_TEST_VAR", Some("value"), || {
            assert_eq!(
                SystemEnvironment.var("GCLOUD_INSTALLER_TEST_VAR").as_deref(),
                Some("value")
            );
        });
    }

    #[test]
    fn system_environment_reports_unset_variables() {
        temp_env::with_var_unset("GCLOUD_INSTALLER_TEST_UNSET", || {
            assert!(SystemEnvironment.var("GCLOUD_INSTALLER_TEST_UNSET").is_none());
        });
    }

    #[test]
    fn empty_home_is_treated_as_unknown() {
        temp_env::with_var(HOME_VAR, Some(""), || {
            assert!(SystemEnvironment.home_dir().is_none());
        });
    }

    #[test]
    fn home_dir_reads_home() {
        temp_env::with_var(HOME_VAR, Some("/home/dev"), || {
            assert_eq!(SystemEnvironment.home_dir(), Some(PathBuf::from("/home/dev")));
        });
    }
}
