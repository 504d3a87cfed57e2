//! Installed-state probe.
//!
//! Looks the SDK binary up on the current PATH. A failed lookup is a normal
//! negative answer, never an error.

use crate::exec::CommandExecutor;
use crate::platform::PlatformFamily;

/// Returns the PATH lookup command for a platform family.
#[must_use]
pub const fn lookup_command(family: PlatformFamily) -> (&'static str, &'static [&'static str]) {
    match family {
        PlatformFamily::Unix => ("which", &["gcloud"]),
        PlatformFamily::Windows => ("where", &["/q", "gcloud"]),
    }
}

/// Returns `true` iff the PATH lookup exits with status zero.
///
/// Spawn failures and non-zero exits both yield `false`.
pub fn is_sdk_installed(executor: &dyn CommandExecutor, family: PlatformFamily) -> bool {
    let (cmd, args) = lookup_command(family);
    match executor.run(cmd, args) {
        Ok(output) if output.status.success() => {
            log::debug!(
                "Found installed gcloud binary at {}",
                String::from_utf8_lossy(&output.stdout).trim()
            );
            true
        }
        Ok(_) => {
            log::debug!("No gcloud installation found");
            false
        }
        Err(err) => {
            log::debug!("No gcloud installation found ({cmd} failed: {err})");
            false
        }
    }
}
