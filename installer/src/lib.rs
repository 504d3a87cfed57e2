//! gcloud installer library.
//!
//! This crate installs the Google Cloud SDK from an npm post-install hook, or
//! updates it when `gcloud` is already on PATH. It is used by the
//! `gcloud-installer` binary and can be driven programmatically with
//! injected executors, fetchers, and environments for testing.
//!
//! # Modules
//!
//! - [`artefact`] - Archive download and zip extraction
//! - [`cli`] - Command-line argument definitions
//! - [`config`] - Platform, architecture, and install path resolution
//! - [`env`] - Environment variable access
//! - [`error`] - Error types and the fatal/warning split
//! - [`exec`] - External command execution
//! - [`logging`] - npm log level mapping and the stderr logger
//! - [`orchestrator`] - Install-or-update flow and concurrent branch joining
//! - [`platform`] - Supported operating systems and architectures
//! - [`probe`] - Installed-state detection
//! - [`shell`] - Shell detection and rc file registration
//! - [`strategy`] - Per-platform installation strategies

pub mod artefact;
pub mod cli;
pub mod config;
pub mod env;
pub mod error;
pub mod exec;
pub mod logging;
pub mod orchestrator;
pub mod platform;
pub mod probe;
pub mod shell;
pub mod strategy;

#[cfg(any(test, feature = "test-support"))]
pub mod test_utils;
