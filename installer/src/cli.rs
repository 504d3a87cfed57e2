//! CLI argument definitions for the gcloud installer.
//!
//! The binary normally runs unattended as an npm `postinstall` script, so
//! every flag is optional and defaults to what npm provides.

use camino::Utf8PathBuf;
use clap::Parser;

/// Install or update the Google Cloud SDK.
#[derive(Parser, Debug, Clone, Default, PartialEq, Eq)]
#[command(name = "gcloud-installer")]
#[command(version, about)]
#[command(long_about = concat!(
    "Install or update the Google Cloud SDK.\n\n",
    "If `gcloud` is already on PATH its components are updated. Otherwise the ",
    "SDK is installed next to this package and registered on the user's PATH: ",
    "through the shell rc file on Linux and macOS, or the user `Path` variable ",
    "on Windows.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Run as an npm postinstall hook:\n",
    "    $ gcloud-installer\n\n",
    "  Install into a specific directory with verbose logging:\n",
    "    $ gcloud-installer --install-dir ~/.local/share/gcloud --loglevel verbose",
))]
pub struct Cli {
    /// Directory the SDK is installed under [default: this executable's directory].
    #[arg(long, value_name = "DIR")]
    pub install_dir: Option<Utf8PathBuf>,

    /// npm log level (silly, verbose, http, info, notice, warn, error, silent)
    /// [default: from npm].
    #[arg(long, value_name = "LEVEL")]
    pub loglevel: Option<String>,
}
