//! HTTP download of installer archives.
//!
//! The response body is streamed into a temporary file first, so a large
//! archive never has to fit in a fixed-size response buffer, and then read
//! back into memory. The temporary file is removed when it is dropped.

use std::io::{Read, Seek, SeekFrom};
use std::sync::OnceLock;

/// Errors arising from archive download operations.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// HTTP request failed.
    #[error("download failed for {url}: {reason}")]
    HttpError {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The requested archive was not found (HTTP 404).
    #[error("archive not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },

    /// I/O error writing or reading the downloaded file.
    #[error("I/O error writing download: {0}")]
    Io(#[from] std::io::Error),
}

/// Download a URL and return the body bytes.
///
/// # Errors
///
/// Returns [`DownloadError::NotFound`] for HTTP 404,
/// [`DownloadError::HttpError`] for other request failures, and
/// [`DownloadError::Io`] if the temporary file cannot be written or read.
pub fn download_bytes(url: &str) -> Result<Vec<u8>, DownloadError> {
    log::debug!("Downloading file from {url}");
    let response = http_agent()
        .get(url)
        .call()
        .map_err(|e| map_ureq_error(url, &e))?;

    let mut file = tempfile::tempfile()?;
    std::io::copy(&mut response.into_body().as_reader(), &mut file)
        .map_err(|e| DownloadError::HttpError {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;

    file.seek(SeekFrom::Start(0))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;
    log::debug!("Downloaded {} bytes from {url}", bytes.len());
    Ok(bytes)
}

/// Shared `ureq` agent.
///
/// No global timeout is configured: an installer download runs to
/// completion or failure.
fn http_agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| ureq::Agent::new_with_config(ureq::Agent::config_builder().build()))
}

/// Map a ureq error to a [`DownloadError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> DownloadError {
    match err {
        ureq::Error::StatusCode(404) => DownloadError::NotFound {
            url: url.to_owned(),
        },
        other => DownloadError::HttpError {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
