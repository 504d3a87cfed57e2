//! Installer archive retrieval.
//!
//! The Windows strategy sequences these operations as
//! clear destination → fetch → extract, then runs the installer found in
//! the extracted tree.
//!
//! # Sub-modules
//!
//! - [`download`] - HTTP download via `ureq`.
//! - [`extraction`] - Zip extraction with path traversal protection.

pub mod download;
pub mod extraction;

use crate::error::Result;
use std::path::Path;

/// Downloads and unpacks installer archives.
///
/// Abstractions allow tests to observe call order without network access.
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveFetcher: Send + Sync {
    /// Download `url` and return the archive bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or the temporary file write fails.
    fn fetch(&self, url: &str) -> Result<Vec<u8>>;

    /// Extract `archive` into `dest_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the archive is invalid or cannot be written.
    fn extract(&self, archive: &[u8], dest_dir: &Path) -> Result<()>;

    /// Remove `dir` and its contents; a missing directory is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing directory cannot be removed.
    fn clear_directory(&self, dir: &Path) -> Result<()>;
}

/// Production fetcher: HTTP download and zip extraction.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpZipFetcher;

impl ArchiveFetcher for HttpZipFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        Ok(download::download_bytes(url)?)
    }

    fn extract(&self, archive: &[u8], dest_dir: &Path) -> Result<()> {
        let written = extraction::extract_zip(archive, dest_dir)?;
        log::debug!("Extracted {written} files to {}", dest_dir.display());
        Ok(())
    }

    fn clear_directory(&self, dir: &Path) -> Result<()> {
        Ok(extraction::clear_directory(dir)?)
    }
}
