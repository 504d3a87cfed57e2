//! Zip extraction for the Windows SDK archive.
//!
//! Extracts an in-memory `.zip` archive to a target directory with path
//! traversal protection to prevent zip-slip attacks.

use std::io::Cursor;
use std::path::{Component, Path};

/// Errors arising from archive extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// I/O error during extraction or directory removal.
    #[error("extraction I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The archive could not be read as a zip file.
    #[error("invalid zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A path in the archive attempts to traverse outside the destination.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending path from the archive entry.
        path: String,
    },

    /// The archive contains no files.
    #[error("archive contains no files")]
    EmptyArchive,
}

/// Extract `archive` into `dest_dir`, creating it if necessary.
///
/// Returns the number of files written.
///
/// # Errors
///
/// Returns [`ExtractionError::PathTraversal`] if any entry attempts to
/// escape the destination directory, [`ExtractionError::EmptyArchive`] if
/// no files are found, and [`ExtractionError::Zip`] or
/// [`ExtractionError::Io`] on read or write failures.
pub fn extract_zip(archive: &[u8], dest_dir: &Path) -> Result<usize, ExtractionError> {
    log::debug!("Extracting archive to {}", dest_dir.display());
    let mut archive = zip::ZipArchive::new(Cursor::new(archive))?;
    std::fs::create_dir_all(dest_dir)?;

    let mut written = 0;
    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let entry_path = entry
            .enclosed_name()
            .ok_or_else(|| ExtractionError::PathTraversal {
                path: entry.name().to_owned(),
            })?;
        validate_entry_path(&entry_path)?;

        let output_path = dest_dir.join(&entry_path);
        if entry.is_dir() {
            std::fs::create_dir_all(&output_path)?;
            continue;
        }

        if let Some(parent) = output_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut outfile = std::fs::File::create(&output_path)?;
        std::io::copy(&mut entry, &mut outfile)?;
        written += 1;
    }

    if written == 0 {
        return Err(ExtractionError::EmptyArchive);
    }
    Ok(written)
}

/// Remove `dir` and everything under it. A missing directory is not an error.
///
/// # Errors
///
/// Returns [`ExtractionError::Io`] if removal fails for any other reason.
pub fn clear_directory(dir: &Path) -> Result<(), ExtractionError> {
    log::debug!("Deleting directory {}", dir.display());
    match std::fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(ExtractionError::Io(err)),
    }
}

/// Validate that an entry path does not escape the destination
/// directory via `..` components or absolute paths.
fn validate_entry_path(path: &Path) -> Result<(), ExtractionError> {
    if path.is_absolute()
        || path
            .components()
            .any(|component| matches!(component, Component::ParentDir))
    {
        return Err(ExtractionError::PathTraversal {
            path: path.display().to_string(),
        });
    }
    Ok(())
}
