//! Filesystem provisioning and cleanup.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
#[error("Failed to create directory {}: {source}", path.display())]
pub struct DirectoryError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

#[derive(Error, Debug)]
#[error("Failed to remove {}: {source}", path.display())]
pub struct CleanupError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Outcome of [`ensure_directory`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectoryStatus {
    Created,
    AlreadyExists,
}

/// Creates `path` if it does not exist yet.
///
/// Creation is not recursive: the parent must already exist. Calling this
/// again once the directory exists is a no-op.
pub fn ensure_directory(path: &Path) -> Result<DirectoryStatus, DirectoryError> {
    if path.exists() {
        return Ok(DirectoryStatus::AlreadyExists);
    }

    std::fs::create_dir(path).map_err(|source| DirectoryError {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(DirectoryStatus::Created)
}

/// Deletes a downloaded archive once it has been unpacked.
pub fn remove_archive(path: &Path) -> Result<(), CleanupError> {
    std::fs::remove_file(path).map_err(|source| CleanupError {
        path: path.to_path_buf(),
        source,
    })
}
