//! Errors surfaced by a Boost install run.

use boost_schema::CriteriaError;
use thiserror::Error;

use crate::io::download::DownloadError;
use crate::io::extract::ExtractError;
use crate::io::fs::{CleanupError, DirectoryError};
use crate::io::manifest::ManifestError;
use crate::resolver::ResolveError;

#[derive(Error, Debug)]
pub enum InstallError {
    #[error(transparent)]
    Validation(#[from] CriteriaError),

    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Resolution(#[from] ResolveError),

    #[error("Archive filename '{0}' does not yield an install directory name")]
    InvalidFilename(String),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error("Download failed: {0}")]
    Download(#[from] DownloadError),

    #[error(transparent)]
    Extraction(#[from] ExtractError),

    #[error(transparent)]
    Cleanup(#[from] CleanupError),
}

/// Which stage of the run failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Fetch,
    Parse,
    VersionNotFound,
    InvalidFilename,
    Directory,
    Download,
    Extraction,
    Cleanup,
}

impl InstallError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Manifest(ManifestError::Fetch(_)) => ErrorKind::Fetch,
            Self::Manifest(ManifestError::Parse(_)) => ErrorKind::Parse,
            Self::Resolution(ResolveError::VersionNotFound(_)) => ErrorKind::VersionNotFound,
            Self::InvalidFilename(_) => ErrorKind::InvalidFilename,
            Self::Directory(_) => ErrorKind::Directory,
            Self::Download(_) => ErrorKind::Download,
            Self::Extraction(_) => ErrorKind::Extraction,
            Self::Cleanup(_) => ErrorKind::Cleanup,
        }
    }
}
