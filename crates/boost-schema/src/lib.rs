//! Shared types for the Boost installer.
//!
//! This crate describes the remote version manifest (`versions-manifest.json`)
//! and the values that flow between the resolver and the download step. It
//! performs no I/O.

pub mod manifest;
pub mod platform;
pub mod selection;

// Re-exports
pub use manifest::{Manifest, PackageEntry, VersionEntry};
pub use platform::Platform;
pub use selection::{CriteriaError, ResolvedPackage, SelectionCriteria};
