use boost_schema::{Manifest, PackageEntry, Platform, ResolvedPackage, SelectionCriteria};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Could not find boost version: {0}")]
    VersionNotFound(String),
}

/// Resolves the archive to download for the host platform.
///
/// See [`resolve_for`] for the matching rules.
///
/// # Errors
///
/// Returns [`ResolveError::VersionNotFound`] if no archive matches.
pub fn resolve(
    manifest: &Manifest,
    criteria: &SelectionCriteria,
) -> Result<ResolvedPackage, ResolveError> {
    resolve_for(manifest, criteria, &Platform::current())
}

/// Resolves the archive to download for an explicit platform.
///
/// The first release whose `version` equals the requested one is selected,
/// and only that release's files are searched: a later release record with
/// the same version is never consulted, even if it would have matched.
/// Within the release, the first file whose `platform` equals `platform`
/// and which satisfies every non-empty filter wins. All comparisons are
/// exact and case-sensitive.
///
/// # Errors
///
/// Returns [`ResolveError::VersionNotFound`] carrying the requested version
/// if no release matches or the matched release has no suitable file.
pub fn resolve_for(
    manifest: &Manifest,
    criteria: &SelectionCriteria,
    platform: &Platform,
) -> Result<ResolvedPackage, ResolveError> {
    let not_found = || ResolveError::VersionNotFound(criteria.boost_version.clone());

    let release = manifest
        .versions
        .iter()
        .find(|v| v.version == criteria.boost_version)
        .ok_or_else(not_found)?;

    release
        .files
        .iter()
        .find(|file| file_matches(file, criteria, platform))
        .map(|file| ResolvedPackage {
            url: file.download_url.clone(),
            filename: file.filename.clone(),
        })
        .ok_or_else(not_found)
}

fn file_matches(file: &PackageEntry, criteria: &SelectionCriteria, platform: &Platform) -> bool {
    if file.platform != platform.as_str() {
        return false;
    }

    if let Some(toolset) = criteria.toolset_filter() {
        if file.toolset.as_deref() != Some(toolset) {
            return false;
        }
    }

    if let Some(platform_version) = criteria.platform_version_filter() {
        if file.platform_version.as_deref() != Some(platform_version) {
            return false;
        }
    }

    true
}
