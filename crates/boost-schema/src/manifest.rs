//! Version manifest data model.

use serde::{Deserialize, Serialize};

/// The remote catalog of prebuilt Boost releases.
///
/// Decoded from a JSON array of [`VersionEntry`] objects. Order is preserved
/// exactly as served, since resolution is first-match-wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Manifest {
    /// Releases in manifest order.
    pub versions: Vec<VersionEntry>,
}

/// One catalog record for a specific Boost release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionEntry {
    /// Release identifier (e.g., "1.82.0")
    pub version: String,

    /// Downloadable archives for this release, in manifest order.
    pub files: Vec<PackageEntry>,
}

/// One downloadable archive variant of a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageEntry {
    /// Operating system identifier (e.g., "linux", "win32", "darwin")
    pub platform: String,

    /// Compiler family the archive was built with (e.g., "gcc", "msvc-14.3")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub toolset: Option<String>,

    /// OS version tag (e.g., "22.04", "2022")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_version: Option<String>,

    /// Where the archive is served from
    pub download_url: String,

    /// Archive base name as served (e.g., "boost_1_82_0.tar.gz")
    pub filename: String,
}

impl Manifest {
    /// Decode a manifest from its JSON text.
    ///
    /// Every required field (`version`, `files`, `platform`, `download_url`,
    /// `filename`) must be present; unknown fields such as `arch` are ignored.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] if the text is not valid
    /// JSON or does not match the manifest shape.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Number of release records.
    pub fn len(&self) -> usize {
        self.versions.len()
    }

    /// Returns `true` if the manifest lists no releases.
    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }
}

impl From<Vec<VersionEntry>> for Manifest {
    fn from(versions: Vec<VersionEntry>) -> Self {
        Self { versions }
    }
}
