//! Selection criteria and resolution results.

use thiserror::Error;

/// What the caller asked for.
///
/// `toolset` and `platform_version` may be empty, meaning "don't filter on
/// this dimension". Matching against manifest entries is exact and
/// case-sensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionCriteria {
    /// Release to install (e.g., "1.82.0")
    pub boost_version: String,
    /// Compiler family filter, empty for any
    pub toolset: String,
    /// OS version filter, empty for any
    pub platform_version: String,
}

/// Errors that can occur when validating [`SelectionCriteria`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CriteriaError {
    /// The required `boost_version` input is empty.
    #[error("boost_version variable must be set")]
    MissingVersion,
}

impl SelectionCriteria {
    /// Build criteria from the three raw inputs.
    pub fn new(
        boost_version: impl Into<String>,
        toolset: impl Into<String>,
        platform_version: impl Into<String>,
    ) -> Self {
        Self {
            boost_version: boost_version.into(),
            toolset: toolset.into(),
            platform_version: platform_version.into(),
        }
    }

    /// Checks that the required version input is present.
    ///
    /// # Errors
    ///
    /// Returns [`CriteriaError::MissingVersion`] if `boost_version` is empty.
    pub fn validate(&self) -> Result<(), CriteriaError> {
        if self.boost_version.is_empty() {
            return Err(CriteriaError::MissingVersion);
        }
        Ok(())
    }

    /// The toolset filter, or `None` when unfiltered.
    pub fn toolset_filter(&self) -> Option<&str> {
        Some(self.toolset.as_str()).filter(|s| !s.is_empty())
    }

    /// The platform version filter, or `None` when unfiltered.
    pub fn platform_version_filter(&self) -> Option<&str> {
        Some(self.platform_version.as_str()).filter(|s| !s.is_empty())
    }
}

/// The archive chosen by resolution, consumed immediately by the download step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPackage {
    /// Download URL of the archive
    pub url: String,
    /// Archive base name as served
    pub filename: String,
}
