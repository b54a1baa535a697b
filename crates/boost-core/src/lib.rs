pub mod error;
pub mod install;
pub mod io;
pub mod paths;
pub mod resolver;

pub mod reporter;

pub use error::{ErrorKind, InstallError};
pub use install::{
    DirNaming, InstallLayout, InstallMethod, InstallOptions, InstallOutcome, InstallState,
    Installer,
};
pub use paths::*;
pub use reporter::{NullReporter, Reporter};

/// User Agent string for core operations
pub const USER_AGENT: &str = concat!("boost-core/", env!("CARGO_PKG_VERSION"));

/// Published catalog of prebuilt Boost archives.
pub const MANIFEST_URL: &str =
    "https://raw.githubusercontent.com/actions/boost-versions/main/versions-manifest.json";
