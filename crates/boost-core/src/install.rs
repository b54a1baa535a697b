//! Installation Flow
//!
//! Sequences one install as a linear series of states:
//!
//! ```text
//! Start -> ManifestFetched -> PackageResolved -> DirectoryReady
//!       -> Downloaded -> Extracted [-> CleanedUp] -> Done
//! ```
//!
//! Any step failing moves straight to `Failed`. Completed steps are not
//! rolled back: a created directory or downloaded archive stays on disk.
//!
//! The two supported methods differ only in their [`InstallLayout`]:
//! how the output directory name is derived from the archive filename, and
//! whether the archive is deleted after extraction.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use boost_schema::{Platform, SelectionCriteria};
use reqwest::Client;

use crate::error::InstallError;
use crate::io::download::DownloadRequest;
use crate::io::extract::Extractor;
use crate::io::fs::{self, DirectoryError, DirectoryStatus};
use crate::io::manifest::fetch_manifest;
use crate::reporter::Reporter;
use crate::resolver::resolve_for;

/// Rule for turning an archive filename into the output directory name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirNaming {
    /// Everything before the first `.` (`my.pkg.tar.gz` -> `my`).
    FirstDotSegment,
    /// Drop the last two `.`-separated segments (`my.pkg.tar.gz` -> `my.pkg`).
    StripTwoExtensions,
}

impl DirNaming {
    /// Applies the rule to `filename`.
    ///
    /// Either rule can yield an empty string for a dot-prefixed filename
    /// such as `.tar.gz`; the installer rejects such archives instead of
    /// installing into the root itself.
    pub fn derive(self, filename: &str) -> &str {
        match self {
            Self::FirstDotSegment => filename.split('.').next().unwrap_or(filename),
            Self::StripTwoExtensions => strip_extension(strip_extension(filename)),
        }
    }
}

fn strip_extension(name: &str) -> &str {
    name.rfind('.').map_or(name, |idx| &name[..idx])
}

/// What a given install method does differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallLayout {
    pub naming: DirNaming,
    /// Delete the archive once it has been extracted.
    pub cleanup: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InstallMethod {
    #[default]
    Current,
    /// The V1 flow: two-extension naming plus archive cleanup.
    Legacy,
}

impl InstallMethod {
    pub fn layout(self) -> InstallLayout {
        match self {
            Self::Current => InstallLayout {
                naming: DirNaming::FirstDotSegment,
                cleanup: false,
            },
            Self::Legacy => InstallLayout {
                naming: DirNaming::StripTwoExtensions,
                cleanup: true,
            },
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Current => "current",
            Self::Legacy => "legacy",
        }
    }
}

impl std::fmt::Display for InstallMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for InstallMethod {
    type Err = String;

    /// An empty string selects the current method.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "current" | "default" => Ok(Self::Current),
            "legacy" | "v1" => Ok(Self::Legacy),
            _ => Err(format!("Unknown install method: {s}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallState {
    Start,
    ManifestFetched,
    PackageResolved,
    DirectoryReady,
    Downloaded,
    Extracted,
    CleanedUp,
    Done,
    Failed,
}

impl InstallState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::ManifestFetched => "manifest-fetched",
            Self::PackageResolved => "package-resolved",
            Self::DirectoryReady => "directory-ready",
            Self::Downloaded => "downloaded",
            Self::Extracted => "extracted",
            Self::CleanedUp => "cleaned-up",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for InstallState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything an install needs besides the selection criteria.
#[derive(Debug, Clone)]
pub struct InstallOptions {
    /// Directory the archive is downloaded to and extracted in.
    pub root_dir: PathBuf,
    pub manifest_url: String,
    pub method: InstallMethod,
    /// Platform matched against the manifest's `platform` field.
    pub platform: Platform,
}

impl Default for InstallOptions {
    fn default() -> Self {
        let platform = Platform::current();
        Self {
            root_dir: crate::paths::default_root_dir(&platform),
            manifest_url: crate::MANIFEST_URL.to_string(),
            method: InstallMethod::default(),
            platform,
        }
    }
}

impl InstallOptions {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_manifest_url(mut self, url: impl Into<String>) -> Self {
        self.manifest_url = url.into();
        self
    }

    pub fn with_method(mut self, method: InstallMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }
}

/// Result of a successful install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    /// `<root>/<boost_ver>`
    pub boost_root: PathBuf,
    /// Output directory label derived from the archive filename.
    pub boost_ver: String,
}

/// Drives one install from manifest lookup to extracted tree.
#[derive(Clone)]
pub struct Installer {
    client: Client,
    reporter: Arc<dyn Reporter>,
    extractor: Extractor,
    options: InstallOptions,
}

impl std::fmt::Debug for Installer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Installer")
            .field("extractor", &self.extractor)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Installer {
    pub fn new(client: Client, reporter: Arc<dyn Reporter>, options: InstallOptions) -> Self {
        Self {
            client,
            reporter,
            extractor: Extractor::new(),
            options,
        }
    }

    pub fn with_extractor(mut self, extractor: Extractor) -> Self {
        self.extractor = extractor;
        self
    }

    /// Runs the whole flow. The first failing step ends the run.
    pub async fn install(&self, criteria: &SelectionCriteria) -> Result<InstallOutcome, InstallError> {
        match self.run(criteria).await {
            Ok(outcome) => {
                self.enter(InstallState::Done);
                Ok(outcome)
            }
            Err(err) => {
                tracing::error!(kind = ?err.kind(), "install failed: {err}");
                self.enter(InstallState::Failed);
                Err(err)
            }
        }
    }

    fn enter(&self, state: InstallState) {
        tracing::debug!(%state, "install state");
        self.reporter.transition(state);
    }

    async fn run(&self, criteria: &SelectionCriteria) -> Result<InstallOutcome, InstallError> {
        let reporter = self.reporter.as_ref();
        let layout = self.options.method.layout();

        self.enter(InstallState::Start);
        criteria.validate()?;

        if self.options.method == InstallMethod::Legacy {
            reporter.info("Using legacy install method");
        }

        reporter.info("Downloading versions-manifest.json...");
        let manifest = fetch_manifest(&self.client, &self.options.manifest_url, reporter).await?;
        self.enter(InstallState::ManifestFetched);

        reporter.info("Parsing versions-manifest.json...");
        let package = resolve_for(&manifest, criteria, &self.options.platform)?;
        tracing::info!(url = %package.url, filename = %package.filename, "resolved package");
        let boost_ver = layout.naming.derive(&package.filename).to_string();
        if boost_ver.is_empty() {
            return Err(InstallError::InvalidFilename(package.filename));
        }
        self.enter(InstallState::PackageResolved);

        // Later steps read BOOST_ROOT from their own working directory.
        let root = std::path::absolute(&self.options.root_dir).map_err(|source| DirectoryError {
            path: self.options.root_dir.clone(),
            source,
        })?;
        let root = root.as_path();

        reporter.section(&format!("Create {}", root.display()));
        match fs::ensure_directory(root)? {
            DirectoryStatus::Created => {
                reporter.info(&format!("{} did not exist, created it", root.display()));
            }
            DirectoryStatus::AlreadyExists => {
                reporter.info(&format!("{} already exists, doing nothing", root.display()));
            }
        }
        reporter.end_section();
        self.enter(InstallState::DirectoryReady);

        reporter.section("Download Boost");
        let archive = root.join(&package.filename);
        let bytes = DownloadRequest::new(&self.client, &package.url, &archive, reporter)
            .execute()
            .await?;
        reporter.info(&format!("Downloaded {bytes} bytes to {}", archive.display()));
        reporter.end_section();
        self.enter(InstallState::Downloaded);

        let boost_root = root.join(&boost_ver);
        reporter.debug(&format!("Boost base directory: {boost_ver}"));

        reporter.section(&format!("Extract {}", package.filename));
        self.extractor
            .extract(Path::new(&package.filename), root)
            .await?;
        reporter.info("Tar exited with code 0");
        reporter.end_section();
        self.enter(InstallState::Extracted);

        if layout.cleanup {
            reporter.section("Clean up");
            fs::remove_archive(&archive)?;
            reporter.info(&format!("Removed {}", archive.display()));
            reporter.end_section();
            self.enter(InstallState::CleanedUp);
        }

        reporter.section("Set output variables");
        reporter.info(&format!("Setting BOOST_ROOT to '{}'", boost_root.display()));
        reporter.info(&format!("Setting BOOST_VER to '{boost_ver}'"));
        reporter.end_section();

        Ok(InstallOutcome {
            boost_root,
            boost_ver,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::reporter::testing::RecordingReporter;
    use mockito::{Matcher, Server};
    use tempfile::TempDir;

    #[test]
    fn test_dir_naming_rules() {
        let current = DirNaming::FirstDotSegment;
        let legacy = DirNaming::StripTwoExtensions;

        assert_eq!(current.derive("boost_1_82_0.tar.gz"), "boost_1_82_0");
        assert_eq!(legacy.derive("boost_1_82_0.tar.gz"), "boost_1_82_0");

        assert_eq!(legacy.derive("boost.tgz"), "boost");
        assert_eq!(legacy.derive("boost"), "boost");
        assert_eq!(current.derive("boost"), "boost");

        assert_eq!(current.derive(".tar.gz"), "");
        assert_eq!(legacy.derive(".tar.gz"), "");
    }

    #[test]
    fn test_dir_naming_rules_diverge_on_dotted_names() {
        // The two methods must keep producing different labels here.
        let filename = "my.pkg.tar.gz";
        assert_eq!(InstallMethod::Current.layout().naming.derive(filename), "my");
        assert_eq!(InstallMethod::Legacy.layout().naming.derive(filename), "my.pkg");

        let filename = "boost-1.82.0-linux-22.04-gcc-x64.tar.gz";
        assert_eq!(DirNaming::FirstDotSegment.derive(filename), "boost-1");
        assert_eq!(
            DirNaming::StripTwoExtensions.derive(filename),
            "boost-1.82.0-linux-22.04-gcc-x64"
        );
    }

    #[test]
    fn test_method_layouts() {
        assert!(!InstallMethod::Current.layout().cleanup);
        assert!(InstallMethod::Legacy.layout().cleanup);
    }

    #[test]
    fn test_method_from_str() {
        assert_eq!("".parse::<InstallMethod>(), Ok(InstallMethod::Current));
        assert_eq!("current".parse::<InstallMethod>(), Ok(InstallMethod::Current));
        assert_eq!("Legacy".parse::<InstallMethod>(), Ok(InstallMethod::Legacy));
        assert_eq!("v1".parse::<InstallMethod>(), Ok(InstallMethod::Legacy));
        assert!("v2".parse::<InstallMethod>().is_err());
    }

    /// Builds `<top>/include/boost/version.hpp` as a gzipped tarball.
    fn boost_archive(top: &str) -> Vec<u8> {
        let encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        let mut builder = tar::Builder::new(encoder);
        let data = b"#define BOOST_LIB_VERSION \"1_82\"\n";
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(
                &mut header,
                format!("{top}/include/boost/version.hpp"),
                &data[..],
            )
            .unwrap();
        builder.into_inner().unwrap().finish().unwrap()
    }

    fn manifest_json(base_url: &str, filename: &str) -> String {
        format!(
            r#"[{{"version":"1.82.0","files":[{{"platform":"linux","download_url":"{base_url}/{filename}","filename":"{filename}"}}]}}]"#
        )
    }

    struct Fixture {
        server: mockito::ServerGuard,
        tmp: TempDir,
        reporter: Arc<RecordingReporter>,
    }

    impl Fixture {
        async fn new() -> Self {
            Self {
                server: Server::new_async().await,
                tmp: TempDir::new().unwrap(),
                reporter: Arc::new(RecordingReporter::default()),
            }
        }

        fn root(&self) -> PathBuf {
            self.tmp.path().join("boost")
        }

        fn installer(&self, method: InstallMethod) -> Installer {
            let options = InstallOptions::new(self.root())
                .with_manifest_url(format!("{}/versions-manifest.json", self.server.url()))
                .with_method(method)
                .with_platform(Platform::Linux);
            Installer::new(Client::new(), self.reporter.clone(), options)
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_end_to_end_current_method() {
        let mut fx = Fixture::new().await;
        let filename = "boost_1_82_0.tar.gz";

        let manifest = fx
            .server
            .mock("GET", "/versions-manifest.json")
            .with_status(200)
            .with_body(manifest_json(&fx.server.url(), filename))
            .create_async()
            .await;
        let archive = fx
            .server
            .mock("GET", "/boost_1_82_0.tar.gz")
            .with_status(200)
            .with_body(boost_archive("boost_1_82_0"))
            .create_async()
            .await;

        let outcome = fx
            .installer(InstallMethod::Current)
            .install(&SelectionCriteria::new("1.82.0", "", ""))
            .await
            .unwrap();

        manifest.assert_async().await;
        archive.assert_async().await;

        assert_eq!(outcome.boost_ver, "boost_1_82_0");
        assert_eq!(outcome.boost_root, fx.root().join("boost_1_82_0"));
        assert!(outcome.boost_root.join("include/boost/version.hpp").is_file());
        // The current method keeps the archive around.
        assert!(fx.root().join(filename).is_file());

        assert_eq!(
            fx.reporter.states(),
            vec![
                InstallState::Start,
                InstallState::ManifestFetched,
                InstallState::PackageResolved,
                InstallState::DirectoryReady,
                InstallState::Downloaded,
                InstallState::Extracted,
                InstallState::Done,
            ]
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_end_to_end_legacy_method_cleans_up() {
        let mut fx = Fixture::new().await;
        let filename = "boost_1_82_0.tar.gz";

        let _manifest = fx
            .server
            .mock("GET", "/versions-manifest.json")
            .with_status(200)
            .with_body(manifest_json(&fx.server.url(), filename))
            .create_async()
            .await;
        let _archive = fx
            .server
            .mock("GET", "/boost_1_82_0.tar.gz")
            .with_status(200)
            .with_body(boost_archive("boost_1_82_0"))
            .create_async()
            .await;

        // An existing root is fine.
        std::fs::create_dir(fx.root()).unwrap();

        let outcome = fx
            .installer(InstallMethod::Legacy)
            .install(&SelectionCriteria::new("1.82.0", "", ""))
            .await
            .unwrap();

        assert_eq!(outcome.boost_ver, "boost_1_82_0");
        assert!(outcome.boost_root.join("include/boost/version.hpp").is_file());
        assert!(!fx.root().join(filename).exists());

        let states = fx.reporter.states();
        assert_eq!(
            &states[states.len() - 3..],
            &[
                InstallState::Extracted,
                InstallState::CleanedUp,
                InstallState::Done
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_version_never_downloads_archive() {
        let mut fx = Fixture::new().await;
        let filename = "boost_1_82_0.tar.gz";

        let _manifest = fx
            .server
            .mock("GET", "/versions-manifest.json")
            .with_status(200)
            .with_body(manifest_json(&fx.server.url(), filename))
            .create_async()
            .await;
        let archive = fx
            .server
            .mock("GET", "/boost_1_82_0.tar.gz")
            .expect(0)
            .create_async()
            .await;

        let err = fx
            .installer(InstallMethod::Current)
            .install(&SelectionCriteria::new("9.9.9", "", ""))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::VersionNotFound);
        assert_eq!(err.to_string(), "Could not find boost version: 9.9.9");
        archive.assert_async().await;
        assert!(!fx.root().exists());
        assert_eq!(
            fx.reporter.states(),
            vec![
                InstallState::Start,
                InstallState::ManifestFetched,
                InstallState::Failed
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_version_fails_before_any_request() {
        let mut fx = Fixture::new().await;
        let any = fx
            .server
            .mock("GET", Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let err = fx
            .installer(InstallMethod::Current)
            .install(&SelectionCriteria::new("", "gcc", ""))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        any.assert_async().await;
        assert_eq!(
            fx.reporter.states(),
            vec![InstallState::Start, InstallState::Failed]
        );
    }

    #[tokio::test]
    async fn test_malformed_manifest() {
        let mut fx = Fixture::new().await;
        let _manifest = fx
            .server
            .mock("GET", "/versions-manifest.json")
            .with_status(200)
            .with_body(r#"[{"version":"1.82.0","files":[{"platform":"linux"}]}]"#)
            .create_async()
            .await;

        let err = fx
            .installer(InstallMethod::Current)
            .install(&SelectionCriteria::new("1.82.0", "", ""))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Parse);
    }

    #[tokio::test]
    async fn test_missing_parent_is_directory_error() {
        let mut fx = Fixture::new().await;
        let _manifest = fx
            .server
            .mock("GET", "/versions-manifest.json")
            .with_status(200)
            .with_body(manifest_json(&fx.server.url(), "boost_1_82_0.tar.gz"))
            .create_async()
            .await;

        let options = InstallOptions::new(fx.tmp.path().join("no").join("such").join("root"))
            .with_manifest_url(format!("{}/versions-manifest.json", fx.server.url()))
            .with_platform(Platform::Linux);
        let err = Installer::new(Client::new(), fx.reporter.clone(), options)
            .install(&SelectionCriteria::new("1.82.0", "", ""))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Directory);
    }

    #[tokio::test]
    async fn test_download_failure_keeps_directory() {
        let mut fx = Fixture::new().await;
        let _manifest = fx
            .server
            .mock("GET", "/versions-manifest.json")
            .with_status(200)
            .with_body(manifest_json(&fx.server.url(), "boost_1_82_0.tar.gz"))
            .create_async()
            .await;
        let _archive = fx
            .server
            .mock("GET", "/boost_1_82_0.tar.gz")
            .with_status(503)
            .create_async()
            .await;

        let err = fx
            .installer(InstallMethod::Current)
            .install(&SelectionCriteria::new("1.82.0", "", ""))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Download);
        assert!(fx.root().is_dir());
        assert_eq!(fx.reporter.states().last(), Some(&InstallState::Failed));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_extraction_failure_keeps_archive() {
        let mut fx = Fixture::new().await;
        let _manifest = fx
            .server
            .mock("GET", "/versions-manifest.json")
            .with_status(200)
            .with_body(manifest_json(&fx.server.url(), "boost_1_82_0.tar.gz"))
            .create_async()
            .await;
        let _archive = fx
            .server
            .mock("GET", "/boost_1_82_0.tar.gz")
            .with_status(200)
            .with_body("payload")
            .create_async()
            .await;

        let err = fx
            .installer(InstallMethod::Legacy)
            .with_extractor(Extractor::with_program("false"))
            .install(&SelectionCriteria::new("1.82.0", "", ""))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Extraction);
        assert_eq!(err.to_string(), "Tar exited with code 1");
        // Cleanup only runs on the success path.
        assert!(fx.root().join("boost_1_82_0.tar.gz").is_file());
        assert!(!fx.reporter.states().contains(&InstallState::CleanedUp));
    }

    #[tokio::test]
    async fn test_dot_prefixed_filename_is_rejected() {
        let mut fx = Fixture::new().await;
        let _manifest = fx
            .server
            .mock("GET", "/versions-manifest.json")
            .with_status(200)
            .with_body(manifest_json(&fx.server.url(), ".tar.gz"))
            .create_async()
            .await;
        let archive = fx
            .server
            .mock("GET", "/.tar.gz")
            .expect(0)
            .create_async()
            .await;

        let err = fx
            .installer(InstallMethod::Current)
            .install(&SelectionCriteria::new("1.82.0", "", ""))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::InvalidFilename);
        archive.assert_async().await;
        assert!(!fx.root().exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_legacy_cleanup_failure_fails_the_run() {
        use std::os::unix::fs::PermissionsExt;

        let mut fx = Fixture::new().await;
        let filename = "boost_1_82_0.tar.gz";
        let _manifest = fx
            .server
            .mock("GET", "/versions-manifest.json")
            .with_status(200)
            .with_body(manifest_json(&fx.server.url(), filename))
            .create_async()
            .await;
        let _archive = fx
            .server
            .mock("GET", "/boost_1_82_0.tar.gz")
            .with_status(200)
            .with_body("payload")
            .create_async()
            .await;

        // Exits 0 but takes the archive with it, so the removal step finds nothing.
        let script = fx.tmp.path().join("fake-tar");
        std::fs::write(&script, "#!/bin/sh\nrm -f \"$2\"\n").unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let err = fx
            .installer(InstallMethod::Legacy)
            .with_extractor(Extractor::with_program(&script))
            .install(&SelectionCriteria::new("1.82.0", "", ""))
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Cleanup);
        assert!(err.to_string().starts_with("Failed to remove"));

        let states = fx.reporter.states();
        assert_eq!(
            &states[states.len() - 2..],
            &[InstallState::Extracted, InstallState::Failed]
        );
        assert!(!states.contains(&InstallState::CleanedUp));
        assert!(!states.contains(&InstallState::Done));
    }
}
