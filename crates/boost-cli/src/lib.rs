//! install-boost - prebuilt Boost for CI runners
#![allow(missing_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]
//!
//! Reads the step inputs, installs the matching Boost archive under the root
//! directory and publishes `BOOST_ROOT` / `BOOST_VER` for later steps.
//!
//! # Directory Layout
//!
//! ```text
//! /usr/boost/                 # D:\boost on Windows
//! ├── boost_1_82_0.tar.gz     # downloaded archive (removed by the legacy method)
//! └── boost_1_82_0/           # BOOST_ROOT
//! ```

pub mod actions;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, anyhow};
use boost_core::{InstallMethod, InstallOptions, InstallOutcome, Installer, Reporter};
use boost_schema::{Platform, SelectionCriteria};
use clap::Parser;

pub use actions::{ActionsReporter, Outputs};

#[derive(Debug, Parser)]
#[command(name = "install-boost")]
#[command(author, version, about = "Install a prebuilt Boost release on a CI runner")]
pub struct Cli {
    /// Boost release to install (e.g. 1.82.0)
    #[arg(long, env = "INPUT_BOOST_VERSION", default_value = "")]
    pub boost_version: String,

    /// Only accept archives built with this toolset (e.g. gcc, msvc)
    #[arg(long, env = "INPUT_TOOLSET", default_value = "")]
    pub toolset: String,

    /// Only accept archives built for this OS version (e.g. 22.04, 2022)
    #[arg(long, env = "INPUT_PLATFORM_VERSION", default_value = "")]
    pub platform_version: String,

    /// Install method: `current` (default) or `legacy`
    #[arg(long, env = "INPUT_METHOD", default_value = "")]
    pub method: String,

    /// Directory Boost is downloaded to and extracted in
    #[arg(long, env = "INPUT_BOOST_ROOT_DIR")]
    pub root_dir: Option<String>,

    /// Location of versions-manifest.json
    #[arg(long, env = "INPUT_MANIFEST_URL", default_value = boost_core::MANIFEST_URL)]
    pub manifest_url: String,
}

impl Cli {
    pub fn criteria(&self) -> SelectionCriteria {
        SelectionCriteria::new(
            self.boost_version.trim(),
            self.toolset.trim(),
            self.platform_version.trim(),
        )
    }

    /// Builds the installer configuration, filling in platform defaults.
    ///
    /// Runners export unset inputs as empty strings, so empty values fall
    /// back to the defaults.
    pub fn install_options(&self) -> Result<InstallOptions> {
        let method: InstallMethod = self.method.parse().map_err(|e: String| anyhow!(e))?;
        let platform = Platform::current();

        let root_dir = self
            .root_dir
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map_or_else(|| boost_core::default_root_dir(&platform), PathBuf::from);

        let manifest_url = match self.manifest_url.trim() {
            "" => boost_core::MANIFEST_URL,
            url => url,
        };

        Ok(InstallOptions::new(root_dir)
            .with_manifest_url(manifest_url)
            .with_method(method)
            .with_platform(platform))
    }
}

/// Runs one install and publishes its outputs.
pub async fn run(cli: &Cli, reporter: Arc<dyn Reporter>, outputs: &Outputs) -> Result<InstallOutcome> {
    let options = cli.install_options()?;
    let criteria = cli.criteria();

    tracing::info!(
        version = %criteria.boost_version,
        toolset = %criteria.toolset,
        platform_version = %criteria.platform_version,
        method = %options.method,
        root = %options.root_dir.display(),
        "installing boost"
    );

    let client = reqwest::Client::new();
    let outcome = Installer::new(client, reporter, options)
        .install(&criteria)
        .await?;

    outputs.set("BOOST_ROOT", &outcome.boost_root.display().to_string())?;
    outputs.set("BOOST_VER", &outcome.boost_ver)?;

    Ok(outcome)
}
