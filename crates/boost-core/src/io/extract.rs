//! Archive extraction by delegating to an external `tar` process.

use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;

use thiserror::Error;
use tokio::process::Command;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Tar exited with code {0}")]
    Exit(i32),

    #[error("Tar was terminated before exiting")]
    Terminated,

    #[error("Tar failed")]
    Spawn(#[source] std::io::Error),
}

/// Runs `<program> xzvf <archive>` inside a working directory.
///
/// Success is decided by the exit status alone.
#[derive(Debug, Clone)]
pub struct Extractor {
    program: OsString,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    pub fn new() -> Self {
        Self::with_program("tar")
    }

    /// Use a different executable in place of `tar`.
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Unpacks `archive` (resolved relative to `working_dir`) into `working_dir`.
    ///
    /// The child's stdin is closed; stdout and stderr go straight to the
    /// runner log.
    pub async fn extract(&self, archive: &Path, working_dir: &Path) -> Result<(), ExtractError> {
        tracing::debug!(
            program = ?self.program,
            archive = %archive.display(),
            cwd = %working_dir.display(),
            "spawning extractor"
        );

        let status = Command::new(&self.program)
            .arg("xzvf")
            .arg(archive)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(ExtractError::Spawn)?;

        if status.success() {
            return Ok(());
        }

        match status.code() {
            Some(code) => Err(ExtractError::Exit(code)),
            None => Err(ExtractError::Terminated),
        }
    }
}
