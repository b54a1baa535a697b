//! Streaming archive download with progress reporting.
//!
//! Bytes are written to disk as they arrive; completion is only signalled
//! once the transport has ended and the file has been flushed.

use std::path::Path;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use reqwest::Client;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::Reporter;

#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Request for a download operation
pub struct DownloadRequest<'a, R: Reporter + ?Sized> {
    pub client: &'a Client,
    pub url: &'a str,
    pub dest: &'a Path,
    pub reporter: &'a R,
}

impl<'a, R: Reporter + ?Sized> DownloadRequest<'a, R> {
    pub fn new(client: &'a Client, url: &'a str, dest: &'a Path, reporter: &'a R) -> Self {
        Self {
            client,
            url,
            dest,
            reporter,
        }
    }

    /// Execute the download, returning the number of bytes written.
    ///
    /// A partially written file is removed if the transfer fails.
    pub async fn execute(self) -> Result<u64, DownloadError> {
        let response = self
            .client
            .get(self.url)
            .header(reqwest::header::USER_AGENT, crate::USER_AGENT)
            .send()
            .await?
            .error_for_status()?;

        let total_size = response.content_length();
        tracing::debug!(url = self.url, ?total_size, "starting download");

        let result = write_stream(
            response.bytes_stream(),
            self.dest,
            total_size,
            self.reporter,
        )
        .await;

        if result.is_err() {
            tokio::fs::remove_file(self.dest).await.ok();
        }
        result
    }
}

impl<R: Reporter + ?Sized> std::fmt::Debug for DownloadRequest<'_, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DownloadRequest")
            .field("url", &self.url)
            .field("dest", &self.dest)
            .finish_non_exhaustive()
    }
}

/// Writes every chunk of `stream` to `dest` (created or truncated) in order.
///
/// Progress is reported after each chunk and never after this returns.
pub async fn write_stream<S, E, R>(
    stream: S,
    dest: &Path,
    total_size: Option<u64>,
    reporter: &R,
) -> Result<u64, DownloadError>
where
    S: Stream<Item = Result<Bytes, E>>,
    DownloadError: From<E>,
    R: Reporter + ?Sized,
{
    let mut stream = std::pin::pin!(stream);
    let mut file = File::create(dest).await?;
    let mut downloaded: u64 = 0;

    reporter.downloading(0, total_size);

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        downloaded += chunk.len() as u64;
        reporter.downloading(downloaded, total_size);
    }

    file.flush().await?;
    Ok(downloaded)
}
