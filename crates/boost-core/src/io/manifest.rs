//! Version manifest retrieval.

use boost_schema::Manifest;
use reqwest::Client;
use thiserror::Error;

use crate::Reporter;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to fetch version manifest: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Failed to parse version manifest: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Downloads the whole manifest body and decodes it.
///
/// Single attempt; any transport failure or non-success status is a
/// [`ManifestError::Fetch`], malformed JSON a [`ManifestError::Parse`].
/// The raw body goes to the reporter's debug channel before decoding.
pub async fn fetch_manifest<R: Reporter + ?Sized>(
    client: &Client,
    url: &str,
    reporter: &R,
) -> Result<Manifest, ManifestError> {
    let body = client
        .get(url)
        .header(reqwest::header::USER_AGENT, crate::USER_AGENT)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    tracing::debug!(url, bytes = body.len(), "fetched manifest");
    reporter.debug(&format!("Downloaded data: {body}"));

    Ok(Manifest::from_json(&body)?)
}
