use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};

use crate::error::UpstreamError;

const REQUEST_TIMEOUT_SECS: u64 = 10;

pub fn build_client() -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .context("failed to build http client")
}

/// Send a prepared GET and return the response body, mapping non-2xx
/// statuses and transport failures onto [`UpstreamError`].
pub async fn get_text(req: RequestBuilder) -> Result<String, UpstreamError> {
    let resp = req.send().await?;
    let status = resp.status();
    let body = resp.text().await?;
    if !status.is_success() {
        return Err(UpstreamError::Status { status, body });
    }
    Ok(body)
}
