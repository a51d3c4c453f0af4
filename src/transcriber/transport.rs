//! Builds the HTTP transport the client talks through.
//!
//! Everything that is configuration lives here: the authorization header,
//! default headers, and timeouts. [`TranscriberClient`](super::TranscriberClient)
//! only ever receives the finished `reqwest::Client`.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};

use super::error::{Error, ErrorKind};
use crate::config::ApiConfig;

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Creates a `reqwest::Client` carrying the Beey key and the configured timeout.
///
/// # Errors
/// - If no API key is configured
/// - If the key contains characters that are not valid in an HTTP header
/// - If the TLS backend cannot be initialized
pub fn build_http_client(config: &ApiConfig) -> Result<reqwest::Client, Error> {
    const OPERATION: &str = "build_http_client";

    let api_key = config
        .api_key
        .as_deref()
        .filter(|key| !key.trim().is_empty())
        .ok_or_else(|| Error::new(OPERATION, ErrorKind::Config("no API key configured".into())))?;

    let mut auth = HeaderValue::from_str(api_key.trim()).map_err(|e| {
        Error::new(
            OPERATION,
            ErrorKind::Config(format!("API key is not a valid header value: {e}")),
        )
    })?;
    auth.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, auth);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

    tracing::debug!(
        "Building Beey transport: base={} timeout={}s",
        config.base_uri,
        config.timeout_secs
    );

    timed_builder(config)
        .default_headers(headers)
        .build()
        .map_err(|e| Error::new(OPERATION, e))
}

/// Creates the client used to fetch relayed media from third-party hosts.
///
/// Same timeouts as the Beey transport, but no `authorization` header.
pub fn build_download_client(config: &ApiConfig) -> Result<reqwest::Client, Error> {
    timed_builder(config)
        .build()
        .map_err(|e| Error::new("build_download_client", e))
}

fn timed_builder(config: &ApiConfig) -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
}
