use crate::error::IngestionError;
use crate::security::url_validation::validate_remote_url;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::header::LOCATION;
use reqwest::{Client, Response};
use std::time::Duration;
use url::Url;

/// Where an upload's bytes come from. Exactly one source per upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSource {
    Base64(String),
    Url(String),
}

impl MediaSource {
    /// Empty strings count as absent.
    pub fn from_parts(base64: Option<&str>, url: Option<&str>) -> Result<Self, IngestionError> {
        let base64 = base64.filter(|s| !s.trim().is_empty());
        let url = url.filter(|s| !s.trim().is_empty());
        match (base64, url) {
            (Some(_), Some(_)) => Err(IngestionError::AmbiguousSource),
            (Some(data), None) => Ok(Self::Base64(data.to_string())),
            (None, Some(url)) => Ok(Self::Url(url.trim().to_string())),
            (None, None) => Err(IngestionError::MissingSource),
        }
    }
}

/// Decode standard base64, tolerating whitespace and a `data:...;base64,` prefix.
pub fn decode_base64(raw: &str) -> Result<Vec<u8>, IngestionError> {
    let payload = match raw.split_once("base64,") {
        Some((prefix, rest)) if prefix.trim_start().starts_with("data:") => rest,
        _ => raw,
    };
    let compact: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
    STANDARD
        .decode(compact)
        .map_err(|e| IngestionError::InvalidEncoding(e.to_string()))
}

/// Redirect hops followed before a fetch gives up.
const MAX_REDIRECTS: usize = 5;

/// HTTP client for URL-sourced uploads.
///
/// Redirects are followed by hand so every hop passes the same URL checks as
/// the first request.
pub struct RemoteFetcher {
    client: Client,
    block_private_hosts: bool,
    max_bytes: u64,
}

impl RemoteFetcher {
    pub fn new(timeout: Duration, block_private_hosts: bool, max_bytes: u64) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            block_private_hosts,
            max_bytes,
        }
    }

    pub async fn fetch(&self, raw_url: &str) -> Result<Vec<u8>, IngestionError> {
        let url = validate_remote_url(raw_url, self.block_private_hosts).await?;
        self.fetch_validated(url).await
    }

    /// Fetch an already-checked URL, re-checking each redirect target.
    async fn fetch_validated(&self, mut url: Url) -> Result<Vec<u8>, IngestionError> {
        let mut hops = 0;
        let mut response = self.send(url.clone()).await?;
        while response.status().is_redirection() {
            if hops == MAX_REDIRECTS {
                return Err(IngestionError::Download(format!(
                    "more than {MAX_REDIRECTS} redirects"
                )));
            }
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok())
                .ok_or_else(|| {
                    IngestionError::Download(format!(
                        "HTTP {} without a Location header",
                        response.status()
                    ))
                })?;
            let next = url
                .join(location)
                .map_err(|e| IngestionError::Download(format!("invalid redirect: {e}")))?;
            url = validate_remote_url(next.as_str(), self.block_private_hosts).await?;
            tracing::debug!(target = %url, hop = hops + 1, "following media redirect");
            hops += 1;
            response = self.send(url.clone()).await?;
        }

        let status = response.status();
        if !status.is_success() {
            return Err(IngestionError::Download(format!("HTTP {status}")));
        }
        if let Some(length) = response.content_length()
            && length > self.max_bytes
        {
            return Err(IngestionError::TooLarge {
                size: length,
                limit: self.max_bytes,
            });
        }

        // Content-Length is optional; the cap holds for chunked bodies too.
        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| IngestionError::Download(e.to_string()))?
        {
            let size = (body.len() + chunk.len()) as u64;
            if size > self.max_bytes {
                return Err(IngestionError::TooLarge {
                    size,
                    limit: self.max_bytes,
                });
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }

    async fn send(&self, url: Url) -> Result<Response, IngestionError> {
        self.client
            .get(url)
            .send()
            .await
            .map_err(|e| IngestionError::Download(e.to_string()))
    }
}
