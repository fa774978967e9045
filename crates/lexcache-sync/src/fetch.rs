//! Raw page retrieval through a public content proxy.

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("invalid proxy URL: {0}")]
    ProxyUrl(#[from] url::ParseError),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("proxy returned {status} for {url}")]
    Status { status: u16, url: String },
}

/// Source of raw page bytes.
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Retrieve the body at `url` without any text decoding.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Fetches pages via `<proxy_base>?url=<target>`.
///
/// The proxy is an untrusted third party. No timeout is set on the client
/// and nothing is retried.
pub struct ProxyFetcher {
    client: reqwest::Client,
    proxy_base: String,
}

impl ProxyFetcher {
    /// `proxy_base` is the proxy endpoint, e.g. `https://api.allorigins.win/raw`.
    pub fn new(proxy_base: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            proxy_base: proxy_base.into(),
        }
    }

    /// Proxy request URL for `target`, with the target form-encoded into `url`.
    pub fn proxy_url(&self, target: &str) -> Result<Url, FetchError> {
        Ok(Url::parse_with_params(&self.proxy_base, &[("url", target)])?)
    }
}

#[async_trait]
impl Fetch for ProxyFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let request_url = self.proxy_url(url)?;
        debug!(target_url = %url, proxy = %request_url, "fetching through proxy");

        let resp = self.client.get(request_url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = resp.bytes().await?;
        debug!(target_url = %url, bytes = body.len(), "fetched page");
        Ok(body.to_vec())
    }
}
