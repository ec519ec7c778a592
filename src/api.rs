use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::types::{Trade, Trader};

/// Failure of a single API request. Every variant is terminal for the
/// render attempt that issued it.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("request failed: {status} ({url})")]
    Status { status: u16, url: String },
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("invalid JSON from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl RequestError {
    /// HTTP status code, for failures that got as far as a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            RequestError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// GET `url` and parse the body as JSON. Non-2xx responses fail with
/// [`RequestError::Status`].
pub async fn fetch_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: Url,
) -> Result<T, RequestError> {
    let url_str = url.to_string();
    let resp = client
        .get(url)
        .send()
        .await
        .map_err(RequestError::Transport)?;

    let status = resp.status();
    if !status.is_success() {
        return Err(RequestError::Status {
            status: status.as_u16(),
            url: url_str,
        });
    }

    resp.json::<T>().await.map_err(|source| RequestError::Decode {
        url: url_str,
        source,
    })
}

/// Read access to the backend. The browser only ever talks to this seam.
///
/// Futures are not required to be `Send`; the browser is driven from one task.
#[allow(async_fn_in_trait)]
pub trait TraderApi {
    /// `GET /api/traders`
    async fn traders(&self) -> Result<Vec<Trader>, RequestError>;

    /// `GET /api/traders/{address}/trades`
    async fn trades(&self, address: &str) -> Result<Vec<Trade>, RequestError>;
}

/// [`TraderApi`] over HTTP with a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTraderApi {
    client: reqwest::Client,
    base: Url,
}

impl HttpTraderApi {
    /// Client with its own reqwest client using the given per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RequestError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(RequestError::Transport)?;
        Self::with_client(base_url, client)
    }

    /// Client over a preconfigured reqwest client. `base_url` must be an
    /// absolute URL that can carry a path.
    pub fn with_client(base_url: &str, client: reqwest::Client) -> Result<Self, RequestError> {
        let base = Url::parse(base_url)
            .map_err(|e| RequestError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(RequestError::InvalidUrl(base_url.to_string()));
        }
        Ok(Self { client, base })
    }

    /// `{base}/api/traders`
    pub fn traders_url(&self) -> Url {
        self.endpoint(&["api", "traders"])
    }

    /// `{base}/api/traders/{address}/trades`; the address is encoded as a
    /// single path segment.
    pub fn trades_url(&self, address: &str) -> Url {
        self.endpoint(&["api", "traders", address, "trades"])
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // cannot_be_a_base was rejected in with_client()
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

impl TraderApi for HttpTraderApi {
    async fn traders(&self) -> Result<Vec<Trader>, RequestError> {
        let traders: Vec<Trader> = fetch_json(&self.client, self.traders_url()).await?;
        debug!("Fetched {} traders", traders.len());
        Ok(traders)
    }

    async fn trades(&self, address: &str) -> Result<Vec<Trade>, RequestError> {
        let trades: Vec<Trade> = fetch_json(&self.client, self.trades_url(address)).await?;
        debug!("Fetched {} trades for {address}", trades.len());
        Ok(trades)
    }
}
