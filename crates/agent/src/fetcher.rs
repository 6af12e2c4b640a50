//! HTTP fetch of the raw `_stats` body.
//!
//! [`StatsSource`] is the seam the poller pulls bodies through;
//! [`HttpStatsSource`] is the production implementation. One GET per
//! call, no retry, and no timeout beyond the client defaults.

use async_trait::async_trait;
use reqwest::StatusCode;

/// Errors from fetching a stats body.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request itself failed (DNS, connect, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with anything other than `200 OK`.
    #[error("Unexpected HTTP status {status}")]
    Status { status: u16 },

    /// The status was fine but the body could not be read to the end.
    #[error("Failed to read response body: {0}")]
    Body(#[source] reqwest::Error),
}

/// Something that can produce one stats body per call.
#[async_trait]
pub trait StatsSource: Send + Sync {
    async fn fetch(&self) -> Result<String, FetchError>;
}

/// Fetches the stats body from a fixed URL over HTTP.
pub struct HttpStatsSource {
    client: reqwest::Client,
    url: String,
}

impl HttpStatsSource {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl StatsSource for HttpStatsSource {
    /// GET the configured URL and return the body as text.
    ///
    /// Invalid UTF-8 is replaced rather than rejected; the parser will
    /// then fail on the affected field. The response is consumed (and its
    /// connection released) on every path.
    async fn fetch(&self) -> Result<String, FetchError> {
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(FetchError::Body)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}
