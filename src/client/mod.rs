//! HTTP client for the trading server's dashboard endpoints
//!
//! Two resources, both read-only from our side:
//! - `GET /market/{epic}.json` — one market's current snapshot
//! - `GET /get-trades` — the trade panel as a pre-rendered fragment

use std::time::Duration;

use reqwest::Client;
use tracing::debug;
use url::Url;

pub mod types;

pub use types::{DashError, MarketSnapshot, OpenTrade, Prediction, TrendSet};

/// Per-request timeout. A dead server must not wedge a refresh task past the
/// next few ticks.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for the dashboard endpoints of a single trading server.
#[derive(Debug, Clone)]
pub struct DashClient {
    client: Client,
    base_url: Url,
}

impl DashClient {
    pub fn new(base_url: Url) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, base_url }
    }

    /// Construct against an arbitrary base URL (used by tests to point at a
    /// mock server).
    pub fn with_base_url(base_url: Url) -> Self {
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch the current snapshot for one market.
    pub async fn fetch_market(&self, epic: &str) -> Result<MarketSnapshot, DashError> {
        let url = self.endpoint(&format!("market/{epic}.json"));
        debug!(%epic, %url, "fetching market snapshot");

        let body = self.get_text(url).await?;
        let snapshot: MarketSnapshot = serde_json::from_str(&body)?;
        Ok(snapshot)
    }

    /// Fetch the trade panel fragment, returned wholesale.
    pub async fn fetch_trades(&self) -> Result<String, DashError> {
        let url = self.endpoint("get-trades");
        debug!(%url, "fetching trade panel");

        self.get_text(url).await
    }

    async fn get_text(&self, url: Url) -> Result<String, DashError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DashError::Status { status, body });
        }

        Ok(response.text().await?)
    }

    fn endpoint(&self, path: &str) -> Url {
        // Url::join would drop any path the base carries without a trailing
        // slash, so splice the path segments directly.
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .expect("base url is always hierarchical");
            segments.pop_if_empty();
            for segment in path.split('/') {
                segments.push(segment);
            }
        }
        url
    }
}
