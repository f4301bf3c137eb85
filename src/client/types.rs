//! Type definitions for the trading server's dashboard endpoints

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Key under which a trend set carries its scaling reference
pub const TREND_SCALE_KEY: &str = "MAX";

/// Errors from the dashboard client
#[derive(Debug, thiserror::Error)]
pub enum DashError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to decode market snapshot: {0}")]
    Decode(#[from] serde_json::Error),
}

/// One market's current state as served by `/market/{epic}.json`
///
/// Fetched fresh on every refresh tick, rendered, then discarded. Nothing in
/// here outlives a render cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketSnapshot {
    /// Dot-segmented instrument identifier, e.g. `CS.D.GBPUSD.TODAY.IP`
    pub epic: String,

    /// Offer minus bid
    pub spread: f64,

    /// Latest RSI reading on the minute resolution
    pub current_rsi: f64,

    /// Strategy output for this market
    pub prediction: Prediction,

    /// Signed deltas per time bucket, plus the `MAX` scaling entry
    pub trends: TrendSet,

    /// Open trade on this market, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade: Option<OpenTrade>,
}

/// Strategy prediction attached to a snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Signal strength; cards are ranked by this
    pub score: f64,

    /// Predicted price level
    pub price_prediction: f64,
}

/// The slice of an open trade the card renders
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenTrade {
    /// Running profit/loss in account currency
    pub profit_loss: f64,
}

/// Label-to-delta mapping with a distinguished `MAX` scaling entry.
///
/// The server sends this as a plain JSON object. The scaling entry is not a
/// bucket: `buckets()` filters it out without touching the map, so rendering
/// the same snapshot twice yields identical output.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrendSet(BTreeMap<String, f64>);

impl TrendSet {
    pub fn new(entries: BTreeMap<String, f64>) -> Self {
        Self(entries)
    }

    /// Magnitude every bar is scaled against. Zero when the server omitted
    /// the `MAX` entry; callers treat that as "draw nothing".
    pub fn scale(&self) -> f64 {
        self.0.get(TREND_SCALE_KEY).copied().unwrap_or(0.0)
    }

    /// All entries except the scaling reference, in label order.
    pub fn buckets(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.0
            .iter()
            .filter(|(label, _)| label.as_str() != TREND_SCALE_KEY)
            .map(|(label, delta)| (label.as_str(), *delta))
    }

    /// Number of drawable buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets().count()
    }
}

impl FromIterator<(String, f64)> for TrendSet {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
