//! Dashboard configuration
//!
//! Layered: built-in defaults, then an optional YAML file, then environment
//! overrides (`IGDASH_SERVER_URL`, `IGDASH_EPICS`). CLI flags are applied on
//! top by the commands themselves.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use url::Url;

pub const SERVER_URL_ENV: &str = "IGDASH_SERVER_URL";
pub const EPICS_ENV: &str = "IGDASH_EPICS";

/// Market cards refresh on this cadence.
const DEFAULT_MARKET_INTERVAL_MS: u64 = 1000;

/// The trade panel refreshes on this cadence.
const DEFAULT_TRADE_INTERVAL_MS: u64 = 2000;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DashConfig {
    /// Base URL of the trading server
    #[serde(default = "default_server_url")]
    pub server_url: Url,

    /// Epics to keep cards for
    #[serde(default = "default_epics")]
    pub epics: Vec<String>,

    /// Market card refresh cadence in milliseconds
    #[serde(default = "default_market_interval_ms")]
    pub market_interval_ms: u64,

    /// Trade panel refresh cadence in milliseconds
    #[serde(default = "default_trade_interval_ms")]
    pub trade_interval_ms: u64,
}

fn default_server_url() -> Url {
    Url::parse("http://127.0.0.1:5000").expect("default server url parses")
}

fn default_epics() -> Vec<String> {
    [
        "CS.D.GBPUSD.TODAY.IP",
        "CS.D.EURUSD.TODAY.IP",
        "CS.D.USDJPY.TODAY.IP",
        "CS.D.AUDUSD.TODAY.IP",
        "CS.D.EURGBP.TODAY.IP",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

fn default_market_interval_ms() -> u64 {
    DEFAULT_MARKET_INTERVAL_MS
}

fn default_trade_interval_ms() -> u64 {
    DEFAULT_TRADE_INTERVAL_MS
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            epics: default_epics(),
            market_interval_ms: default_market_interval_ms(),
            trade_interval_ms: default_trade_interval_ms(),
        }
    }
}

impl DashConfig {
    /// Load from an optional YAML file, then apply env overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read config file {}", path.display()))?;
                serde_yaml::from_str(&raw)
                    .with_context(|| format!("failed to parse config file {}", path.display()))?
            }
            None => Self::default(),
        };

        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(raw) = std::env::var(SERVER_URL_ENV) {
            self.server_url = Url::parse(&raw)
                .with_context(|| format!("{SERVER_URL_ENV} is not a valid URL: {raw}"))?;
        }
        if let Ok(raw) = std::env::var(EPICS_ENV) {
            self.epics = raw
                .split(',')
                .map(str::trim)
                .filter(|epic| !epic.is_empty())
                .map(str::to_string)
                .collect();
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.market_interval_ms == 0 {
            anyhow::bail!("market_interval_ms must be greater than zero");
        }
        if self.trade_interval_ms == 0 {
            anyhow::bail!("trade_interval_ms must be greater than zero");
        }
        Ok(())
    }

    pub fn market_interval(&self) -> Duration {
        Duration::from_millis(self.market_interval_ms)
    }

    pub fn trade_interval(&self) -> Duration {
        Duration::from_millis(self.trade_interval_ms)
    }
}
