//! One-shot trade panel fetch

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use crate::client::DashClient;
use crate::config::DashConfig;
use crate::data_paths::DataPaths;

#[derive(Args, Clone)]
pub struct TradesArgs {}

pub struct TradesCommand {
    _args: TradesArgs,
}

impl TradesCommand {
    pub fn new(args: TradesArgs) -> Self {
        Self { _args: args }
    }

    pub async fn execute(&self, config: DashConfig, _data_paths: DataPaths) -> Result<()> {
        info!(server = %config.server_url, "fetching trade panel");

        let client = DashClient::new(config.server_url.clone());
        let panel = client
            .fetch_trades()
            .await
            .context("failed to fetch trade panel")?;

        // the server sends a pre-rendered fragment; print it as-is
        println!("{panel}");
        Ok(())
    }
}
