//! One-shot market snapshot fetch, printed as a table

use anyhow::{Context, Result};
use clap::Args;
use comfy_table::{presets::UTF8_FULL, Table};
use owo_colors::OwoColorize;
use tracing::info;

use crate::client::DashClient;
use crate::config::DashConfig;
use crate::data_paths::DataPaths;
use crate::view::{epic_label, fixed2};

#[derive(Args, Clone)]
pub struct SnapshotArgs {
    /// Epic to fetch, e.g. CS.D.GBPUSD.TODAY.IP
    pub epic: String,
}

pub struct SnapshotCommand {
    args: SnapshotArgs,
}

impl SnapshotCommand {
    pub fn new(args: SnapshotArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, config: DashConfig, _data_paths: DataPaths) -> Result<()> {
        info!(epic = %self.args.epic, server = %config.server_url, "fetching snapshot");

        let client = DashClient::new(config.server_url.clone());
        let snapshot = client
            .fetch_market(&self.args.epic)
            .await
            .with_context(|| format!("failed to fetch market {}", self.args.epic))?;

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec!["Field", "Value"]);
        table.add_row(vec!["Epic".to_string(), snapshot.epic.clone()]);
        table.add_row(vec!["Label".to_string(), epic_label(&snapshot.epic).to_string()]);
        table.add_row(vec!["Spread".to_string(), fixed2(snapshot.spread)]);
        table.add_row(vec!["RSI".to_string(), fixed2(snapshot.current_rsi)]);
        table.add_row(vec!["Score".to_string(), fixed2(snapshot.prediction.score)]);
        table.add_row(vec![
            "Prediction".to_string(),
            fixed2(snapshot.prediction.price_prediction),
        ]);
        println!("{table}");

        if let Some(trade) = &snapshot.trade {
            let rendered = fixed2(trade.profit_loss);
            if trade.profit_loss < 0.0 {
                println!("Open trade P/L: {}", rendered.red());
            } else {
                println!("Open trade P/L: {}", rendered.blue());
            }
        }

        if snapshot.trends.bucket_count() > 0 {
            println!("\nTrends (scale {}):", fixed2(snapshot.trends.scale()));
            for (label, delta) in snapshot.trends.buckets() {
                let rendered = fixed2(delta);
                if delta < 0.0 {
                    println!("  {:<6} {}", label, rendered.red());
                } else {
                    println!("  {:<6} {}", label, rendered.blue());
                }
            }
        }

        Ok(())
    }
}
