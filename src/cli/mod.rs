//! CLI module for igdash
//!
//! clap-based command surface: the live dashboard plus one-shot diagnostic
//! fetches against the same endpoints.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use url::Url;

pub mod commands;

use crate::config::DashConfig;
use crate::data_paths::{DataPaths, DEFAULT_DATA_DIR};
use crate::logging::{self, LogMode, LoggingConfig};

use commands::dash::{DashArgs, DashCommand};
use commands::snapshot::{SnapshotArgs, SnapshotCommand};
use commands::trades::{TradesArgs, TradesCommand};
use commands::version::{VersionArgs, VersionCommand};

#[derive(Parser)]
#[command(name = "igdash")]
#[command(version)]
#[command(about = "Terminal dashboard for a FAIG-style auto-trading server", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Trading server base URL (overrides config file and environment)
    #[arg(long, global = true)]
    pub server_url: Option<Url>,

    /// Path to a YAML config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Data directory path (default: ./data)
    #[arg(long, global = true, default_value = DEFAULT_DATA_DIR)]
    pub data_dir: PathBuf,

    /// Verbose logging
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the live terminal dashboard
    Dash(DashArgs),

    /// Fetch one market snapshot and print it
    Snapshot(SnapshotArgs),

    /// Fetch the trade panel once and print it
    Trades(TradesArgs),

    /// Show version information
    Version(VersionArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        let data_paths = DataPaths::new(&self.data_dir);
        data_paths.ensure_directories()?;

        // The dashboard owns the terminal, so its logs go to file only
        let log_mode = match &self.command {
            Commands::Dash(_) => LogMode::FileOnly,
            _ => LogMode::ConsoleAndFile,
        };
        logging::init_logging(LoggingConfig::new(log_mode, data_paths.clone(), self.verbose))?;

        let mut config = DashConfig::load(self.config.as_deref())?;
        if let Some(server_url) = self.server_url {
            config.server_url = server_url;
        }

        match self.command {
            Commands::Dash(args) => DashCommand::new(args).execute(config, data_paths).await,
            Commands::Snapshot(args) => SnapshotCommand::new(args).execute(config, data_paths).await,
            Commands::Trades(args) => TradesCommand::new(args).execute(config, data_paths).await,
            Commands::Version(args) => VersionCommand::new(args).execute(config, data_paths).await,
        }
    }
}
