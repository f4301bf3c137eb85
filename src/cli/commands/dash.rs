//! The live dashboard command

use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::Args;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};

use crate::client::DashClient;
use crate::config::DashConfig;
use crate::data_paths::DataPaths;
use crate::refresh::ViewRefresher;
use crate::tui::{ui, App, Event, EventHandler};

/// Render cadence; refresh cadences are the server-poll intervals, this one
/// only drives redraws of already-fetched state.
const RENDER_TICK: Duration = Duration::from_millis(250);

#[derive(Args, Clone)]
pub struct DashArgs {
    /// Watch this epic instead of the configured list (repeatable)
    #[arg(long = "epic")]
    pub epics: Vec<String>,

    /// Market card refresh cadence in milliseconds
    #[arg(long)]
    pub market_interval_ms: Option<u64>,

    /// Trade panel refresh cadence in milliseconds
    #[arg(long)]
    pub trade_interval_ms: Option<u64>,
}

pub struct DashCommand {
    args: DashArgs,
}

impl DashCommand {
    pub fn new(args: DashArgs) -> Self {
        Self { args }
    }

    pub async fn execute(&self, mut config: DashConfig, _data_paths: DataPaths) -> Result<()> {
        if !self.args.epics.is_empty() {
            config.epics = self.args.epics.clone();
        }
        if let Some(interval) = self.args.market_interval_ms {
            config.market_interval_ms = interval;
        }
        if let Some(interval) = self.args.trade_interval_ms {
            config.trade_interval_ms = interval;
        }

        info!(
            server = %config.server_url,
            epics = config.epics.len(),
            "starting dashboard"
        );

        let client = DashClient::new(config.server_url.clone());
        let refresher = ViewRefresher::new(
            client,
            config.epics.clone(),
            config.market_interval(),
            config.trade_interval(),
        );
        let handle = refresher.spawn();

        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let mut app = App::new(handle.state());
        let result = run_app(&mut terminal, &mut app).await;

        // Restore terminal
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;

        handle.shutdown();
        result
    }
}

async fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> Result<()> {
    let mut events = EventHandler::new(RENDER_TICK);

    loop {
        app.update_view();
        terminal.draw(|frame| ui::draw(frame, app))?;

        match events.next().await {
            Some(Event::Key(key)) => app.handle_key(key),
            Some(Event::Tick) => {}
            Some(Event::Error(message)) => error!(%message, "terminal event error"),
            None => break,
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
