use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::refresh::{CardState, SharedDashState};

/// Render-side copy of the dashboard state, refreshed from the shared lock
/// once per frame.
#[derive(Debug, Clone, Default)]
pub struct DashView {
    pub cards: Vec<CardState>,
    pub trades_panel: Option<String>,
    pub trades_updated_at: Option<Instant>,
}

pub struct App {
    state: SharedDashState,
    view: DashView,
    pub should_quit: bool,
    started_at: Instant,
}

impl App {
    pub fn new(state: SharedDashState) -> Self {
        Self {
            state,
            view: DashView::default(),
            should_quit: false,
            started_at: Instant::now(),
        }
    }

    /// Refresh the cached view. Uses try_read so a frame never blocks a
    /// refresh write; on contention the previous view is drawn again.
    pub fn update_view(&mut self) {
        if let Ok(state) = self.state.try_read() {
            self.view = DashView {
                cards: state.cards_in_order(),
                trades_panel: state.trades_panel().map(str::to_string),
                trades_updated_at: state.trades_updated_at(),
            };
        }
    }

    pub fn view(&self) -> &DashView {
        &self.view
    }

    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true
            }
            _ => {}
        }
    }
}
