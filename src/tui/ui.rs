use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::widgets;
use crate::tui::App;

/// Minimum width a card column needs before we add another one.
const CARD_MIN_WIDTH: u16 = 36;

/// Rows reserved for the trade panel at the bottom.
const TRADE_PANEL_HEIGHT: u16 = 9;

pub fn draw(frame: &mut Frame<'_>, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(TRADE_PANEL_HEIGHT),
        ])
        .split(frame.area());

    render_header(frame, chunks[0], app);
    render_cards(frame, chunks[1], app);
    widgets::trades::render_trades(
        frame,
        chunks[2],
        app.view().trades_panel.as_deref(),
        app.view().trades_updated_at,
    );
}

fn render_header(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let header = Paragraph::new(format!(
        "igdash | {} markets | up {}s | q to quit",
        app.view().cards.len(),
        app.uptime().as_secs(),
    ))
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

/// Market cards in display order, wrapped into as many columns as fit.
fn render_cards(frame: &mut Frame<'_>, area: Rect, app: &App) {
    let cards = &app.view().cards;
    if cards.is_empty() {
        let empty = Paragraph::new("no markets watched")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Markets"));
        frame.render_widget(empty, area);
        return;
    }

    let columns = (area.width / CARD_MIN_WIDTH).max(1) as usize;
    let rows = cards.len().div_ceil(columns);

    let row_constraints = vec![Constraint::Ratio(1, rows as u32); rows];
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(row_constraints)
        .split(area);

    for (row_index, row_area) in row_areas.iter().enumerate() {
        let col_constraints = vec![Constraint::Ratio(1, columns as u32); columns];
        let col_areas = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(col_constraints)
            .split(*row_area);

        for (col_index, col_area) in col_areas.iter().enumerate() {
            if let Some(card) = cards.get(row_index * columns + col_index) {
                widgets::card::render_card(frame, *col_area, card);
            }
        }
    }
}
