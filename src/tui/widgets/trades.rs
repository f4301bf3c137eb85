use std::time::Instant;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::view::relative_age;

/// The trade panel renders whatever fragment the server last sent, wholesale.
/// No diffing: a refresh replaces everything.
pub fn render_trades(
    frame: &mut Frame<'_>,
    area: Rect,
    panel: Option<&str>,
    updated_at: Option<Instant>,
) {
    let age = updated_at
        .map(|at| relative_age(at.elapsed()))
        .unwrap_or_else(|| "never".to_string());

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Trades ")
        .title_bottom(Line::from(format!(" {age} ")).right_aligned());

    let body = match panel {
        Some(fragment) => Paragraph::new(fragment.to_string()).wrap(Wrap { trim: false }),
        None => Paragraph::new("waiting for trade data")
            .style(Style::default().fg(Color::DarkGray)),
    };

    frame.render_widget(body.block(block), area);
}
