use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::refresh::CardState;
use crate::view::{epic_label, fixed2, profit_loss, relative_age, TrendChart};

/// Rows the numeric fields take above the trend chart.
const FIELD_ROWS: u16 = 4;

pub fn render_card(frame: &mut Frame<'_>, area: Rect, card: &CardState) {
    let age = card
        .updated_at
        .map(|at| relative_age(at.elapsed()))
        .unwrap_or_else(|| "never".to_string());

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", epic_label(&card.epic)))
        .title_bottom(Line::from(format!(" {age} ")).right_aligned());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(snapshot) = card.snapshot.as_ref() else {
        let waiting = Paragraph::new("waiting for first snapshot")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(waiting, inner);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(FIELD_ROWS), Constraint::Min(3)])
        .split(inner);

    let label = Style::default().fg(Color::DarkGray);
    let pl_span = snapshot
        .trade
        .as_ref()
        .map(|trade| profit_loss(trade.profit_loss))
        .unwrap_or_else(|| Span::styled("-", Style::default().fg(Color::DarkGray)));

    let fields = vec![
        Line::from(vec![
            Span::styled("spread ", label),
            Span::raw(fixed2(snapshot.spread)),
            Span::styled("  rsi ", label),
            Span::raw(fixed2(snapshot.current_rsi)),
        ]),
        Line::from(vec![
            Span::styled("score ", label),
            Span::raw(fixed2(snapshot.prediction.score)),
        ]),
        Line::from(vec![
            Span::styled("pred ", label),
            Span::raw(fixed2(snapshot.prediction.price_prediction)),
        ]),
        Line::from(vec![Span::styled("p/l ", label), pl_span]),
    ];

    frame.render_widget(Paragraph::new(fields), chunks[0]);
    frame.render_widget(TrendChart::new(&snapshot.trends), chunks[1]);
}
