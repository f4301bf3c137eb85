//! Presentation formatting for market cards
//!
//! Pure functions mapping snapshot fields to display text and styles. All
//! numeric fields render fixed to two decimals, matching the server's own
//! rounding of trade figures.

use std::time::Duration;

use ratatui::style::{Color, Style};
use ratatui::text::Span;

/// Two-decimal rendering used for spread, RSI and prediction fields.
pub fn fixed2(value: f64) -> String {
    format!("{value:.2}")
}

/// Short display label for an epic: the third dot-separated segment
/// (`CS.D.GBPUSD.TODAY.IP` → `GBPUSD`). Epics with fewer segments render
/// whole.
pub fn epic_label(epic: &str) -> &str {
    epic.split('.').nth(2).unwrap_or(epic)
}

/// Profit/loss as a colored span: red when negative, blue otherwise.
pub fn profit_loss(value: f64) -> Span<'static> {
    let color = if value < 0.0 { Color::Red } else { Color::Blue };
    Span::styled(fixed2(value), Style::default().fg(color))
}

/// Relative age of a snapshot, recomputed on every render.
pub fn relative_age(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs < 60 {
        format!("{secs}s ago")
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else {
        format!("{}h ago", secs / 3600)
    }
}
