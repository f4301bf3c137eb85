//! Trend bar chart widget
//!
//! Terminal rendering of the per-bucket trend chart: a horizontal zero line
//! mid-height, one vertical bar per time bucket scaled against the set's
//! `MAX` magnitude, drawn upward and blue for positive deltas, downward and
//! red for negative ones, with the bucket label on the bottom row.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;

use crate::client::TrendSet;
use crate::view::format::fixed2;

/// Columns between consecutive bars.
const BAR_STEP: u16 = 5;

/// Width reserved for a bucket label under its bar.
const LABEL_WIDTH: usize = 4;

pub struct TrendChart<'a> {
    trends: &'a TrendSet,
}

impl<'a> TrendChart<'a> {
    pub fn new(trends: &'a TrendSet) -> Self {
        Self { trends }
    }

    /// Rows a bar of `delta` occupies on a half of `span` rows. Deltas beyond
    /// the scale clamp to the full half; a non-positive scale draws nothing.
    fn bar_length(delta: f64, scale: f64, span: u16) -> u16 {
        if scale <= 0.0 || span == 0 {
            return 0;
        }
        let ratio = (delta.abs() / scale).min(1.0);
        (ratio * f64::from(span)).round() as u16
    }
}

impl Widget for TrendChart<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 2 || area.height < 3 {
            return;
        }

        let label_row = area.bottom() - 1;
        let chart_height = area.height - 1;
        let zero_row = area.top() + chart_height / 2;
        let up_span = zero_row - area.top();
        let down_span = label_row.saturating_sub(zero_row + 1);

        // zero line
        for x in area.left()..area.right() {
            if let Some(cell) = buf.cell_mut((x, zero_row)) {
                cell.set_symbol("─").set_style(Style::default().fg(Color::DarkGray));
            }
        }

        let scale = self.trends.scale();
        buf.set_string(
            area.left(),
            area.top(),
            format!("MAX{}", fixed2(scale)),
            Style::default().fg(Color::DarkGray),
        );

        for (i, (label, delta)) in self.trends.buckets().enumerate() {
            let x = area.left() + 1 + (i as u16) * BAR_STEP;
            if x >= area.right() {
                break;
            }

            let positive = delta > 0.0;
            let style = Style::default().fg(if positive { Color::Blue } else { Color::Red });

            if positive {
                let length = Self::bar_length(delta, scale, up_span);
                for row in 0..length {
                    if let Some(cell) = buf.cell_mut((x, zero_row - 1 - row)) {
                        cell.set_symbol("█").set_style(style);
                    }
                }
            } else {
                let length = Self::bar_length(delta, scale, down_span);
                for row in 0..length {
                    if let Some(cell) = buf.cell_mut((x, zero_row + 1 + row)) {
                        cell.set_symbol("█").set_style(style);
                    }
                }
            }

            let mut short = label.to_string();
            short.truncate(LABEL_WIDTH);
            buf.set_stringn(
                x,
                label_row,
                short,
                LABEL_WIDTH,
                Style::default().fg(Color::Gray),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trend_set(entries: &[(&str, f64)]) -> TrendSet {
        entries
            .iter()
            .map(|(label, delta)| (label.to_string(), *delta))
            .collect()
    }

    fn render(trends: &TrendSet, width: u16, height: u16) -> Buffer {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        TrendChart::new(trends).render(area, &mut buf);
        buf
    }

    fn bar_cells(buf: &Buffer, x: u16, height: u16) -> Vec<(u16, Color)> {
        (0..height)
            .filter_map(|y| {
                let cell = buf.cell((x, y)).unwrap();
                (cell.symbol() == "█").then_some((y, cell.style().fg.unwrap()))
            })
            .collect()
    }

    #[test]
    fn one_bar_per_non_max_bucket() {
        // 11 rows: label row at y=10, zero line at y=5, 5 rows each way
        let trends = trend_set(&[("MAX", 10.0), ("A", 5.0), ("B", -5.0)]);
        let buf = render(&trends, 20, 11);

        // bucket A at x=1: half scale, 2..=3 rows up (rounded), blue, above zero
        let a = bar_cells(&buf, 1, 11);
        assert_eq!(a.len(), 3); // |5|/10 * 5 rounds to 3
        assert!(a.iter().all(|(y, color)| *y < 5 && *color == Color::Blue));

        // bucket B at x=6: red, below zero (down half is 4 rows, |−5|/10 * 4)
        let b = bar_cells(&buf, 6, 11);
        assert_eq!(b.len(), 2);
        assert!(b.iter().all(|(y, color)| *y > 5 && *y < 10 && *color == Color::Red));

        // no third bar
        assert!(bar_cells(&buf, 11, 11).is_empty());
    }

    #[test]
    fn bar_length_proportional_to_scale() {
        assert_eq!(TrendChart::bar_length(5.0, 10.0, 25), 13); // |5|/10 * 25
        assert_eq!(TrendChart::bar_length(10.0, 10.0, 25), 25);
        assert_eq!(TrendChart::bar_length(-2.5, 10.0, 20), 5);
    }

    #[test]
    fn overscale_deltas_clamp_to_half_height() {
        assert_eq!(TrendChart::bar_length(40.0, 10.0, 25), 25);
    }

    #[test]
    fn zero_scale_draws_flat() {
        assert_eq!(TrendChart::bar_length(5.0, 0.0, 25), 0);

        let trends = trend_set(&[("A", 5.0)]); // no MAX entry
        let buf = render(&trends, 20, 11);
        assert!(bar_cells(&buf, 1, 11).is_empty());
    }

    #[test]
    fn caption_shows_scale() {
        let trends = trend_set(&[("MAX", 10.0), ("A", 5.0)]);
        let buf = render(&trends, 20, 11);

        let caption: String = (0..8)
            .map(|x| buf.cell((x, 0)).unwrap().symbol().to_string())
            .collect();
        assert!(caption.starts_with("MAX10.00"));
    }

    #[test]
    fn rendering_twice_leaves_trends_unchanged() {
        let trends = trend_set(&[("MAX", 10.0), ("A", 5.0), ("B", -5.0)]);
        let first = render(&trends, 20, 11);
        let second = render(&trends, 20, 11);

        assert_eq!(first, second);
        assert_eq!(trends.scale(), 10.0);
        assert_eq!(trends.bucket_count(), 2);
    }

    #[test]
    fn labels_render_under_bars() {
        let trends = trend_set(&[("MAX", 10.0), ("5m", 2.0)]);
        let buf = render(&trends, 20, 11);

        let label: String = (1..3)
            .map(|x| buf.cell((x, 10)).unwrap().symbol().to_string())
            .collect();
        assert_eq!(label, "5m");
    }
}
