//! View layer: formatting helpers and the trend chart widget

pub mod format;
pub mod trends;

pub use format::{epic_label, fixed2, profit_loss, relative_age};
pub use trends::TrendChart;
