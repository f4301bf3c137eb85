//! Terminal dashboard
//!
//! Full-screen ratatui view over the refresh engine's shared state: market
//! cards laid out in the refresher's display order, with the trade panel
//! underneath. Rendering only ever reads; all writes come from the refresh
//! loops.

pub mod app;
pub mod events;
pub mod ui;
pub mod widgets;

pub use app::App;
pub use events::{Event, EventHandler};
