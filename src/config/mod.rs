//! Configuration module for the chart application.

pub mod api;
pub mod chart;

mod debug; // Private: use crate::config::DEBUG_FLAGS rather than crate::config::debug::DEBUG_FLAGS
pub use debug::DEBUG_FLAGS;

pub mod persistence;
pub mod plot;

// Re-export commonly used items
pub use api::{HISTORY_API, HistoryApiConfig};
pub use chart::{CHART, ChartConfig};
pub use persistence::PERSISTENCE;
pub use plot::PLOT_COLORS;
