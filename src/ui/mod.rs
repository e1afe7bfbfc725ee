mod app;
pub mod config;
pub mod plot_layers;
pub mod styles;
pub mod ui_panels;
mod ui_render;
pub mod ui_text;
pub mod utils;

// Re-export main app type
pub use app::{ChartApp, UiPrefs};
pub use ui_panels::ControlEvent;
