pub mod core;
pub mod error;
pub mod mapper;
pub mod markers;
pub mod messages;
pub mod poll;
pub mod state;
pub mod tooltip;
pub mod viewport;
pub mod worker;

// Re-export key components
pub use self::core::ChartController;
pub use error::ChartError;
pub use mapper::CoordinateMapper;
pub use markers::{BoundMarker, MarkerLayer, PopupState};
pub use messages::{RequestToken, SharedPriceCache, SharedSources};
pub use poll::PollTimer;
pub use state::{ChartStyle, LoadState, OverlayToggles, Surface};
pub use tooltip::Tooltip;
pub use viewport::{RangeKey, Viewport, ViewportController, ViewportState};
