// Data loading: raw bar sources, normalization, events and the price cache
pub mod cache;
pub mod events;
pub mod normalize;
pub mod sources;

// Re-export commonly used types
pub use cache::LastPriceCache;
pub use events::{load_events_from_path, parse_events};
pub use normalize::{NormalizeReport, RawBar, normalize, normalize_with_report};
pub use sources::{
    BarSource, FixtureSource, HistoryApiSource, HistoryRequest, fetch_with_fallback,
};
