// Chart models: the canonical series and everything derived from it.
// Pure computation, independent of the UI.

pub mod indicator;
pub mod series;
pub mod volume_profile;

// Re-export key types for convenience
pub use indicator::{IndicatorPoint, MovingAverageOverlay, moving_average};
pub use series::Series;
pub use volume_profile::{ProfileBinRect, ProfileHit, ProfileLayout, VolumeProfile};
