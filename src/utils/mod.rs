// Shared helpers: time, maths, formatting
pub mod app_time;
pub mod format;
pub mod maths_utils;
pub mod time_utils;

pub use format::{format_inr, format_volume};
pub use time_utils::TimeUtils;
