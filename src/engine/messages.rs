use std::sync::{Arc, Mutex};

use crate::data::{BarSource, HistoryRequest, LastPriceCache};
use crate::engine::error::ChartError;
use crate::models::Series;

/// Monotonically increasing id of one fetch. Only the newest token's
/// result is ever applied; anything older is stale and dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RequestToken(pub u64);

impl RequestToken {
    pub fn next(self) -> Self {
        RequestToken(self.0 + 1)
    }
}

pub type SharedSources = Arc<[Box<dyn BarSource>]>;
pub type SharedPriceCache = Arc<Mutex<LastPriceCache>>;

/// A request to load bars for the active subscription
pub struct FetchRequest {
    pub token: RequestToken,
    pub history: HistoryRequest,
    pub sources: SharedSources,
    pub price_cache: SharedPriceCache,
    /// Poll refreshes keep the current chart on screen while they run
    pub is_refresh: bool,
}

/// The result returned by the worker
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub token: RequestToken,
    pub is_refresh: bool,
    pub duration_ms: u128,
    pub source: Option<&'static str>,
    pub result: Result<Arc<Series>, ChartError>,
}
