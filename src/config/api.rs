//! Historical-bar endpoint configuration.

/// Configuration for the history REST collaborator
#[derive(Debug, Clone)]
pub struct HistoryApiConfig {
    /// Base URL of the embedding site serving `/api/bse/history`
    pub base_url: &'static str,
    pub history_path: &'static str,
    /// Per-request timeout
    pub timeout_ms: u64,
    /// Time-to-live for entries in the last-price cache
    pub price_cache_ttl_secs: u64,
    /// Upper bound on cached symbols before the oldest entries are evicted
    pub price_cache_capacity: usize,
    /// Chart URL for symbols we cannot fetch ourselves
    pub external_viewer_url: &'static str,
}

pub const HISTORY_API: HistoryApiConfig = HistoryApiConfig {
    base_url: "http://localhost:3000",
    history_path: "/api/bse/history",
    timeout_ms: 10_000,
    price_cache_ttl_secs: 300,
    price_cache_capacity: 64,
    external_viewer_url: "https://www.tradingview.com/chart/?symbol=",
};
