use std::fmt;

use crate::config::HISTORY_API;
use crate::domain::Subscription;

/// Every failure the chart can end up showing.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartError {
    /// Network failure, timeout or non-2xx from every bar source
    DataFetch(String),
    /// Sources answered but nothing survived normalization
    DataEmpty,
    /// Symbol cannot be charted here (e.g. a bare scrip code)
    SymbolInvalid(String),
    /// Drawing surface could not be built for the current container
    RenderSurface(String),
}

impl fmt::Display for ChartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartError::DataFetch(msg) => write!(f, "Failed to fetch chart data: {}", msg),
            ChartError::DataEmpty => write!(f, "No chart data available"),
            ChartError::SymbolInvalid(symbol) => write!(f, "Invalid symbol: {}", symbol),
            ChartError::RenderSurface(msg) => write!(f, "Chart surface unavailable: {}", msg),
        }
    }
}

impl std::error::Error for ChartError {}

impl ChartError {
    /// Whether the UI offers a retry button.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ChartError::DataFetch(_) | ChartError::DataEmpty)
    }

    /// Short text for the inline error overlay.
    pub fn user_message(&self) -> &'static str {
        match self {
            ChartError::DataFetch(_) => "Failed to load chart data",
            ChartError::DataEmpty => "Chart data not available for this stock",
            ChartError::SymbolInvalid(_) => "Chart not available for this symbol",
            ChartError::RenderSurface(_) => "Unable to draw chart",
        }
    }

    /// External viewer link offered instead of a retry for invalid symbols.
    pub fn external_viewer_url(&self, subscription: &Subscription) -> Option<String> {
        match self {
            ChartError::SymbolInvalid(_) => Some(format!(
                "{}{}",
                HISTORY_API.external_viewer_url,
                subscription.qualified_name()
            )),
            _ => None,
        }
    }
}
