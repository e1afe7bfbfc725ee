use std::sync::Arc;

use poll_promise::Promise;

use crate::data::{fetch_with_fallback, normalize_with_report};
use crate::engine::error::ChartError;
use crate::models::Series;
use crate::utils::app_time::now;

use super::messages::{FetchRequest, FetchResult};

/// Runs the fetch on its own thread with a private single-threaded runtime.
/// The UI polls the promise once per frame and never blocks on it.
pub fn spawn_fetch(request: FetchRequest) -> Promise<FetchResult> {
    Promise::spawn_thread("bar_fetch", move || {
        let token = request.token;
        let is_refresh = request.is_refresh;
        match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt.block_on(run_fetch(request)),
            Err(e) => FetchResult {
                token,
                is_refresh,
                duration_ms: 0,
                source: None,
                result: Err(ChartError::DataFetch(format!("runtime unavailable: {}", e))),
            },
        }
    })
}

/// Fetch, normalize, and record the last close in the shared price cache.
pub async fn run_fetch(request: FetchRequest) -> FetchResult {
    let start = now();
    let outcome = fetch_with_fallback(&request.sources, &request.history).await;

    let (source, result) = match outcome {
        Ok((raw, source)) => {
            let (series, report) = normalize_with_report(&raw);
            log::debug!(
                "Token {:?}: {} raw records from {} -> {} bars ({} malformed, {} duplicate days)",
                request.token,
                report.input,
                source,
                series.len(),
                report.malformed,
                report.duplicates
            );
            (Some(source), finish(series, &request))
        }
        Err(e) => (None, Err(ChartError::DataFetch(format!("{:#}", e)))),
    };

    FetchResult {
        token: request.token,
        is_refresh: request.is_refresh,
        duration_ms: start.elapsed().as_millis(),
        source,
        result,
    }
}

fn finish(series: Series, request: &FetchRequest) -> Result<Arc<Series>, ChartError> {
    let last_close = series.last_close().ok_or(ChartError::DataEmpty)?;
    match request.price_cache.lock() {
        Ok(mut cache) => cache.insert(request.history.subscription.qualified_name(), last_close),
        Err(_) => log::warn!("Price cache lock poisoned; skipping last-price update"),
    }
    Ok(Arc::new(series))
}
