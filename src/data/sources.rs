use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow, bail};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Deserialize;

use crate::config::HISTORY_API;
#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::data::normalize::RawBar;
use crate::domain::Subscription;
use crate::utils::time_utils;

/// One historical-bar request: `{symbol, exchange, fromDate, toDate}`.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRequest {
    pub subscription: Subscription,
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl HistoryRequest {
    pub fn new(subscription: Subscription, from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            subscription,
            from,
            to,
        }
    }

    /// Request covering the last `lookback_days` up to today.
    pub fn lookback(subscription: Subscription, lookback_days: u64) -> Self {
        let (from, to) = time_utils::lookback_window(lookback_days);
        Self::new(subscription, from, to)
    }
}

#[async_trait]
pub trait BarSource: Send + Sync {
    /// Raw, unnormalized records, or an error for network/status/payload failures.
    async fn fetch_bars(&self, request: &HistoryRequest) -> Result<Vec<RawBar>>;

    /// A unique identifier for this source (so afterwards we know which one answered).
    fn signature(&self) -> &'static str;
}

/// Tries each source in order. The first non-empty answer wins.
/// If every source failed the last error is returned; if at least one
/// answered with an empty list, that empty list is returned instead so the
/// caller can report "no data" rather than a fetch failure.
pub async fn fetch_with_fallback(
    sources: &[Box<dyn BarSource>],
    request: &HistoryRequest,
) -> Result<(Vec<RawBar>, &'static str)> {
    let mut empty_from: Option<&'static str> = None;
    let mut last_error: Option<anyhow::Error> = None;

    for source in sources {
        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_fetch_lifecycle {
            log::debug!("Trying {} for {}", source.signature(), request.subscription);
        }
        match source.fetch_bars(request).await {
            Ok(bars) if !bars.is_empty() => return Ok((bars, source.signature())),
            Ok(_) => {
                log::info!("{} returned no bars for {}", source.signature(), request.subscription);
                empty_from.get_or_insert(source.signature());
            }
            Err(e) => {
                log::info!("Error with bar source {}: {:#}", source.signature(), e);
                last_error = Some(e);
            }
        }
    }

    if let Some(signature) = empty_from {
        return Ok((Vec::new(), signature));
    }
    Err(last_error.unwrap_or_else(|| anyhow!("No bar sources configured")))
}

/// Accepted response shapes from the history endpoint.
#[derive(Deserialize)]
#[serde(untagged)]
enum HistoryPayload {
    Bare(Vec<RawBar>),
    Wrapped { data: Vec<RawBar> },
    Failure { error: String },
}

/// Parses a history body: a bare array, `{ data: [...] }`, or `{ error }`.
pub fn parse_history_payload(body: &str) -> Result<Vec<RawBar>> {
    let payload: HistoryPayload =
        serde_json::from_str(body).context("Unrecognised history payload")?;
    match payload {
        HistoryPayload::Bare(bars) | HistoryPayload::Wrapped { data: bars } => Ok(bars),
        HistoryPayload::Failure { error } => bail!("History endpoint error: {}", error),
    }
}

/// The embedding site's `/api/bse/history` endpoint.
pub struct HistoryApiSource {
    http: reqwest::Client,
    base_url: String,
}

impl HistoryApiSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("speedy-chart/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_millis(HISTORY_API.timeout_ms))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self) -> String {
        format!("{}{}", self.base_url, HISTORY_API.history_path)
    }
}

#[async_trait]
impl BarSource for HistoryApiSource {
    async fn fetch_bars(&self, request: &HistoryRequest) -> Result<Vec<RawBar>> {
        let sub = &request.subscription;
        let from = time_utils::day_to_string(request.from);
        let to = time_utils::day_to_string(request.to);
        let response = self
            .http
            .get(self.url())
            .query(&[
                ("symbol", sub.symbol.as_str()),
                ("scripCode", sub.scrip_code.as_deref().unwrap_or("")),
                ("exchange", sub.exchange.code()),
                ("fromDate", from.as_str()),
                ("toDate", to.as_str()),
            ])
            .send()
            .await
            .with_context(|| format!("History request for {} failed", sub.qualified_name()))?;

        let status = response.status();
        let body = response.text().await.context("Failed to read history body")?;
        if !status.is_success() {
            let detail = parse_history_payload(&body)
                .err()
                .map(|e| e.to_string())
                .unwrap_or_default();
            bail!("History endpoint returned {}: {}", status, detail);
        }
        parse_history_payload(&body)
    }

    fn signature(&self) -> &'static str {
        "History API"
    }
}

/// Bars from a local JSON file in the same shape as the endpoint.
/// Records outside the requested window are left in; the viewport only
/// ever shows what the series holds.
pub struct FixtureSource {
    pub path: PathBuf,
}

impl FixtureSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl BarSource for FixtureSource {
    async fn fetch_bars(&self, _request: &HistoryRequest) -> Result<Vec<RawBar>> {
        let body = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read fixture {:?}", self.path))?;
        parse_history_payload(&body)
    }

    fn signature(&self) -> &'static str {
        "Local fixture"
    }
}
