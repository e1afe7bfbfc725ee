#![allow(clippy::collapsible_if)]
#![allow(clippy::type_complexity)]

// Core modules
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod models;
pub mod ui;
pub mod utils;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Result, bail};
use chrono::NaiveDate;

use crate::config::{CHART, HISTORY_API};
use crate::data::{BarSource, FixtureSource, HistoryApiSource};

// Re-export commonly used types
pub use data::{LastPriceCache, load_events_from_path, normalize};
pub use domain::{Bar, Event, Exchange, Subscription, Theme};
pub use engine::{ChartController, ChartError, ChartStyle, SharedSources};
pub use models::{Series, VolumeProfile};
pub use ui::{ChartApp, UiPrefs};
pub use utils::app_time;

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Trading symbol to chart, e.g. RELIANCE
    #[arg(long, default_value = "RELIANCE")]
    pub symbol: String,

    /// Exchange scrip code, forwarded to the history endpoint
    #[arg(long)]
    pub scrip_code: Option<String>,

    #[arg(long, value_enum, default_value_t = Exchange::Bse)]
    pub exchange: Exchange,

    /// Overrides the stored theme
    #[arg(long, value_enum)]
    pub theme: Option<Theme>,

    /// Overrides the stored series style
    #[arg(long, value_enum)]
    pub style: Option<ChartStyle>,

    /// Site serving the history endpoint
    #[arg(long, default_value = HISTORY_API.base_url)]
    pub base_url: String,

    /// Local JSON bars, tried after the history endpoint
    #[arg(long)]
    pub fixture: Option<PathBuf>,

    /// Skip the history endpoint and read only `--fixture`
    #[arg(long, default_value_t = false)]
    pub offline: bool,

    /// Local JSON list of announcements to mark on the chart
    #[arg(long)]
    pub events: Option<PathBuf>,

    /// Date (YYYY-MM-DD) to focus and highlight once data arrives
    #[arg(long)]
    pub target_date: Option<NaiveDate>,

    /// Event id to focus and open on load
    #[arg(long)]
    pub highlight_event: Option<String>,

    /// Poll-refresh interval in seconds; 0 disables polling
    #[arg(long, default_value_t = CHART.poll_interval_secs)]
    pub poll_secs: u64,
}

/// Bar sources in fallback order: history endpoint first, then the fixture.
pub fn build_sources(args: &Cli) -> Result<SharedSources> {
    let mut sources: Vec<Box<dyn BarSource>> = Vec::new();
    if !args.offline {
        sources.push(Box::new(HistoryApiSource::new(args.base_url.clone())?));
    }
    if let Some(path) = &args.fixture {
        sources.push(Box::new(FixtureSource::new(path.clone())));
    }
    if sources.is_empty() {
        bail!("--offline needs a --fixture to read bars from");
    }
    Ok(Arc::from(sources))
}

/// Main application entry point - creates the GUI app
/// This is the public API for the binary to call
pub fn run_app(cc: &eframe::CreationContext, args: Cli, sources: SharedSources) -> Box<dyn eframe::App> {
    let prefs = UiPrefs::load(cc.storage).with_overrides(args.theme, args.style);

    let mut subscription = Subscription::new(&args.symbol, args.exchange, prefs.theme);
    if let Some(code) = &args.scrip_code {
        subscription = subscription.with_scrip_code(code.clone());
    }

    let price_cache = Arc::new(Mutex::new(LastPriceCache::new(
        Duration::from_secs(HISTORY_API.price_cache_ttl_secs),
        HISTORY_API.price_cache_capacity,
    )));

    let mut controller = ChartController::new(
        subscription,
        sources,
        price_cache,
        Duration::from_secs(args.poll_secs),
    );

    if let Some(path) = &args.events {
        match load_events_from_path(path) {
            Ok(events) => controller.set_events(events),
            Err(e) => log::warn!("Ignoring events file {:?}: {:#}", path, e),
        }
    }
    controller.set_target_date(args.target_date);
    if let Some(id) = &args.highlight_event {
        controller.highlight_event(id.clone());
    }

    Box::new(ChartApp::new(controller, prefs))
}
