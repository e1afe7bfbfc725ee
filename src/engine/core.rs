use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use eframe::egui::{Pos2, Rect, pos2};
use poll_promise::Promise;

use crate::config::CHART;
#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::data::HistoryRequest;
use crate::domain::{Event, Subscription};
use crate::models::{MovingAverageOverlay, Series, VolumeProfile};
use crate::utils::app_time::AppInstant;

use super::error::ChartError;
use super::mapper::CoordinateMapper;
use super::markers::{MarkerLayer, PopupState, popup_rect};
use super::messages::{FetchRequest, FetchResult, RequestToken, SharedPriceCache, SharedSources};
use super::poll::PollTimer;
use super::state::{ChartStyle, LoadState, OverlayToggles, Surface};
use super::tooltip::{self, Tooltip};
use super::viewport::{RangeKey, Viewport, ViewportController, ViewportState};
use super::worker;

/// Owns one chart: the subscription, its series, every derived layer and
/// the drawing surface. The UI drives it once per frame through `update`
/// and `prepare_surface`, then reads state back to paint.
pub struct ChartController {
    subscription: Subscription,
    sources: SharedSources,
    price_cache: SharedPriceCache,

    /// Shared immutable snapshot, replaced wholesale on every load
    series: Arc<Series>,
    events: Vec<Event>,
    load_state: LoadState,
    refreshing: bool,
    last_source: Option<&'static str>,

    viewport: ViewportController,
    sma_fast: MovingAverageOverlay,
    sma_slow: MovingAverageOverlay,
    overlays: OverlayToggles,
    pub style: ChartStyle,
    pub fullscreen: bool,

    markers: MarkerLayer,
    target_date: Option<NaiveDate>,
    /// Event id waiting for a surface to anchor its popup on
    pending_highlight: Option<String>,
    popup: Option<PopupState>,
    tooltip: Tooltip,
    profile: Option<VolumeProfile>,

    surface: Option<Surface>,
    surface_error: Option<ChartError>,
    /// Bumped whenever anything that feeds the pixel caches changes
    layout_generation: u64,

    token: RequestToken,
    fetch: Option<Promise<FetchResult>>,
    poll: PollTimer,
}

impl ChartController {
    pub fn new(
        subscription: Subscription,
        sources: SharedSources,
        price_cache: SharedPriceCache,
        poll_interval: Duration,
    ) -> Self {
        Self {
            subscription,
            sources,
            price_cache,
            series: Arc::new(Series::empty()),
            events: Vec::new(),
            load_state: LoadState::Idle,
            refreshing: false,
            last_source: None,
            viewport: ViewportController::new(RangeKey::default()),
            sma_fast: MovingAverageOverlay::new(CHART.sma_fast_period),
            sma_slow: MovingAverageOverlay::new(CHART.sma_slow_period),
            overlays: OverlayToggles::default(),
            style: ChartStyle::default(),
            fullscreen: false,
            markers: MarkerLayer::default(),
            target_date: None,
            pending_highlight: None,
            popup: None,
            tooltip: Tooltip::Hidden,
            profile: None,
            surface: None,
            surface_error: None,
            layout_generation: 0,
            token: RequestToken::default(),
            fetch: None,
            poll: PollTimer::new(poll_interval),
        }
    }

    // --- ACCESSORS ---

    pub fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    pub fn series(&self) -> &Arc<Series> {
        &self.series
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn last_source(&self) -> Option<&'static str> {
        self.last_source
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport.viewport()
    }

    pub fn viewport_state(&self) -> ViewportState {
        self.viewport.state()
    }

    pub fn active_range(&self) -> Option<RangeKey> {
        self.viewport.active_range()
    }

    pub fn overlays(&self) -> OverlayToggles {
        self.overlays
    }

    pub fn sma_fast(&self) -> &MovingAverageOverlay {
        &self.sma_fast
    }

    pub fn sma_slow(&self) -> &MovingAverageOverlay {
        &self.sma_slow
    }

    pub fn markers(&self) -> &MarkerLayer {
        &self.markers
    }

    pub fn profile(&self) -> Option<&VolumeProfile> {
        self.profile.as_ref()
    }

    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }

    pub fn surface_error(&self) -> Option<&ChartError> {
        self.surface_error.as_ref()
    }

    pub fn current_token(&self) -> RequestToken {
        self.token
    }

    /// Open popup with its event and on-screen rectangle.
    pub fn popup(&self) -> Option<(&Event, Rect)> {
        let popup = self.popup?;
        let event = self.events.get(popup.event_index)?;
        let container = self.surface.as_ref()?.container();
        Some((event, popup_rect(popup.anchor, container)))
    }

    /// Last close seen for this subscription, if still fresh in the cache.
    pub fn cached_last_price(&self) -> Option<f64> {
        let cache = self.price_cache.lock().ok()?;
        cache.get(&self.subscription.qualified_name())
    }

    // --- SUBSCRIPTION LIFECYCLE ---

    /// Switches identity. A theme-only change keeps the series and rebuilds
    /// the surface; anything else tears everything down and refetches.
    pub fn subscribe(&mut self, subscription: Subscription) {
        if subscription == self.subscription {
            return;
        }
        if subscription.same_source(&self.subscription) {
            self.subscription = subscription;
            self.destroy_surface();
            self.bump_layout();
            return;
        }
        self.teardown();
        self.subscription = subscription;
        self.start_load();
    }

    /// Drops the surface, cancels polling, orphans any in-flight fetch and
    /// clears every derived layer.
    pub fn teardown(&mut self) {
        self.destroy_surface();
        self.poll.cancel();
        self.fetch = None;
        self.token = self.token.next();
        self.refreshing = false;
        self.series = Arc::new(Series::empty());
        self.sma_fast.clear();
        self.sma_slow.clear();
        self.profile = None;
        self.markers = MarkerLayer::default();
        self.popup = None;
        self.tooltip = Tooltip::Hidden;
        self.viewport.reset();
        self.load_state = LoadState::Idle;
        self.bump_layout();
    }

    /// Begins a foreground load. Invalid symbols fail at once without a fetch.
    pub fn start_load(&mut self) {
        if !self.subscription.has_valid_symbol() {
            log::warn!("Not fetching {}: symbol is not chartable", self.subscription);
            self.load_state = LoadState::Failed(ChartError::SymbolInvalid(self.subscription.symbol.clone()));
            return;
        }
        self.load_state = LoadState::Loading;
        self.spawn_fetch(false);
    }

    pub fn retry(&mut self) {
        if self.load_state.error().is_some_and(ChartError::is_retryable) {
            self.start_load();
        }
    }

    fn spawn_fetch(&mut self, is_refresh: bool) {
        self.token = self.token.next();
        self.refreshing = is_refresh;

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_fetch_lifecycle {
            log::debug!(
                "Fetch {:?} for {} ({})",
                self.token,
                self.subscription,
                if is_refresh { "poll" } else { "load" }
            );
        }

        let request = FetchRequest {
            token: self.token,
            history: HistoryRequest::lookback(self.subscription.clone(), CHART.history_lookback_days),
            sources: Arc::clone(&self.sources),
            price_cache: Arc::clone(&self.price_cache),
            is_refresh,
        };
        self.fetch = Some(worker::spawn_fetch(request));
    }

    /// THE FRAME TICK.
    /// Collects a finished fetch and fires the poll timer. Returns true while
    /// a fetch is in flight so the UI keeps repainting.
    pub fn update(&mut self, at: AppInstant) -> bool {
        if let Some(promise) = self.fetch.take() {
            match promise.try_take() {
                Ok(result) => self.handle_fetch_result(result, at),
                Err(pending) => self.fetch = Some(pending),
            }
        }

        if self.fetch.is_none() && self.load_state == LoadState::Ready && self.poll.fire_if_due(at) {
            self.spawn_fetch(true);
        }

        self.fetch.is_some()
    }

    /// Time until the next poll, for scheduling a wake-up.
    pub fn next_poll_in(&self, at: AppInstant) -> Option<Duration> {
        self.poll.remaining(at)
    }

    /// Applies a fetch outcome. Results carrying any token but the newest are
    /// stale (an older subscription or superseded load) and are dropped.
    pub fn handle_fetch_result(&mut self, result: FetchResult, at: AppInstant) {
        if result.token != self.token {
            #[cfg(debug_assertions)]
            if DEBUG_FLAGS.print_fetch_lifecycle {
                log::debug!("Discarding stale fetch {:?} (current {:?})", result.token, self.token);
            }
            return;
        }
        self.fetch = None;
        self.refreshing = false;

        match result.result {
            Ok(series) => {
                log::info!(
                    "Loaded {} bars for {} from {} in {}ms",
                    series.len(),
                    self.subscription,
                    result.source.unwrap_or("unknown source"),
                    result.duration_ms
                );
                self.last_source = result.source;
                self.apply_series(series, !result.is_refresh);
                self.poll.arm(at);
            }
            Err(e) if result.is_refresh => {
                log::warn!("Poll refresh for {} failed: {}", self.subscription, e);
                self.poll.arm(at);
            }
            Err(e) => {
                log::warn!("Load for {} failed: {}", self.subscription, e);
                self.load_state = LoadState::Failed(e);
            }
        }
    }

    /// Replaces the series and rebuilds every derived layer from scratch.
    fn apply_series(&mut self, series: Arc<Series>, fresh_load: bool) {
        self.destroy_surface();
        self.series = series;
        self.sma_fast.recompute(&self.series);
        self.sma_slow.recompute(&self.series);
        self.markers = MarkerLayer::bind(&self.series, &self.events, self.target_date);
        self.viewport.rebase(&self.series);
        self.popup = None;
        self.tooltip = Tooltip::Hidden;

        if fresh_load {
            if let Some(target) = self.target_date {
                self.viewport.focus(&self.series, target);
            }
        }
        self.focus_pending_highlight();

        self.load_state = LoadState::Ready;
        self.on_viewport_changed();
    }

    // --- EMBEDDING-PAGE INPUTS ---

    pub fn set_events(&mut self, events: Vec<Event>) {
        self.events = events;
        self.popup = None;
        self.markers = MarkerLayer::bind(&self.series, &self.events, self.target_date);
        self.bump_layout();
    }

    /// Focuses the date once data is in; adds the highlight marker.
    pub fn set_target_date(&mut self, target: Option<NaiveDate>) {
        self.target_date = target;
        self.markers = MarkerLayer::bind(&self.series, &self.events, self.target_date);
        if let Some(day) = target {
            self.focus_date(day);
        }
        self.bump_layout();
    }

    /// Focuses on the event's day and opens its popup at that bar.
    pub fn highlight_event(&mut self, id: impl Into<String>) {
        self.pending_highlight = Some(id.into());
        if self.load_state == LoadState::Ready {
            self.focus_pending_highlight();
            self.on_viewport_changed();
        }
    }

    fn focus_pending_highlight(&mut self) {
        let Some(day) = self.pending_highlight_event().map(|(_, e)| e.day()) else {
            return;
        };
        if !self.viewport.focus(&self.series, day) {
            // No bar that day: nothing to anchor to
            self.pending_highlight = None;
        }
    }

    fn pending_highlight_event(&self) -> Option<(usize, &Event)> {
        let id = self.pending_highlight.as_deref()?;
        self.events
            .iter()
            .enumerate()
            .find(|(_, e)| e.id.as_deref() == Some(id))
    }

    // --- VIEWPORT ---

    pub fn select_range(&mut self, range: RangeKey) {
        if self.viewport.select_range(&self.series, range).is_some() {
            self.on_viewport_changed();
        }
    }

    /// `false` (and no change) when no bar sits on `day`.
    pub fn focus_date(&mut self, day: NaiveDate) -> bool {
        let focused = self.viewport.focus(&self.series, day);
        if focused {
            self.on_viewport_changed();
        }
        focused
    }

    fn on_viewport_changed(&mut self) {
        self.recompute_profile();
        self.tooltip = Tooltip::Hidden;
        self.bump_layout();
    }

    // --- OVERLAYS ---

    pub fn set_volume_visible(&mut self, visible: bool) {
        if self.overlays.volume != visible {
            self.overlays.volume = visible;
            self.bump_layout();
        }
    }

    pub fn set_volume_profile_visible(&mut self, visible: bool) {
        if self.overlays.volume_profile != visible {
            self.overlays.volume_profile = visible;
            self.recompute_profile();
            self.bump_layout();
        }
    }

    pub fn set_sma_fast_visible(&mut self, visible: bool) {
        self.sma_fast.visible = visible;
        self.bump_layout();
    }

    pub fn set_sma_slow_visible(&mut self, visible: bool) {
        self.sma_slow.visible = visible;
        self.bump_layout();
    }

    pub fn toggle_fullscreen(&mut self) {
        self.fullscreen = !self.fullscreen;
    }

    fn recompute_profile(&mut self) {
        self.profile = match (self.overlays.volume_profile, self.viewport.viewport()) {
            (true, Some(vp)) => VolumeProfile::compute(
                &self.series,
                vp.from,
                vp.to,
                CHART.volume_profile.bin_count,
            ),
            _ => None,
        };
    }

    // --- SURFACE ---

    fn bump_layout(&mut self) {
        self.layout_generation = self.layout_generation.wrapping_add(1);
    }

    fn destroy_surface(&mut self) {
        self.surface = None;
        self.surface_error = None;
    }

    /// Makes sure a surface matching `container` exists and its pixel caches
    /// are current. A bad container is swallowed into `surface_error` and
    /// leaves the load state alone.
    pub fn prepare_surface(&mut self, container: Rect) -> Option<&Surface> {
        let stale = self
            .surface
            .as_ref()
            .is_none_or(|s| s.is_stale(&self.subscription, container, self.layout_generation));

        if stale {
            match Surface::create(&self.subscription, container, self.layout_generation) {
                Ok(mut surface) => {
                    self.fill_surface(&mut surface);
                    self.surface = Some(surface);
                    self.surface_error = None;
                    self.anchor_pending_highlight();
                }
                Err(e) => {
                    if self.surface_error.as_ref() != Some(&e) {
                        log::warn!("{}", e);
                    }
                    self.surface = None;
                    self.surface_error = Some(e);
                }
            }
        }
        self.surface.as_ref()
    }

    fn fill_surface(&self, surface: &mut Surface) {
        let Some(viewport) = self.viewport.viewport() else {
            return;
        };
        let extra: Vec<f64> = [&self.sma_fast, &self.sma_slow]
            .into_iter()
            .filter(|o| o.is_drawable())
            .flat_map(|o| o.points().iter())
            .filter(|p| viewport.contains(p.time))
            .map(|p| p.value)
            .collect();

        let Some(mapper) = CoordinateMapper::new(surface.container(), &self.series, viewport, extra) else {
            return;
        };
        if let Some(profile) = &self.profile {
            surface.profile_layout = profile.layout(
                |p| mapper.price_to_y(p),
                mapper.plot_rect(),
                CHART.volume_profile.max_width_fraction,
                CHART.volume_profile.bin_gap_px,
            );
        }
        surface.marker_points = self.markers.positions(&self.series, &mapper);
        surface.mapper = Some(mapper);
    }

    fn anchor_pending_highlight(&mut self) {
        let Some((event_index, day)) = self.pending_highlight_event().map(|(i, e)| (i, e.day())) else {
            return;
        };
        let Some(mapper) = self.surface.as_ref().and_then(|s| s.mapper.as_ref()) else {
            return;
        };
        let anchor = self.series.index_of(day).and_then(|i| {
            let bar = self.series.get(i)?;
            Some(pos2(mapper.index_to_x(i)?, mapper.price_to_y(bar.close)?))
        });
        if let Some(anchor) = anchor {
            self.popup = Some(PopupState { event_index, anchor });
        }
        self.pending_highlight = None;
    }

    // --- POINTER (synchronous, cache-only) ---

    pub fn pointer_move(&mut self, pointer: Pos2) {
        self.tooltip = match self.surface.as_ref().and_then(|s| s.mapper.as_ref().map(|m| (s, m))) {
            Some((surface, mapper)) => {
                let profile = (self.overlays.volume_profile && !surface.profile_layout.is_empty())
                    .then_some(&surface.profile_layout);
                tooltip::resolve(&self.series, mapper, profile, pointer, self.overlays.volume)
            }
            None => Tooltip::Hidden,
        };
    }

    pub fn pointer_leave(&mut self) {
        self.tooltip = Tooltip::Hidden;
    }

    /// Opens the popup for an event bar under the click; any other click closes it.
    pub fn click(&mut self, pointer: Pos2) {
        let hit = self
            .surface
            .as_ref()
            .and_then(|s| s.mapper.as_ref())
            .and_then(|mapper| self.markers.event_at(mapper, pointer));

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_ui_interactions {
            log::debug!("Chart click at {:?} -> event {:?}", pointer, hit);
        }

        self.popup = hit.map(|event_index| PopupState {
            event_index,
            anchor: pointer,
        });
    }

    pub fn close_popup(&mut self) {
        self.popup = None;
    }

    /// Manual refresh from the UI.
    pub fn refresh_now(&mut self) {
        if self.load_state == LoadState::Ready && self.fetch.is_none() {
            self.spawn_fetch(true);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use chrono::NaiveDateTime;
    use eframe::egui::pos2;

    use crate::data::{BarSource, LastPriceCache};
    use crate::domain::{Bar, EventCategory, Exchange, Theme};
    use crate::utils::app_time::now;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, d).unwrap()
    }

    fn series(days: &[u32]) -> Arc<Series> {
        let bars = days
            .iter()
            .map(|&d| Bar::new(day(d), 100.0, 110.0, 90.0, 105.0, 1_000.0))
            .collect();
        Arc::new(Series::from_canonical(bars))
    }

    fn controller(symbol: &str) -> ChartController {
        let sources: SharedSources = Arc::from(Vec::<Box<dyn BarSource>>::new());
        let cache = Arc::new(Mutex::new(LastPriceCache::new(Duration::from_secs(60), 8)));
        ChartController::new(
            Subscription::new(symbol, Exchange::Bse, Theme::Dark),
            sources,
            cache,
            Duration::from_secs(60),
        )
    }

    fn ok(token: RequestToken, series: Arc<Series>, is_refresh: bool) -> FetchResult {
        FetchResult {
            token,
            is_refresh,
            duration_ms: 1,
            source: Some("test"),
            result: Ok(series),
        }
    }

    fn event(id: &str, d: u32) -> Event {
        Event {
            id: Some(id.into()),
            time: NaiveDateTime::new(day(d), chrono::NaiveTime::MIN),
            category_label: "Result".into(),
            category: EventCategory::Result,
            headline: format!("event {id}"),
            summary: None,
            pdf_url: None,
        }
    }

    fn container() -> Rect {
        Rect::from_min_max(pos2(0.0, 0.0), pos2(600.0, 300.0))
    }

    fn loaded(days: &[u32]) -> ChartController {
        let mut chart = controller("TCS");
        chart.start_load();
        let token = chart.current_token();
        chart.handle_fetch_result(ok(token, series(days), false), now());
        chart
    }

    #[test]
    fn stale_token_is_discarded() {
        let mut chart = controller("TCS");
        chart.start_load();
        let first = chart.current_token();

        chart.subscribe(Subscription::new("INFY", Exchange::Bse, Theme::Dark));
        assert!(chart.load_state().is_loading());
        let second = chart.current_token();
        assert!(second > first);

        chart.handle_fetch_result(ok(first, series(&[1, 2, 3]), false), now());
        assert!(chart.load_state().is_loading());
        assert!(chart.series().is_empty());

        chart.handle_fetch_result(ok(second, series(&[1, 2]), false), now());
        assert_eq!(*chart.load_state(), LoadState::Ready);
        assert_eq!(chart.series().len(), 2);
    }

    #[test]
    fn invalid_symbol_fails_without_retry() {
        let mut chart = controller("500325");
        chart.start_load();
        let err = chart.load_state().error().cloned().unwrap();
        assert!(matches!(err, ChartError::SymbolInvalid(_)));
        let token = chart.current_token();
        chart.retry();
        assert_eq!(chart.current_token(), token);
        assert!(err.external_viewer_url(chart.subscription()).is_some());
    }

    #[test]
    fn failed_load_is_retryable_and_refresh_failure_keeps_chart() {
        let mut chart = controller("TCS");
        chart.start_load();
        let token = chart.current_token();
        chart.handle_fetch_result(
            FetchResult {
                token,
                is_refresh: false,
                duration_ms: 1,
                source: None,
                result: Err(ChartError::DataEmpty),
            },
            now(),
        );
        assert_eq!(chart.load_state().error(), Some(&ChartError::DataEmpty));
        chart.retry();
        assert!(chart.load_state().is_loading());

        let token = chart.current_token();
        chart.handle_fetch_result(ok(token, series(&[1, 2, 3]), false), now());
        chart.refresh_now();
        let token = chart.current_token();
        chart.handle_fetch_result(
            FetchResult {
                token,
                is_refresh: true,
                duration_ms: 1,
                source: None,
                result: Err(ChartError::DataFetch("timeout".into())),
            },
            now(),
        );
        assert_eq!(*chart.load_state(), LoadState::Ready);
        assert_eq!(chart.series().len(), 3);
    }

    #[test]
    fn subscription_change_tears_down_theme_change_keeps_data() {
        let mut chart = loaded(&[1, 2, 3]);
        chart.set_events(vec![event("a", 2)]);
        assert!(chart.prepare_surface(container()).is_some());
        assert_eq!(chart.markers().markers().len(), 1);

        chart.subscribe(Subscription::new("TCS", Exchange::Bse, Theme::Light));
        assert!(chart.surface().is_none());
        assert_eq!(chart.series().len(), 3);
        assert_eq!(*chart.load_state(), LoadState::Ready);

        chart.subscribe(Subscription::new("TCS", Exchange::Nse, Theme::Light));
        assert!(chart.surface().is_none());
        assert!(chart.series().is_empty());
        assert!(chart.markers().is_empty());
        assert_eq!(chart.viewport(), None);
        assert!(chart.load_state().is_loading());
    }

    #[test]
    fn bad_container_is_swallowed() {
        let mut chart = loaded(&[1, 2, 3]);
        let zero = Rect::from_min_max(pos2(0.0, 0.0), pos2(0.0, 0.0));
        assert!(chart.prepare_surface(zero).is_none());
        assert!(matches!(chart.surface_error(), Some(ChartError::RenderSurface(_))));
        assert_eq!(*chart.load_state(), LoadState::Ready);

        assert!(chart.prepare_surface(container()).is_some());
        assert!(chart.surface_error().is_none());
    }

    #[test]
    fn resize_rebuilds_pixel_caches() {
        let mut chart = loaded(&[1, 2, 3]);
        let small = chart.prepare_surface(container()).unwrap().mapper.clone().unwrap();
        let wide = Rect::from_min_max(pos2(0.0, 0.0), pos2(1200.0, 300.0));
        let big = chart.prepare_surface(wide).unwrap().mapper.clone().unwrap();
        assert_ne!(small.time_to_x(day(3)), big.time_to_x(day(3)));
    }

    #[test]
    fn click_opens_and_closes_popup() {
        let mut chart = loaded(&[1, 2, 3]);
        chart.set_events(vec![event("a", 2), event("gone", 9)]);
        chart.prepare_surface(container());

        // Three bars over 600px: day 2 is x in [200, 400)
        chart.click(pos2(300.0, 150.0));
        let (event, rect) = chart.popup().unwrap();
        assert_eq!(event.id.as_deref(), Some("a"));
        assert!(container().contains_rect(rect));

        chart.click(pos2(50.0, 150.0));
        assert!(chart.popup().is_none());
    }

    #[test]
    fn unmatched_event_focus_is_noop() {
        let mut chart = loaded(&[1, 2, 3, 5]);
        chart.set_events(vec![event("gone", 4)]);
        let before = chart.viewport_state();
        chart.highlight_event("gone");
        assert_eq!(chart.viewport_state(), before);
        assert!(!chart.focus_date(day(4)));
        chart.prepare_surface(container());
        assert!(chart.popup().is_none());
    }

    #[test]
    fn highlighted_event_focuses_and_opens_popup() {
        let mut chart = controller("TCS");
        chart.set_events(vec![event("x", 3)]);
        chart.highlight_event("x");
        chart.start_load();
        let token = chart.current_token();
        chart.handle_fetch_result(ok(token, series(&[1, 2, 3, 5]), false), now());

        assert!(matches!(chart.viewport_state(), ViewportState::Focused { target, .. } if target == day(3)));
        chart.prepare_surface(container());
        let (event, _) = chart.popup().unwrap();
        assert_eq!(event.id.as_deref(), Some("x"));
    }

    #[test]
    fn target_date_set_before_load_focuses_and_marks_bar() {
        let mut chart = controller("TCS");
        chart.set_target_date(Some(day(3)));
        assert!(chart.markers().is_empty());

        chart.start_load();
        let token = chart.current_token();
        chart.handle_fetch_result(ok(token, series(&[1, 2, 3, 5]), false), now());

        assert!(matches!(chart.viewport_state(), ViewportState::Focused { target, .. } if target == day(3)));
        let marker = chart.markers().at_bar(2).unwrap();
        assert!(marker.is_target());
        assert_eq!(marker.style, EventCategory::Other.style());
        assert_eq!(marker.style.glyph, 'A');
    }

    #[test]
    fn target_date_without_bar_changes_nothing() {
        let mut chart = loaded(&[1, 2, 3, 5]);
        let before = chart.viewport_state();
        chart.set_target_date(Some(day(4)));
        assert_eq!(chart.viewport_state(), before);
        assert!(chart.markers().is_empty());

        let mut fresh = controller("TCS");
        fresh.set_target_date(Some(day(4)));
        fresh.start_load();
        let token = fresh.current_token();
        fresh.handle_fetch_result(ok(token, series(&[1, 2, 3, 5]), false), now());
        assert!(!matches!(fresh.viewport_state(), ViewportState::Focused { .. }));
        assert!(fresh.markers().is_empty());
    }

    #[test]
    fn pointer_leave_hides_tooltip() {
        let mut chart = loaded(&[1, 2, 3]);
        chart.prepare_surface(container());

        chart.pointer_move(pos2(300.0, 150.0));
        assert!(matches!(chart.tooltip(), Tooltip::Bar(bar) if bar.day == day(2)));

        chart.pointer_leave();
        assert_eq!(*chart.tooltip(), Tooltip::Hidden);
    }

    #[test]
    fn volume_profile_follows_viewport() {
        let days: Vec<u32> = (1..=20).collect();
        let mut chart = loaded(&days);
        assert!(chart.profile().is_none());
        chart.set_volume_profile_visible(true);
        assert_eq!(chart.profile().unwrap().bar_count, 20);
        chart.select_range(RangeKey::W1);
        assert_eq!(chart.profile().unwrap().bar_count, 7);
        chart.set_volume_profile_visible(false);
        assert!(chart.profile().is_none());
    }

    #[test]
    fn poll_fires_only_when_ready_and_stops_on_teardown() {
        let t0 = now();
        let mut chart = controller("TCS");
        chart.start_load();
        let token = chart.current_token();
        chart.handle_fetch_result(ok(token, series(&[1, 2]), false), t0);

        chart.update(t0 + Duration::from_secs(61));
        assert!(chart.is_refreshing());
        assert!(chart.current_token() > token);

        chart.teardown();
        assert!(chart.next_poll_in(t0).is_none());
        assert!(!chart.update(t0 + Duration::from_secs(200)));
    }
}
