use std::time::Duration;

use eframe::egui::{Context, Key, ViewportCommand};
use eframe::{Frame, Storage};
use serde::{Deserialize, Serialize};

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::domain::Theme;
use crate::engine::{ChartController, ChartStyle, RangeKey};
use crate::ui::ui_panels::ControlEvent;
use crate::ui::utils::setup_custom_visuals;
use crate::utils::app_time::now;

/// Display preferences that survive restarts. Nothing about the data is
/// persisted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UiPrefs {
    pub theme: Theme,
    pub style: ChartStyle,
    pub range: RangeKey,
    pub show_volume: bool,
    pub show_volume_profile: bool,
    pub show_sma_fast: bool,
    pub show_sma_slow: bool,
}

impl UiPrefs {
    /// Persisted preferences, or defaults when none are stored.
    pub fn load(storage: Option<&dyn Storage>) -> Self {
        match storage.and_then(|s| eframe::get_value::<UiPrefs>(s, eframe::APP_KEY)) {
            Some(prefs) => {
                #[cfg(debug_assertions)]
                if DEBUG_FLAGS.print_ui_interactions {
                    log::info!("Loaded persisted display preferences: {:?}", prefs);
                }
                prefs
            }
            None => Self::default(),
        }
    }

    /// Command-line choices win over stored ones.
    pub fn with_overrides(mut self, theme: Option<Theme>, style: Option<ChartStyle>) -> Self {
        if let Some(theme) = theme {
            self.theme = theme;
        }
        if let Some(style) = style {
            self.style = style;
        }
        self
    }
}

pub struct ChartApp {
    pub(super) controller: ChartController,
    pub(super) prefs: UiPrefs,
    /// Fullscreen state last sent to the window
    applied_fullscreen: bool,
}

impl ChartApp {
    /// Applies the stored preferences and starts the first load.
    pub fn new(mut controller: ChartController, prefs: UiPrefs) -> Self {
        controller.style = prefs.style;
        controller.select_range(prefs.range);
        controller.set_volume_visible(prefs.show_volume);
        controller.set_volume_profile_visible(prefs.show_volume_profile);
        controller.set_sma_fast_visible(prefs.show_sma_fast);
        controller.set_sma_slow_visible(prefs.show_sma_slow);
        controller.start_load();

        Self {
            controller,
            prefs,
            applied_fullscreen: false,
        }
    }

    pub fn controller(&self) -> &ChartController {
        &self.controller
    }

    pub fn prefs(&self) -> UiPrefs {
        self.prefs
    }

    /// Routes one controls-bar event to the controller and mirrors the
    /// display choice into the persisted preferences.
    pub fn handle_control_event(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::SelectRange(range) => {
                self.prefs.range = range;
                self.controller.select_range(range);
            }
            ControlEvent::SetStyle(style) => {
                self.prefs.style = style;
                self.controller.style = style;
            }
            ControlEvent::SetVolume(on) => {
                self.prefs.show_volume = on;
                self.controller.set_volume_visible(on);
            }
            ControlEvent::SetVolumeProfile(on) => {
                self.prefs.show_volume_profile = on;
                self.controller.set_volume_profile_visible(on);
            }
            ControlEvent::SetSmaFast(on) => {
                self.prefs.show_sma_fast = on;
                self.controller.set_sma_fast_visible(on);
            }
            ControlEvent::SetSmaSlow(on) => {
                self.prefs.show_sma_slow = on;
                self.controller.set_sma_slow_visible(on);
            }
            ControlEvent::SetTheme(theme) => {
                self.prefs.theme = theme;
                let mut subscription = self.controller.subscription().clone();
                subscription.theme = theme;
                self.controller.subscribe(subscription);
            }
            ControlEvent::ToggleFullscreen => self.controller.toggle_fullscreen(),
            ControlEvent::Refresh => self.controller.refresh_now(),
        }
    }

    fn handle_global_shortcuts(&mut self, ctx: &Context) {
        if ctx.input(|i| i.key_pressed(Key::Escape)) {
            self.handle_escape();
        }
    }

    /// One press undoes one thing: the open popup first, then fullscreen.
    pub fn handle_escape(&mut self) {
        if self.controller.popup().is_some() {
            self.controller.close_popup();
            return;
        }
        if self.controller.fullscreen {
            self.controller.toggle_fullscreen();
        }
    }

    fn sync_fullscreen(&mut self, ctx: &Context) {
        if self.controller.fullscreen != self.applied_fullscreen {
            self.applied_fullscreen = self.controller.fullscreen;
            ctx.send_viewport_cmd(ViewportCommand::Fullscreen(self.applied_fullscreen));
        }
    }

    /// Keeps frames coming while a fetch runs, and wakes up for the next poll.
    fn schedule_repaint(&self, ctx: &Context, fetching: bool) {
        if fetching {
            ctx.request_repaint_after(Duration::from_millis(50));
        } else if let Some(wait) = self.controller.next_poll_in(now()) {
            ctx.request_repaint_after(wait);
        }
    }
}

impl eframe::App for ChartApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        // Drop the surface, stop polling and orphan any in-flight fetch
        self.controller.teardown();
        log::info!("Chart for {} closed.", self.controller.subscription());
    }

    fn save(&mut self, storage: &mut dyn Storage) {
        eframe::set_value(storage, eframe::APP_KEY, &self.prefs);
    }

    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        setup_custom_visuals(ctx, self.controller.subscription().theme);

        let fetching = self.controller.update(now());

        self.handle_global_shortcuts(ctx);
        self.sync_fullscreen(ctx);

        self.render_controls_panel(ctx);
        if !self.controller.fullscreen {
            self.render_footer_panel(ctx);
        }
        self.render_central_panel(ctx);

        self.schedule_repaint(ctx, fetching);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
    use eframe::egui::{Rect, pos2};

    use crate::data::{BarSource, LastPriceCache};
    use crate::domain::{Bar, Event, EventCategory, Exchange, Subscription};
    use crate::engine::SharedSources;
    use crate::engine::messages::FetchResult;
    use crate::models::Series;

    fn app(prefs: UiPrefs) -> ChartApp {
        let sources: SharedSources = Arc::from(Vec::<Box<dyn BarSource>>::new());
        let cache = Arc::new(Mutex::new(LastPriceCache::new(Duration::from_secs(60), 4)));
        let controller = ChartController::new(
            Subscription::new("TCS", Exchange::Bse, prefs.theme),
            sources,
            cache,
            Duration::ZERO,
        );
        ChartApp::new(controller, prefs)
    }

    #[test]
    fn overrides_beat_stored_prefs() {
        let stored = UiPrefs {
            theme: Theme::Light,
            style: ChartStyle::Line,
            ..UiPrefs::default()
        };
        let merged = stored.with_overrides(None, Some(ChartStyle::Candle));
        assert_eq!(merged.theme, Theme::Light);
        assert_eq!(merged.style, ChartStyle::Candle);
        assert_eq!(UiPrefs::load(None), UiPrefs::default());
    }

    #[test]
    fn defaults_start_with_overlays_off() {
        let prefs = UiPrefs::default();
        assert_eq!(prefs.range, RangeKey::M1);
        assert_eq!(prefs.style, ChartStyle::Area);
        assert!(!prefs.show_volume && !prefs.show_volume_profile);
        assert!(!prefs.show_sma_fast && !prefs.show_sma_slow);
    }

    #[test]
    fn control_events_reach_controller_and_prefs() {
        let mut app = app(UiPrefs::default());
        assert!(app.controller().load_state().is_loading());

        app.handle_control_event(ControlEvent::SetStyle(ChartStyle::Candle));
        app.handle_control_event(ControlEvent::SetVolume(true));
        app.handle_control_event(ControlEvent::SelectRange(RangeKey::W1));
        assert_eq!(app.controller().style, ChartStyle::Candle);
        assert!(app.controller().overlays().volume);
        assert_eq!(app.prefs().range, RangeKey::W1);

        app.handle_control_event(ControlEvent::SetTheme(Theme::Light));
        assert_eq!(app.controller().subscription().theme, Theme::Light);
        assert_eq!(app.prefs().theme, Theme::Light);

        app.handle_control_event(ControlEvent::ToggleFullscreen);
        assert!(app.controller().fullscreen);
    }

    #[test]
    fn escape_closes_popup_before_leaving_fullscreen() {
        let mut app = app(UiPrefs::default());
        let day = NaiveDate::from_ymd_opt(2024, 8, 2).unwrap();
        app.controller.set_events(vec![Event {
            id: Some("e1".into()),
            time: NaiveDateTime::new(day, NaiveTime::MIN),
            category_label: "Dividend".into(),
            category: EventCategory::Dividend,
            headline: "Interim dividend".into(),
            summary: None,
            pdf_url: None,
        }]);
        let token = app.controller.current_token();
        let bars = (1..=3)
            .map(|d| Bar::new(NaiveDate::from_ymd_opt(2024, 8, d).unwrap(), 10.0, 12.0, 9.0, 11.0, 5.0))
            .collect();
        app.controller.handle_fetch_result(
            FetchResult {
                token,
                is_refresh: false,
                duration_ms: 1,
                source: Some("test"),
                result: Ok(Arc::new(Series::from_canonical(bars))),
            },
            now(),
        );
        app.controller.prepare_surface(Rect::from_min_max(pos2(0.0, 0.0), pos2(600.0, 300.0)));
        app.controller.click(pos2(300.0, 150.0));
        app.handle_control_event(ControlEvent::ToggleFullscreen);
        assert!(app.controller().popup().is_some());

        app.handle_escape();
        assert!(app.controller().popup().is_none());
        assert!(app.controller().fullscreen);

        app.handle_escape();
        assert!(!app.controller().fullscreen);
    }
}
