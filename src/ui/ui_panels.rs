use eframe::egui::{RichText, Ui};
use strum::IntoEnumIterator;

use crate::config::PLOT_COLORS;
use crate::domain::Theme;
use crate::engine::{ChartStyle, OverlayToggles, RangeKey};
use crate::ui::config::{UI_CONFIG, UI_TEXT};
use crate::ui::styles::UiStyleExt;
use crate::utils::format_inr;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// Trait for UI panels that can be rendered
pub trait Panel {
    type Event;
    fn render(&mut self, ui: &mut Ui) -> Vec<Self::Event>;
}

/// What the controls bar asks the app to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ControlEvent {
    SelectRange(RangeKey),
    SetStyle(ChartStyle),
    SetVolume(bool),
    SetVolumeProfile(bool),
    SetSmaFast(bool),
    SetSmaSlow(bool),
    SetTheme(Theme),
    ToggleFullscreen,
    Refresh,
}

/// Snapshot of one SMA toggle for the panel.
#[derive(Debug, Clone, Copy)]
pub struct SmaToggle {
    pub period: usize,
    pub visible: bool,
}

/// The fixed bar above the chart: range ladder, style toggle, overlays,
/// theme and layout.
pub struct ControlsPanel {
    pub symbol: String,
    pub active_range: Option<RangeKey>,
    pub style: ChartStyle,
    pub overlays: OverlayToggles,
    pub sma_fast: SmaToggle,
    pub sma_slow: SmaToggle,
    pub theme: Theme,
    pub fullscreen: bool,
    pub last_price: Option<f64>,
    pub can_refresh: bool,
    pub refreshing: bool,
}

impl ControlsPanel {
    fn render_range_ladder(&self, ui: &mut Ui, events: &mut Vec<ControlEvent>) {
        ui.label_header(UI_TEXT.range_heading);
        for range in RangeKey::iter() {
            if ui.chip(self.active_range == Some(range), range.label()).clicked() {
                events.push(ControlEvent::SelectRange(range));
            }
        }
    }

    fn render_style_toggle(&self, ui: &mut Ui, events: &mut Vec<ControlEvent>) {
        ui.label_header(UI_TEXT.style_heading);
        for style in ChartStyle::iter() {
            if ui.chip(self.style == style, style.label()).clicked() && style != self.style {
                events.push(ControlEvent::SetStyle(style));
            }
        }
    }

    fn render_overlay_toggles(&self, ui: &mut Ui, events: &mut Vec<ControlEvent>) {
        ui.label_header(UI_TEXT.overlays_heading);

        let mut volume = self.overlays.volume;
        if ui.checkbox(&mut volume, UI_TEXT.label_volume).changed() {
            events.push(ControlEvent::SetVolume(volume));
        }

        let mut profile = self.overlays.volume_profile;
        if ui.checkbox(&mut profile, UI_TEXT.label_volume_profile).changed() {
            events.push(ControlEvent::SetVolumeProfile(profile));
        }

        let mut fast = self.sma_fast.visible;
        let fast_label = RichText::new(format!("{} {}", UI_TEXT.label_sma_prefix, self.sma_fast.period))
            .color(PLOT_COLORS.sma_fast);
        if ui.checkbox(&mut fast, fast_label).changed() {
            events.push(ControlEvent::SetSmaFast(fast));
        }

        let mut slow = self.sma_slow.visible;
        let slow_label = RichText::new(format!("{} {}", UI_TEXT.label_sma_prefix, self.sma_slow.period))
            .color(PLOT_COLORS.sma_slow);
        if ui.checkbox(&mut slow, slow_label).changed() {
            events.push(ControlEvent::SetSmaSlow(slow));
        }
    }

    fn render_layout_controls(&self, ui: &mut Ui, events: &mut Vec<ControlEvent>) {
        let next_theme = match self.theme {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        };
        let theme_label = match next_theme {
            Theme::Dark => UI_TEXT.label_theme_dark,
            Theme::Light => UI_TEXT.label_theme_light,
        };
        if ui.small_button(theme_label).clicked() {
            events.push(ControlEvent::SetTheme(next_theme));
        }

        let fullscreen_label = if self.fullscreen {
            UI_TEXT.button_windowed
        } else {
            UI_TEXT.button_fullscreen
        };
        if ui.small_button(fullscreen_label).clicked() {
            events.push(ControlEvent::ToggleFullscreen);
        }

        let refresh = ui.add_enabled(
            self.can_refresh && !self.refreshing,
            eframe::egui::Button::new(UI_TEXT.button_refresh).small(),
        );
        if refresh.clicked() {
            events.push(ControlEvent::Refresh);
        }
        if self.refreshing {
            ui.label_warning(UI_TEXT.refreshing);
        }
    }
}

impl Panel for ControlsPanel {
    type Event = ControlEvent;

    fn render(&mut self, ui: &mut Ui) -> Vec<ControlEvent> {
        let mut events = Vec::new();

        ui.horizontal_wrapped(|ui| {
            ui.label(RichText::new(&self.symbol).strong().monospace());
            if let Some(price) = self.last_price {
                ui.metric(UI_TEXT.label_last_price, &format_inr(price), UI_CONFIG.colors.accent);
            }
            ui.add_space(UI_CONFIG.group_spacing);

            self.render_range_ladder(ui, &mut events);
            ui.add_space(UI_CONFIG.group_spacing);
            self.render_style_toggle(ui, &mut events);
            ui.add_space(UI_CONFIG.group_spacing);
            self.render_overlay_toggles(ui, &mut events);
            ui.add_space(UI_CONFIG.group_spacing);
            self.render_layout_controls(ui, &mut events);
        });

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_ui_interactions {
            for event in &events {
                log::debug!("Controls: {:?}", event);
            }
        }

        events
    }
}
