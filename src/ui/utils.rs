use eframe::egui::{Color32, Context, Visuals};

use crate::config::PLOT_COLORS;
use crate::config::plot::ThemeColors;
use crate::domain::{MarkerStyle, Theme};
use crate::ui::config::UI_CONFIG;

pub fn theme_colors(theme: Theme) -> &'static ThemeColors {
    match theme {
        Theme::Dark => &PLOT_COLORS.dark,
        Theme::Light => &PLOT_COLORS.light,
    }
}

pub fn marker_color(style: MarkerStyle) -> Color32 {
    let [r, g, b] = style.rgb;
    Color32::from_rgb(r, g, b)
}

/// Sets up custom visuals for the entire application
pub fn setup_custom_visuals(ctx: &Context, theme: Theme) {
    let colors = theme_colors(theme);
    let mut visuals = match theme {
        Theme::Dark => Visuals::dark(),
        Theme::Light => Visuals::light(),
    };

    visuals.window_fill = colors.background;
    visuals.panel_fill = colors.background;
    visuals.extreme_bg_color = colors.background;
    visuals.widgets.noninteractive.bg_stroke.color = colors.border;

    visuals.widgets.noninteractive.fg_stroke.color = colors.text;
    visuals.widgets.inactive.fg_stroke.color = colors.text;
    visuals.widgets.hovered.fg_stroke.color = UI_CONFIG.colors.accent;
    visuals.widgets.active.fg_stroke.color = UI_CONFIG.colors.accent;
    visuals.hyperlink_color = UI_CONFIG.colors.accent;

    ctx.set_visuals(visuals);
}
