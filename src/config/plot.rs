//! Plot visualization colours

use eframe::egui::Color32;

pub struct ThemeColors {
    pub background: Color32,
    pub text: Color32,
    pub grid: Color32,
    pub border: Color32,
    pub crosshair: Color32,
}

pub struct PlotColors {
    pub dark: ThemeColors,
    pub light: ThemeColors,
    /// Primary series line / area stroke
    pub series_line: Color32,
    pub series_area_top: Color32,
    pub candle_up: Color32,
    pub candle_down: Color32,
    pub volume_up: Color32,
    pub volume_down: Color32,
    pub sma_fast: Color32,
    pub sma_slow: Color32,
    /// Volume profile bins (dark theme / light theme)
    pub profile_bin_dark: Color32,
    pub profile_bin_light: Color32,
    pub profile_poc_dark: Color32,
    pub profile_poc_light: Color32,
    pub profile_poc_stroke: Color32,
    pub profile_poc_label: Color32,
    /// Dashed "CURRENT" price line
    pub last_price_line: Color32,
    pub popup_fill: Color32,
    pub tooltip_fill: Color32,
    pub overlay_fill: Color32,
}

pub const PLOT_COLORS: PlotColors = PlotColors {
    dark: ThemeColors {
        background: Color32::from_rgb(9, 9, 11),
        text: Color32::from_rgb(161, 161, 170),
        grid: Color32::from_rgb(24, 24, 27),
        border: Color32::from_rgb(39, 39, 42),
        crosshair: Color32::from_rgb(63, 63, 70),
    },
    light: ThemeColors {
        background: Color32::from_rgb(255, 255, 255),
        text: Color32::from_rgb(63, 63, 70),
        grid: Color32::from_rgb(244, 244, 245),
        border: Color32::from_rgb(228, 228, 231),
        crosshair: Color32::from_rgb(212, 212, 216),
    },
    series_line: Color32::from_rgb(6, 182, 212), // Cyan
    series_area_top: Color32::from_rgba_premultiplied(2, 55, 64, 77),
    candle_up: Color32::from_rgb(16, 185, 129),
    candle_down: Color32::from_rgb(239, 68, 68),
    volume_up: Color32::from_rgba_premultiplied(19, 83, 77, 128),
    volume_down: Color32::from_rgba_premultiplied(120, 42, 40, 128),
    sma_fast: Color32::from_rgb(245, 158, 11), // Amber
    sma_slow: Color32::from_rgb(139, 92, 246), // Purple
    profile_bin_dark: Color32::from_rgba_premultiplied(1, 27, 32, 38),
    profile_bin_light: Color32::from_rgba_premultiplied(2, 46, 53, 64),
    profile_poc_dark: Color32::from_rgba_premultiplied(2, 64, 74, 89),
    profile_poc_light: Color32::from_rgba_premultiplied(3, 82, 95, 115),
    profile_poc_stroke: Color32::from_rgba_premultiplied(4, 127, 148, 179),
    profile_poc_label: Color32::from_rgb(6, 182, 212),
    last_price_line: Color32::from_rgb(6, 182, 212),
    popup_fill: Color32::from_rgba_premultiplied(17, 17, 19, 242),
    tooltip_fill: Color32::from_rgba_premultiplied(17, 17, 19, 242),
    overlay_fill: Color32::from_rgba_premultiplied(8, 8, 10, 230),
};
