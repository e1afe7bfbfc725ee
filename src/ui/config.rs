use eframe::egui::Color32;

pub use crate::ui::ui_text::{UI_TEXT, UiText};

/// UI Colors for consistent theming
#[derive(Clone, Copy, Default)]
pub struct UiColors {
    pub label: Color32,
    pub heading: Color32,
    pub accent: Color32,
    pub error: Color32,
    pub warning: Color32,
    pub subdued: Color32,
}

/// Main UI configuration struct that holds all UI-related settings
#[derive(Default, Clone, Copy)]
pub struct UiConfig {
    pub colors: UiColors,
    /// Height reserved for the controls bar
    pub controls_height: f32,
    /// Space between control groups
    pub group_spacing: f32,
    pub popup_corner_radius: u8,
    pub tooltip_font_size: f32,
    pub axis_font_size: f32,
    /// Number of horizontal price gridlines
    pub price_ticks: usize,
    /// Target number of date labels along the x axis
    pub time_ticks: usize,
}

/// Global UI configuration instance
pub static UI_CONFIG: UiConfig = UiConfig {
    colors: UiColors {
        label: Color32::GRAY,
        heading: Color32::from_rgb(6, 182, 212), // Cyan, same as the series line
        accent: Color32::from_rgb(6, 182, 212),
        error: Color32::from_rgb(255, 100, 100),
        warning: Color32::from_rgb(255, 215, 0),
        subdued: Color32::from_rgb(113, 113, 122),
    },
    controls_height: 36.0,
    group_spacing: 14.0,
    popup_corner_radius: 6,
    tooltip_font_size: 11.0,
    axis_font_size: 10.0,
    price_ticks: 5,
    time_ticks: 6,
};
