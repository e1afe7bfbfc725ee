//! User-facing strings

pub struct UiText {
    pub app_title: &'static str,
    pub range_heading: &'static str,
    pub style_heading: &'static str,
    pub overlays_heading: &'static str,
    pub label_volume: &'static str,
    pub label_volume_profile: &'static str,
    pub label_sma_prefix: &'static str,
    pub label_theme_dark: &'static str,
    pub label_theme_light: &'static str,
    pub button_fullscreen: &'static str,
    pub button_windowed: &'static str,
    pub button_refresh: &'static str,
    pub button_retry: &'static str,
    pub link_external_viewer: &'static str,
    pub link_pdf: &'static str,
    pub loading: &'static str,
    pub refreshing: &'static str,
    pub label_current: &'static str,
    pub label_poc: &'static str,
    pub label_last_price: &'static str,
    pub label_source: &'static str,
    pub focused_on: &'static str,
    pub footer_currency_note: &'static str,
}

pub const UI_TEXT: UiText = UiText {
    app_title: "Speedy Chart",
    range_heading: "Range",
    style_heading: "Style",
    overlays_heading: "Overlays",
    label_volume: "Volume",
    label_volume_profile: "Volume Profile",
    label_sma_prefix: "SMA",
    label_theme_dark: "Dark",
    label_theme_light: "Light",
    button_fullscreen: "⛶ Fullscreen",
    button_windowed: "🗗 Exit Fullscreen",
    button_refresh: "⟳",
    button_retry: "Retry",
    link_external_viewer: "View on TradingView",
    link_pdf: "View PDF",
    loading: "Loading chart...",
    refreshing: "Refreshing...",
    label_current: "CURRENT",
    label_poc: "POC",
    label_last_price: "Last",
    label_source: "Source",
    focused_on: "Focused on",
    footer_currency_note: "Prices in INR (₹). Daily bars.",
};
