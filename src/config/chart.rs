//! Chart analytics and geometry configuration

/// Settings for the volume-by-price overlay
#[derive(Debug, Clone, Copy)]
pub struct VolumeProfileSettings {
    /// Number of equal-width price bins
    pub bin_count: usize,
    /// Widest bar as a fraction of container width (bars are right-aligned)
    pub max_width_fraction: f32,
    /// Gap in pixels left between adjacent bin rectangles
    pub bin_gap_px: f32,
}

/// Settings for the pointer tooltip
#[derive(Debug, Clone, Copy)]
pub struct TooltipSettings {
    pub offset_px: f32,
    pub width_px: f32,
    pub height_px: f32,
    /// Distance above the price coordinate the label is lifted by
    pub lift_px: f32,
    /// Downward offset used when the lifted label would leave the top edge
    pub flip_down_px: f32,
}

/// Settings for the event popup
#[derive(Debug, Clone, Copy)]
pub struct PopupSettings {
    pub width_px: f32,
    pub height_px: f32,
    pub offset_x_px: f32,
    pub offset_y_px: f32,
    /// Minimum gap from container edges
    pub inset_px: f32,
}

/// Vertical layout of the plot area
#[derive(Debug, Clone, Copy)]
pub struct PriceAxisSettings {
    /// Fraction of plot height kept empty above the highest visible price
    pub margin_top: f64,
    /// Fraction of plot height kept empty below the lowest visible price
    pub margin_bottom: f64,
    /// Share of plot height used by the volume histogram (bottom band)
    pub volume_band_fraction: f32,
}

/// The Master Chart Configuration
#[derive(Debug, Clone, Copy)]
pub struct ChartConfig {
    /// Bars shown either side of a focused date
    pub focus_half_window: usize,
    pub sma_fast_period: usize,
    pub sma_slow_period: usize,
    /// Days of history requested from the collaborator
    pub history_lookback_days: u64,
    /// Poll-refresh interval (seconds); 0 disables polling
    pub poll_interval_secs: u64,
    /// Click radius around a marker centre
    pub marker_hit_radius_px: f32,
    pub marker_radius_px: f32,

    // Sub-groups
    pub volume_profile: VolumeProfileSettings,
    pub tooltip: TooltipSettings,
    pub popup: PopupSettings,
    pub price_axis: PriceAxisSettings,
}

pub const CHART: ChartConfig = ChartConfig {
    focus_half_window: 15,
    sma_fast_period: 50,
    sma_slow_period: 200,
    history_lookback_days: 365,
    poll_interval_secs: 60,
    marker_hit_radius_px: 8.0,
    marker_radius_px: 7.0,

    volume_profile: VolumeProfileSettings {
        bin_count: 40,
        max_width_fraction: 0.35,
        bin_gap_px: 1.0,
    },

    tooltip: TooltipSettings {
        offset_px: 10.0,
        width_px: 120.0,
        height_px: 60.0,
        lift_px: 60.0,
        flip_down_px: 20.0,
    },

    popup: PopupSettings {
        width_px: 280.0,
        height_px: 180.0,
        offset_x_px: 10.0,
        offset_y_px: 120.0,
        inset_px: 10.0,
    },

    price_axis: PriceAxisSettings {
        margin_top: 0.1,
        margin_bottom: 0.1,
        volume_band_fraction: 0.2,
    },
};
