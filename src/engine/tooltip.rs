use chrono::NaiveDate;
use eframe::egui::{Pos2, Rect, pos2, vec2};

use crate::config::CHART;
use crate::engine::mapper::CoordinateMapper;
use crate::models::{ProfileHit, ProfileLayout, Series};
use crate::utils::time_utils;
use crate::utils::{format_inr, format_volume};

/// Readout for the bar under the pointer.
#[derive(Debug, Clone, PartialEq)]
pub struct BarTooltip {
    pub bar_index: usize,
    pub day: NaiveDate,
    pub close: f64,
    pub volume: Option<f64>,
    /// Top-left of the label box in screen space
    pub position: Pos2,
}

impl BarTooltip {
    pub fn date_label(&self) -> String {
        time_utils::tooltip_date_label(self.day)
    }

    pub fn price_label(&self) -> String {
        format_inr(self.close)
    }

    pub fn volume_label(&self) -> Option<String> {
        self.volume.map(|v| format!("Vol: {}", format_volume(v)))
    }
}

/// Readout for a hovered volume-profile bin.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileTooltip {
    pub hit: ProfileHit,
    pub position: Pos2,
}

impl ProfileTooltip {
    pub fn range_label(&self) -> String {
        format!("{} - {}", format_inr(self.hit.price_low), format_inr(self.hit.price_high))
    }

    pub fn volume_label(&self) -> String {
        format!("Vol: {}", self.hit.volume_label)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Tooltip {
    #[default]
    Hidden,
    Bar(BarTooltip),
    Profile(ProfileTooltip),
}

impl Tooltip {
    pub fn is_visible(&self) -> bool {
        !matches!(self, Tooltip::Hidden)
    }
}

/// Resolves the pointer against cached geometry only; no I/O.
///
/// A hovered profile bin takes precedence over the bar readout. Anything
/// the mapper cannot resolve hides the tooltip.
pub fn resolve(
    series: &Series,
    mapper: &CoordinateMapper,
    profile: Option<&ProfileLayout>,
    pointer: Pos2,
    show_volume: bool,
) -> Tooltip {
    let plot = mapper.plot_rect();
    if !plot.contains(pointer) {
        return Tooltip::Hidden;
    }

    if let Some(hit) = profile.and_then(|p| p.hit_test(pointer)) {
        return Tooltip::Profile(ProfileTooltip {
            hit,
            position: profile_tooltip_position(pointer, plot),
        });
    }

    let (Some(bar_index), Some(_)) = (mapper.x_to_index(pointer.x), mapper.y_to_price(pointer.y)) else {
        return Tooltip::Hidden;
    };
    let Some(bar) = series.get(bar_index) else {
        return Tooltip::Hidden;
    };
    let Some(price_y) = mapper.price_to_y(bar.close) else {
        return Tooltip::Hidden;
    };

    Tooltip::Bar(BarTooltip {
        bar_index,
        day: bar.time,
        close: bar.close,
        volume: show_volume.then_some(bar.volume),
        position: bar_tooltip_position(pointer, price_y, plot),
    })
}

/// Right of the cursor, flipped left near the right edge; lifted above the
/// price point, dropped below the cursor when that would leave the top.
pub fn bar_tooltip_position(pointer: Pos2, price_y: f32, container: Rect) -> Pos2 {
    let cfg = CHART.tooltip;
    let local = pointer - container.min;
    let local_price_y = price_y - container.min.y;

    let mut x = local.x + cfg.offset_px;
    if x > container.width() - cfg.width_px {
        x = local.x - cfg.width_px;
    }
    let mut y = local_price_y - cfg.lift_px;
    if y < 0.0 {
        y = local.y + cfg.flip_down_px;
    }

    clamp_box(container, x, y, vec2(cfg.width_px, cfg.height_px))
}

/// Up and to the left of the cursor.
pub fn profile_tooltip_position(pointer: Pos2, container: Rect) -> Pos2 {
    let cfg = CHART.tooltip;
    let local = pointer - container.min;
    let width = cfg.width_px + 20.0;
    clamp_box(container, local.x - 140.0, local.y - 50.0, vec2(width, cfg.height_px))
}

fn clamp_box(container: Rect, x: f32, y: f32, size: eframe::egui::Vec2) -> Pos2 {
    let x = x.min(container.width() - size.x).max(0.0);
    let y = y.min(container.height() - size.y).max(0.0);
    pos2(container.min.x + x, container.min.y + y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Bar;
    use crate::engine::viewport::Viewport;
    use crate::models::VolumeProfile;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    fn setup() -> (Series, CoordinateMapper) {
        let bars = (1..=4)
            .map(|d| Bar::new(day(d), 50.0, 60.0, 40.0, 55.0, 2_500.0))
            .collect();
        let series = Series::from_canonical(bars);
        let plot = Rect::from_min_max(pos2(0.0, 0.0), pos2(400.0, 200.0));
        let mapper =
            CoordinateMapper::new(plot, &series, Viewport { from: day(1), to: day(4) }, [0.0f64; 0])
                .unwrap();
        (series, mapper)
    }

    #[test]
    fn hover_reads_nearest_bar() {
        let (series, mapper) = setup();
        let tip = resolve(&series, &mapper, None, pos2(150.0, 100.0), true);
        let Tooltip::Bar(bar) = tip else {
            panic!("expected bar tooltip");
        };
        assert_eq!(bar.day, day(2));
        assert_eq!(bar.price_label(), "₹55.00");
        assert_eq!(bar.volume_label().as_deref(), Some("Vol: 2.50 K"));

        let Tooltip::Bar(no_vol) = resolve(&series, &mapper, None, pos2(150.0, 100.0), false) else {
            panic!("expected bar tooltip");
        };
        assert_eq!(no_vol.volume_label(), None);
    }

    #[test]
    fn pointer_outside_plot_hides() {
        let (series, mapper) = setup();
        assert_eq!(resolve(&series, &mapper, None, pos2(-5.0, 100.0), false), Tooltip::Hidden);
        assert_eq!(resolve(&series, &mapper, None, pos2(100.0, 500.0), false), Tooltip::Hidden);
    }

    #[test]
    fn profile_bin_wins_over_bar() {
        let (series, mapper) = setup();
        let profile = VolumeProfile::compute(&series, day(1), day(4), 40).unwrap();
        let layout = profile.layout(
            |p| mapper.price_to_y(p),
            mapper.plot_rect(),
            0.35,
            1.0,
        );
        let poc = *layout.poc().unwrap();
        let tip = resolve(&series, &mapper, Some(&layout), poc.rect.center(), false);
        let Tooltip::Profile(profile_tip) = tip else {
            panic!("expected profile tooltip");
        };
        assert!(profile_tip.range_label().starts_with('₹'));
        assert_eq!(profile_tip.volume_label(), "Vol: 10.00 K");
    }

    #[test]
    fn tooltip_flips_at_edges() {
        let container = Rect::from_min_max(pos2(0.0, 0.0), pos2(400.0, 200.0));
        let normal = bar_tooltip_position(pos2(100.0, 100.0), 120.0, container);
        assert_eq!(normal, pos2(110.0, 60.0));

        let right = bar_tooltip_position(pos2(350.0, 100.0), 120.0, container);
        assert_eq!(right.x, 230.0);

        let top = bar_tooltip_position(pos2(100.0, 30.0), 20.0, container);
        assert_eq!(top.y, 50.0);
    }
}
