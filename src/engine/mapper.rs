use std::ops::Range;

use chrono::NaiveDate;
use eframe::egui::{Pos2, Rect};

use crate::config::CHART;
use crate::engine::viewport::Viewport;
use crate::models::Series;

/// Time/price <-> pixel conversion for one viewport and one plot rectangle.
///
/// Bars are evenly spaced by series index (calendar gaps do not open
/// holes). The price axis spans the visible lows/highs plus any extra
/// overlay values, padded by the configured top/bottom margins. Queries
/// outside the plot or the visible window return `None` rather than an
/// edge pixel. Build a new mapper whenever the rect changes.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateMapper {
    plot: Rect,
    /// Series indices in view
    indices: Range<usize>,
    days: Vec<NaiveDate>,
    price_low: f64,
    price_high: f64,
    volume_max: f64,
}

impl CoordinateMapper {
    /// `None` when the rect is degenerate or the viewport holds no bars.
    pub fn new(
        plot: Rect,
        series: &Series,
        viewport: Viewport,
        extra_prices: impl IntoIterator<Item = f64>,
    ) -> Option<Self> {
        if !plot.is_finite() || plot.width() <= 0.0 || plot.height() <= 0.0 {
            return None;
        }
        let indices = series.indices_between(viewport.from, viewport.to);
        let bars = &series.bars()[indices.clone()];
        if bars.is_empty() {
            return None;
        }

        let (mut low, mut high) = bars
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), b| (lo.min(b.low), hi.max(b.high)));
        for p in extra_prices.into_iter().filter(|p| p.is_finite()) {
            low = low.min(p);
            high = high.max(p);
        }
        if high - low <= f64::EPSILON {
            let pad = (high.abs() * 0.01).max(0.01);
            low -= pad;
            high += pad;
        }

        let volume_max = bars.iter().map(|b| b.volume).fold(0.0, f64::max);

        Some(Self {
            plot,
            days: bars.iter().map(|b| b.time).collect(),
            indices,
            price_low: low,
            price_high: high,
            volume_max,
        })
    }

    pub fn plot_rect(&self) -> Rect {
        self.plot
    }

    pub fn visible_indices(&self) -> Range<usize> {
        self.indices.clone()
    }

    /// Visible price span before margins.
    pub fn price_bounds(&self) -> (f64, f64) {
        (self.price_low, self.price_high)
    }

    pub fn bar_spacing(&self) -> f32 {
        self.plot.width() / self.days.len() as f32
    }

    /// Centre x of the bar at series index `index`.
    pub fn index_to_x(&self, index: usize) -> Option<f32> {
        if !self.indices.contains(&index) {
            return None;
        }
        let slot = (index - self.indices.start) as f32;
        Some(self.plot.left() + (slot + 0.5) * self.bar_spacing())
    }

    pub fn x_to_index(&self, x: f32) -> Option<usize> {
        if !x.is_finite() || x < self.plot.left() || x >= self.plot.right() {
            return None;
        }
        let slot = ((x - self.plot.left()) / self.bar_spacing()).floor() as usize;
        (slot < self.days.len()).then_some(self.indices.start + slot)
    }

    pub fn time_to_x(&self, day: NaiveDate) -> Option<f32> {
        let slot = self.days.binary_search(&day).ok()?;
        self.index_to_x(self.indices.start + slot)
    }

    pub fn x_to_time(&self, x: f32) -> Option<NaiveDate> {
        let index = self.x_to_index(x)?;
        self.days.get(index - self.indices.start).copied()
    }

    fn price_band(&self) -> (f32, f32) {
        let axis = CHART.price_axis;
        let h = self.plot.height();
        let top = self.plot.top() + h * axis.margin_top as f32;
        let bottom = self.plot.bottom() - h * axis.margin_bottom as f32;
        (top, bottom)
    }

    pub fn price_to_y(&self, price: f64) -> Option<f32> {
        if !price.is_finite() {
            return None;
        }
        let (top, bottom) = self.price_band();
        let frac = (self.price_high - price) / (self.price_high - self.price_low);
        let y = top + frac as f32 * (bottom - top);
        (self.plot.top()..=self.plot.bottom()).contains(&y).then_some(y)
    }

    pub fn y_to_price(&self, y: f32) -> Option<f64> {
        if !y.is_finite() || y < self.plot.top() || y > self.plot.bottom() {
            return None;
        }
        let (top, bottom) = self.price_band();
        let frac = ((y - top) / (bottom - top)) as f64;
        Some(self.price_high - frac * (self.price_high - self.price_low))
    }

    /// Point for `(day, price)`, if both are in view.
    pub fn to_screen(&self, day: NaiveDate, price: f64) -> Option<Pos2> {
        Some(Pos2::new(self.time_to_x(day)?, self.price_to_y(price)?))
    }

    /// Top of the volume histogram band.
    pub fn volume_band_top(&self) -> f32 {
        self.plot.bottom() - self.plot.height() * CHART.price_axis.volume_band_fraction
    }

    /// Y of a volume bar's top inside the bottom band.
    pub fn volume_to_y(&self, volume: f64) -> Option<f32> {
        if !volume.is_finite() || volume < 0.0 || self.volume_max <= 0.0 {
            return None;
        }
        let band = self.plot.bottom() - self.volume_band_top();
        Some(self.plot.bottom() - (volume / self.volume_max) as f32 * band)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Bar;
    use eframe::egui::pos2;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 4, d).unwrap()
    }

    fn series() -> Series {
        let bars = (1..=10)
            .map(|d| {
                let c = 100.0 + d as f64;
                Bar::new(day(d), c, c + 2.0, c - 2.0, c, 1_000.0 * d as f64)
            })
            .collect();
        Series::from_canonical(bars)
    }

    const NO_PRICES: [f64; 0] = [];

    fn plot() -> Rect {
        Rect::from_min_max(pos2(0.0, 0.0), pos2(500.0, 300.0))
    }

    #[test]
    fn time_round_trip_and_no_hit_outside() {
        let s = series();
        let vp = Viewport { from: day(3), to: day(7) };
        let m = CoordinateMapper::new(plot(), &s, vp, NO_PRICES).unwrap();
        assert_eq!(m.bar_spacing(), 100.0);
        assert_eq!(m.time_to_x(day(3)), Some(50.0));
        assert_eq!(m.x_to_time(50.0), Some(day(3)));
        assert_eq!(m.x_to_time(499.0), Some(day(7)));
        assert_eq!(m.time_to_x(day(2)), None);
        assert_eq!(m.x_to_time(-1.0), None);
        assert_eq!(m.x_to_time(500.0), None);
    }

    #[test]
    fn price_axis_uses_visible_extremes_with_margins() {
        let s = series();
        let vp = Viewport { from: day(3), to: day(7) };
        let m = CoordinateMapper::new(plot(), &s, vp, NO_PRICES).unwrap();
        assert_eq!(m.price_bounds(), (101.0, 109.0));
        assert!((m.price_to_y(109.0).unwrap() - 30.0).abs() < 1e-3);
        assert!((m.price_to_y(101.0).unwrap() - 270.0).abs() < 1e-3);
        let p = m.y_to_price(150.0).unwrap();
        assert!((p - 105.0).abs() < 1e-4);
        assert_eq!(m.y_to_price(301.0), None);
        assert_eq!(m.price_to_y(f64::NAN), None);
        assert_eq!(m.price_to_y(1_000.0), None);
    }

    #[test]
    fn resize_rebuilds_scale() {
        let s = series();
        let vp = Viewport { from: day(1), to: day(10) };
        let small = CoordinateMapper::new(plot(), &s, vp, NO_PRICES).unwrap();
        let wide = Rect::from_min_max(pos2(0.0, 0.0), pos2(1000.0, 300.0));
        let big = CoordinateMapper::new(wide, &s, vp, NO_PRICES).unwrap();
        assert_eq!(small.time_to_x(day(10)), Some(475.0));
        assert_eq!(big.time_to_x(day(10)), Some(950.0));
    }

    #[test]
    fn degenerate_rect_or_window_has_no_mapper() {
        let s = series();
        let vp = Viewport { from: day(1), to: day(10) };
        let zero = Rect::from_min_max(pos2(10.0, 10.0), pos2(10.0, 200.0));
        assert!(CoordinateMapper::new(zero, &s, vp, NO_PRICES).is_none());
        assert!(CoordinateMapper::new(plot(), &Series::empty(), vp, NO_PRICES).is_none());
    }

    #[test]
    fn volume_band_is_bottom_fifth() {
        let s = series();
        let vp = Viewport { from: day(1), to: day(10) };
        let m = CoordinateMapper::new(plot(), &s, vp, NO_PRICES).unwrap();
        assert!((m.volume_band_top() - 240.0).abs() < 1e-3);
        assert!((m.volume_to_y(10_000.0).unwrap() - 240.0).abs() < 1e-3);
        assert_eq!(m.volume_to_y(0.0), Some(300.0));
    }
}
