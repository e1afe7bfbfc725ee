use chrono::NaiveDate;
use eframe::egui::{Pos2, Rect, pos2};
use serde::{Deserialize, Serialize};

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::models::Series;
use crate::utils::format_volume;
use crate::utils::maths_utils::{self, RangeF64};

/// Volume aggregated by typical price over one visible window.
/// Price-space only; `layout` turns it into pixel rectangles.
#[derive(Default, Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VolumeProfile {
    pub price_range: RangeF64,
    pub volumes: Vec<f64>,
    /// Point of control: max-volume bin, lowest index on ties.
    pub poc: usize,
    pub bar_count: usize,
    pub window: (NaiveDate, NaiveDate),
}

impl VolumeProfile {
    /// Bins the bars with `from <= time <= to`. `None` when the window holds no bars.
    pub fn compute(series: &Series, from: NaiveDate, to: NaiveDate, bin_count: usize) -> Option<Self> {
        let bars = series.bars_between(from, to);
        if bars.is_empty() {
            return None;
        }

        let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
        let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let price_low = maths_utils::get_min(&lows)?;
        let price_high = maths_utils::get_max(&highs)?;

        let price_range = RangeF64::new(price_low, price_high, bin_count.max(1));
        let mut volumes = vec![0.0; price_range.n_chunks()];
        for bar in bars {
            let index = price_range.chunk_index(bar.typical_price());
            volumes[index] += bar.volume;
        }

        let poc = maths_utils::first_argmax(&volumes)?;

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_volume_profile {
            log::debug!(
                "Volume profile {}..{}: {} bars, range {:.2}-{:.2}, POC bin {}",
                from,
                to,
                bars.len(),
                price_low,
                price_high,
                poc
            );
        }

        Some(VolumeProfile {
            price_range,
            volumes,
            poc,
            bar_count: bars.len(),
            window: (from, to),
        })
    }

    pub fn bin_count(&self) -> usize {
        self.volumes.len()
    }

    pub fn total_volume(&self) -> f64 {
        self.volumes.iter().sum()
    }

    pub fn max_volume(&self) -> f64 {
        self.volumes.get(self.poc).copied().unwrap_or(0.0)
    }

    pub fn bin_bounds(&self, index: usize) -> (f64, f64) {
        self.price_range.chunk_bounds(index)
    }

    pub fn poc_bounds(&self) -> (f64, f64) {
        self.bin_bounds(self.poc)
    }

    /// Pixel rectangles, right-aligned against `plot.right()`.
    ///
    /// Width is `volume / max_volume * max_width_fraction * plot.width()`.
    /// Empty bins, and bins whose edges the price scale cannot place, are
    /// left out. Identical inputs give identical rectangles.
    pub fn layout(
        &self,
        price_to_y: impl Fn(f64) -> Option<f32>,
        plot: Rect,
        max_width_fraction: f32,
        bin_gap_px: f32,
    ) -> ProfileLayout {
        let max_volume = self.max_volume();
        if max_volume <= 0.0 {
            return ProfileLayout::default();
        }

        let max_width = plot.width() * max_width_fraction;
        let bins = self
            .volumes
            .iter()
            .enumerate()
            .filter(|(_, v)| **v > 0.0)
            .filter_map(|(index, &volume)| {
                let (price_low, price_high) = self.bin_bounds(index);
                let y_low = price_to_y(price_low)?;
                let y_high = price_to_y(price_high)?;
                let top = y_low.min(y_high);
                let height = ((y_low - y_high).abs() - bin_gap_px).max(1.0);
                let width = (volume / max_volume) as f32 * max_width;
                let rect = Rect::from_min_max(
                    pos2(plot.right() - width, top),
                    pos2(plot.right(), top + height),
                );
                Some(ProfileBinRect {
                    index,
                    price_low,
                    price_high,
                    volume,
                    rect,
                    is_poc: index == self.poc,
                })
            })
            .collect();

        ProfileLayout { bins }
    }
}

/// One drawable bin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfileBinRect {
    pub index: usize,
    pub price_low: f64,
    pub price_high: f64,
    pub volume: f64,
    pub rect: Rect,
    pub is_poc: bool,
}

/// What the tooltip shows for a hovered bin.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileHit {
    pub price_low: f64,
    pub price_high: f64,
    pub volume: f64,
    pub volume_label: String,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct ProfileLayout {
    pub bins: Vec<ProfileBinRect>,
}

impl ProfileLayout {
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn poc(&self) -> Option<&ProfileBinRect> {
        self.bins.iter().find(|b| b.is_poc)
    }

    /// Linear scan; a pointer outside every rectangle is no hit.
    pub fn hit_test(&self, pointer: Pos2) -> Option<ProfileHit> {
        self.bins
            .iter()
            .find(|b| b.rect.contains(pointer))
            .map(|b| ProfileHit {
                price_low: b.price_low,
                price_high: b.price_high,
                volume: b.volume,
                volume_label: format_volume(b.volume),
            })
    }
}
