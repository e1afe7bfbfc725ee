use std::ops::Range;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::Bar;

// ============================================================================
// Series: canonical daily bars for one subscription
// ============================================================================

/// Bars sorted by strictly increasing, unique day.
/// Only the normalizer builds one from raw input; the chart replaces it
/// wholesale on every refetch and never patches it.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Series {
    bars: Vec<Bar>,
}

impl Series {
    /// Caller guarantees canonical order (see `data::normalize`).
    pub(crate) fn from_canonical(bars: Vec<Bar>) -> Self {
        debug_assert!(
            bars.windows(2).all(|w| w[0].time < w[1].time),
            "Series bars must be strictly increasing by day"
        );
        Series { bars }
    }

    pub fn empty() -> Self {
        Series::default()
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Bar> {
        self.bars.get(idx)
    }

    pub fn first_time(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.time)
    }

    pub fn last_time(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.time)
    }

    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    /// Exact day lookup.
    pub fn index_of(&self, day: NaiveDate) -> Option<usize> {
        self.bars.binary_search_by_key(&day, |b| b.time).ok()
    }

    /// Index range of bars with `from <= time <= to`.
    pub fn indices_between(&self, from: NaiveDate, to: NaiveDate) -> Range<usize> {
        let start = self.bars.partition_point(|b| b.time < from);
        let end = self.bars.partition_point(|b| b.time <= to);
        start..end.max(start)
    }

    pub fn bars_between(&self, from: NaiveDate, to: NaiveDate) -> &[Bar] {
        &self.bars[self.indices_between(from, to)]
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// `(first_year, last_year)` for the footer.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        Some((self.first_time()?.year(), self.last_time()?.year()))
    }
}
