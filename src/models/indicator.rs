use chrono::NaiveDate;

use crate::models::Series;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorPoint {
    pub time: NaiveDate,
    pub value: f64,
}

/// Trailing simple moving average of `close`.
///
/// Output has `max(0, n - period + 1)` points; point `i` is the mean of bars
/// `i..i + period` and carries the time of the last of them. No leading
/// padding and no partial windows. A zero period yields nothing.
pub fn moving_average(series: &Series, period: usize) -> Vec<IndicatorPoint> {
    let bars = series.bars();
    if period == 0 || bars.len() < period {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(bars.len() - period + 1);
    let mut window_sum: f64 = bars[..period].iter().map(|b| b.close).sum();
    out.push(IndicatorPoint {
        time: bars[period - 1].time,
        value: window_sum / period as f64,
    });

    for i in period..bars.len() {
        window_sum += bars[i].close - bars[i - period].close;
        out.push(IndicatorPoint {
            time: bars[i].time,
            value: window_sum / period as f64,
        });
    }
    out
}

/// A toggleable moving-average overlay. Recomputed from scratch whenever the
/// series or the period changes; never touches the series itself.
#[derive(Debug, Clone, Default)]
pub struct MovingAverageOverlay {
    period: usize,
    pub visible: bool,
    points: Vec<IndicatorPoint>,
}

impl MovingAverageOverlay {
    pub fn new(period: usize) -> Self {
        Self {
            period,
            visible: false,
            points: Vec::new(),
        }
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn set_period(&mut self, period: usize, series: &Series) {
        if period != self.period {
            self.period = period;
            self.recompute(series);
        }
    }

    pub fn recompute(&mut self, series: &Series) {
        self.points = moving_average(series, self.period);
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn points(&self) -> &[IndicatorPoint] {
        &self.points
    }

    /// Hidden when toggled off or when the series is shorter than the period.
    pub fn is_drawable(&self) -> bool {
        self.visible && !self.points.is_empty()
    }

    /// Value on an exact day, if the window covers it.
    pub fn value_at(&self, day: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&day, |p| p.time)
            .ok()
            .map(|i| self.points[i].value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Bar;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn series_with_closes(closes: &[f64]) -> Series {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| {
                let day = start + chrono::Days::new(i as u64);
                Bar::new(day, c, c + 1.0, c - 1.0, c, 10.0)
            })
            .collect();
        Series::from_canonical(bars)
    }

    #[test]
    fn ten_bars_period_five() {
        let closes: Vec<f64> = (0..10).map(|i| 100.0 + i as f64).collect();
        let series = series_with_closes(&closes);
        let sma = moving_average(&series, 5);
        assert_eq!(sma.len(), 6);
        assert!(approx_eq(sma[0].value, 102.0));
        assert!(approx_eq(sma[5].value, 107.0));
        assert_eq!(sma[0].time, series.bars()[4].time);
        assert_eq!(sma[5].time, series.bars()[9].time);
    }

    #[test]
    fn length_is_n_minus_period_plus_one() {
        let series = series_with_closes(&[1.0; 7]);
        for period in 1..=9usize {
            let expected = (7 + 1usize).saturating_sub(period);
            assert_eq!(moving_average(&series, period).len(), expected, "period {period}");
        }
        assert!(moving_average(&series, 0).is_empty());
    }

    #[test]
    fn short_series_hides_overlay() {
        let series = series_with_closes(&[1.0, 2.0, 3.0]);
        let mut overlay = MovingAverageOverlay::new(50);
        overlay.visible = true;
        overlay.recompute(&series);
        assert!(!overlay.is_drawable());
    }

    #[test]
    fn overlays_are_independent_and_leave_series_alone() {
        let closes: Vec<f64> = (0..60).map(|i| i as f64).collect();
        let series = series_with_closes(&closes);
        let before = series.clone();

        let mut fast = MovingAverageOverlay::new(50);
        let mut slow = MovingAverageOverlay::new(200);
        fast.recompute(&series);
        slow.recompute(&series);
        fast.visible = true;

        assert_eq!(fast.points().len(), 11);
        assert!(slow.points().is_empty());
        assert!(fast.is_drawable());
        assert!(!slow.is_drawable());
        assert_eq!(series, before);
        assert!(approx_eq(fast.value_at(series.bars()[49].time).unwrap(), 24.5));
        assert_eq!(fast.value_at(series.bars()[0].time), None);
    }

    #[test]
    fn changing_period_recomputes() {
        let series = series_with_closes(&[1.0, 2.0, 3.0, 4.0]);
        let mut overlay = MovingAverageOverlay::new(2);
        overlay.recompute(&series);
        assert_eq!(overlay.points().len(), 3);
        overlay.set_period(4, &series);
        assert_eq!(overlay.points().len(), 1);
        assert!(approx_eq(overlay.points()[0].value, 2.5));
    }
}
