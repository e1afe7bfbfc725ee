use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, PartialEq)]
pub enum BarType {
    Bullish,
    Bearish,
}

/// One OHLCV observation for a single calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Bar {
    pub fn new(time: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Bar {
            time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    pub fn get_type(&self) -> BarType {
        if self.close >= self.open {
            BarType::Bullish
        } else {
            BarType::Bearish
        }
    }

    /// `(high + low + close) / 3`, the price a bar's volume is binned at.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    // Returns the low and high of the bar body as a tuple
    pub fn body_range(&self) -> (f64, f64) {
        match self.get_type() {
            BarType::Bullish => (self.open, self.close),
            BarType::Bearish => (self.close, self.open),
        }
    }

    /// Widens high/low so the body fits inside the wick. Feeds back-fill a
    /// missing high or low from close, which can leave `open > high`.
    pub fn repaired(self) -> Self {
        let (body_low, body_high) = self.body_range();
        Bar {
            high: self.high.max(body_high),
            low: self.low.min(body_low),
            volume: self.volume.max(0.0),
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn typical_price_is_hlc_mean() {
        let bar = Bar::new(day(1), 10.0, 12.0, 9.0, 11.0, 100.0);
        assert!((bar.typical_price() - 32.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn repaired_widens_wick_to_cover_body() {
        let ok = Bar::new(day(1), 10.0, 12.0, 9.0, 11.0, 5.0);
        assert_eq!(ok.repaired(), ok);

        let back_filled = Bar::new(day(1), 105.0, 100.0, 99.0, 100.0, 1000.0).repaired();
        assert_eq!((back_filled.low, back_filled.high), (99.0, 105.0));

        let low_above_body = Bar::new(day(1), 10.0, 12.0, 10.5, 11.0, -1.0).repaired();
        assert_eq!(low_above_body.low, 10.0);
        assert_eq!(low_above_body.volume, 0.0);
    }

    #[test]
    fn body_range_orders_open_close() {
        let bear = Bar::new(day(2), 11.0, 12.0, 9.0, 10.0, 0.0);
        assert_eq!(bear.get_type(), BarType::Bearish);
        assert_eq!(bear.body_range(), (10.0, 11.0));
    }
}
