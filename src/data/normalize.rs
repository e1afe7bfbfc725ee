use chrono::NaiveDate;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::domain::Bar;
use crate::models::Series;
use crate::utils::time_utils;

/// A number as it arrives over the wire: JSON number or text such as `"1,000"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawNumber {
    Num(f64),
    Text(String),
}

impl RawNumber {
    /// Finite value, or `None`. Thousands separators and blanks are ignored.
    pub fn to_finite(&self) -> Option<f64> {
        let value = match self {
            RawNumber::Num(v) => *v,
            RawNumber::Text(s) => {
                let cleaned: String = s
                    .chars()
                    .filter(|c| !matches!(c, ',' | '_' | ' '))
                    .collect();
                cleaned.parse::<f64>().ok()?
            }
        };
        value.is_finite().then_some(value)
    }
}

/// A date as it arrives over the wire: day string, ISO timestamp or unix seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawTime {
    Epoch(i64),
    Text(String),
}

impl RawTime {
    pub fn to_day(&self) -> Option<NaiveDate> {
        match self {
            RawTime::Epoch(secs) => time_utils::epoch_sec_to_day(*secs),
            RawTime::Text(s) => time_utils::parse_day(s),
        }
    }
}

/// One undeduplicated, unvalidated record from the history collaborator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawBar {
    #[serde(default, alias = "time")]
    pub date: Option<RawTime>,
    #[serde(default)]
    pub open: Option<RawNumber>,
    #[serde(default)]
    pub high: Option<RawNumber>,
    #[serde(default)]
    pub low: Option<RawNumber>,
    #[serde(default)]
    pub close: Option<RawNumber>,
    #[serde(default)]
    pub volume: Option<RawNumber>,
}

impl From<&Bar> for RawBar {
    fn from(bar: &Bar) -> Self {
        RawBar {
            date: Some(RawTime::Text(time_utils::day_to_string(bar.time))),
            open: Some(RawNumber::Num(bar.open)),
            high: Some(RawNumber::Num(bar.high)),
            low: Some(RawNumber::Num(bar.low)),
            close: Some(RawNumber::Num(bar.close)),
            volume: Some(RawNumber::Num(bar.volume)),
        }
    }
}

impl RawBar {
    /// `None` if the date or any of O/H/L/C is missing or not a finite
    /// number. Unreadable volume counts as 0. OHLC consistency is not checked
    /// here; see [`Bar::repaired`].
    pub fn to_bar(&self) -> Option<Bar> {
        let time = self.date.as_ref()?.to_day()?;
        let price = |field: &Option<RawNumber>| field.as_ref().and_then(RawNumber::to_finite);
        Some(Bar::new(
            time,
            price(&self.open)?,
            price(&self.high)?,
            price(&self.low)?,
            price(&self.close)?,
            price(&self.volume).unwrap_or(0.0),
        ))
    }
}

/// What the normalizer threw away.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    pub input: usize,
    pub malformed: usize,
    pub duplicates: usize,
}

/// Clean, dedupe and sort raw records into a canonical series.
///
/// For a repeated day the first parseable record in input order wins; later
/// ones are discarded, never merged. Winners with an inconsistent OHLC range
/// are repaired after dedup, so a repair never changes which record wins. An empty result is a normal outcome
/// (the caller turns it into a "no data" state).
pub fn normalize(raw: &[RawBar]) -> Series {
    normalize_with_report(raw).0
}

pub fn normalize_with_report(raw: &[RawBar]) -> (Series, NormalizeReport) {
    let valid: Vec<Bar> = raw.iter().filter_map(RawBar::to_bar).collect();
    let malformed = raw.len() - valid.len();

    let valid_count = valid.len();
    // unique_by keeps the first occurrence of each key
    let mut bars: Vec<Bar> = valid
        .into_iter()
        .unique_by(|b| b.time)
        .map(Bar::repaired)
        .collect();
    let duplicates = valid_count - bars.len();

    bars.sort_by_key(|b| b.time);

    let report = NormalizeReport {
        input: raw.len(),
        malformed,
        duplicates,
    };

    #[cfg(debug_assertions)]
    if DEBUG_FLAGS.print_normalizer_drops && (malformed > 0 || duplicates > 0) {
        log::debug!(
            "Normalizer: {} raw -> {} bars ({} malformed, {} duplicate days dropped)",
            report.input,
            bars.len(),
            malformed,
            duplicates
        );
    }

    (Series::from_canonical(bars), report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(date: &str, close: f64, volume: RawNumber) -> RawBar {
        RawBar {
            date: Some(RawTime::Text(date.to_string())),
            open: Some(RawNumber::Num(close)),
            high: Some(RawNumber::Num(close + 1.0)),
            low: Some(RawNumber::Num(close - 1.0)),
            close: Some(RawNumber::Num(close)),
            volume: Some(volume),
        }
    }

    fn text(s: &str) -> RawNumber {
        RawNumber::Text(s.to_string())
    }

    #[test]
    fn duplicate_day_keeps_first_record() {
        let input = vec![
            raw("2024-01-02", 100.0, text("1,000")),
            raw("2024-01-02T15:30:00Z", 101.0, text("2,000")),
        ];
        let series = normalize(&input);
        assert_eq!(series.len(), 1);
        assert_eq!(series.bars()[0].volume, 1000.0);
        assert_eq!(series.bars()[0].close, 100.0);
    }

    #[test]
    fn malformed_first_record_lets_next_valid_one_win() {
        let mut broken = raw("2024-01-02", 100.0, text("5"));
        broken.close = Some(text("n/a"));
        let input = vec![broken, raw("2024-01-02", 105.0, text("7"))];
        let (series, report) = normalize_with_report(&input);
        assert_eq!(series.len(), 1);
        assert_eq!(series.bars()[0].close, 105.0);
        assert_eq!(report.malformed, 1);
        assert_eq!(report.duplicates, 0);
    }

    #[test]
    fn inconsistent_first_record_still_wins_its_day() {
        let mut back_filled = raw("2024-01-02", 100.0, text("1,000"));
        back_filled.open = Some(RawNumber::Num(105.0));
        back_filled.high = Some(RawNumber::Num(100.0));
        back_filled.low = Some(RawNumber::Num(99.0));
        let input = vec![back_filled, raw("2024-01-02", 101.0, text("2,000"))];

        let (series, report) = normalize_with_report(&input);
        assert_eq!(series.len(), 1);
        let bar = series.bars()[0];
        assert_eq!(bar.volume, 1000.0);
        assert_eq!(bar.close, 100.0);
        assert_eq!((bar.low, bar.high), (99.0, 105.0));
        assert_eq!(report.malformed, 0);
        assert_eq!(report.duplicates, 1);
    }

    #[test]
    fn output_is_sorted_ascending() {
        let input = vec![
            raw("2024-01-05", 3.0, RawNumber::Num(1.0)),
            raw("2024-01-01", 1.0, RawNumber::Num(1.0)),
            raw("2024-01-03", 2.0, RawNumber::Num(1.0)),
        ];
        let series = normalize(&input);
        let closes = series.closes();
        assert_eq!(closes, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn drops_unparseable_and_non_finite_prices() {
        let mut no_date = raw("2024-01-01", 1.0, RawNumber::Num(1.0));
        no_date.date = None;
        let mut nan_high = raw("2024-01-02", 1.0, RawNumber::Num(1.0));
        nan_high.high = Some(text("NaN"));
        let mut missing_low = raw("2024-01-03", 1.0, RawNumber::Num(1.0));
        missing_low.low = None;
        let (series, report) = normalize_with_report(&[no_date, nan_high, missing_low]);
        assert!(series.is_empty());
        assert_eq!(report.malformed, 3);
    }

    #[test]
    fn unreadable_volume_is_zero() {
        let mut bar = raw("2024-01-01", 10.0, text("--"));
        let series = normalize(std::slice::from_ref(&bar));
        assert_eq!(series.bars()[0].volume, 0.0);

        bar.volume = None;
        let series = normalize(&[bar]);
        assert_eq!(series.bars()[0].volume, 0.0);
    }

    #[test]
    fn epoch_seconds_are_accepted() {
        let mut bar = raw("", 10.0, RawNumber::Num(1.0));
        bar.date = Some(RawTime::Epoch(1_704_153_600)); // 2024-01-02 00:00 UTC
        let series = normalize(&[bar]);
        assert_eq!(series.first_time(), NaiveDate::from_ymd_opt(2024, 1, 2));
    }

    #[test]
    fn normalizing_canonical_series_is_identity() {
        let input = vec![
            raw("2024-01-04", 12.0, text("300")),
            raw("2024-01-02", 10.0, text("100")),
            raw("2024-01-02", 99.0, text("999")),
            raw("2024-01-03", 11.0, text("200")),
        ];
        let once = normalize(&input);
        let again: Vec<RawBar> = once.bars().iter().map(RawBar::from).collect();
        assert_eq!(normalize(&again), once);
    }

    #[test]
    fn deserializes_mixed_wire_formats() {
        let json = r#"[
            {"date": "2024-01-02T00:00:00.000Z", "open": "1,234.5", "high": 1240, "low": 1200, "close": "1235", "volume": "12,000"},
            {"time": "2024-01-03", "open": 1235, "high": 1250, "low": 1230, "close": 1249}
        ]"#;
        let raw: Vec<RawBar> = serde_json::from_str(json).unwrap();
        let series = normalize(&raw);
        assert_eq!(series.len(), 2);
        assert_eq!(series.bars()[0].open, 1234.5);
        assert_eq!(series.bars()[0].volume, 12_000.0);
        assert_eq!(series.bars()[1].volume, 0.0);
    }
}
