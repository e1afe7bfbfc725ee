use chrono::{DateTime, Days, Local, NaiveDate, NaiveDateTime, NaiveTime};

pub struct TimeUtils;

impl TimeUtils {
    pub const STANDARD_TIME_FORMAT: &str = "%Y-%m-%d";
    // Matches en-IN `{ day: '2-digit', month: 'short', year: 'numeric' }`
    pub const TOOLTIP_DATE_FORMAT: &str = "%d %b %Y";
    pub const POPUP_DATE_FORMAT: &str = "%d %b";
    pub const POPUP_TIME_FORMAT: &str = "%H:%M";
}

/// Calendar day of a date-stamped string. Anything after the date part
/// (`T09:15:00Z`, ` 10:00`) is ignored, so no timezone shifting happens.
pub fn parse_day(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    let date_part = trimmed
        .split(['T', ' '])
        .next()
        .unwrap_or(trimmed);
    NaiveDate::parse_from_str(date_part, TimeUtils::STANDARD_TIME_FORMAT).ok()
}

/// Full timestamp as written. Offsets are dropped rather than converted so that
/// the calendar day always equals `parse_day` of the same string.
pub fn parse_local_datetime(text: &str) -> Option<NaiveDateTime> {
    let trimmed = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            return Some(dt);
        }
    }
    parse_day(trimmed).map(|d| d.and_time(NaiveTime::MIN))
}

/// Unix seconds to the UTC calendar day.
pub fn epoch_sec_to_day(epoch_sec: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(epoch_sec, 0).map(|dt| dt.date_naive())
}

pub fn day_to_string(day: NaiveDate) -> String {
    day.format(TimeUtils::STANDARD_TIME_FORMAT).to_string()
}

pub fn tooltip_date_label(day: NaiveDate) -> String {
    day.format(TimeUtils::TOOLTIP_DATE_FORMAT).to_string()
}

pub fn today_local() -> NaiveDate {
    Local::now().date_naive()
}

/// `(from, to)` covering the last `lookback_days` up to today.
pub fn lookback_window(lookback_days: u64) -> (NaiveDate, NaiveDate) {
    let to = today_local();
    let from = to.checked_sub_days(Days::new(lookback_days)).unwrap_or(to);
    (from, to)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_day_ignores_time_of_day() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 7);
        assert_eq!(parse_day("2024-03-07"), expected);
        assert_eq!(parse_day("2024-03-07T23:59:00.000Z"), expected);
        assert_eq!(parse_day("2024-03-07 10:00:00"), expected);
        assert_eq!(parse_day("07/03/2024"), None);
    }

    #[test]
    fn parse_local_datetime_keeps_written_day() {
        let dt = parse_local_datetime("2024-03-07T23:30:00+05:30").unwrap();
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2024, 3, 7).unwrap());
        assert_eq!(dt.time(), NaiveTime::from_hms_opt(23, 30, 0).unwrap());

        let date_only = parse_local_datetime("2024-03-07").unwrap();
        assert_eq!(date_only.time(), NaiveTime::MIN);
    }

    #[test]
    fn tooltip_label_format() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(tooltip_date_label(day), "05 Jan 2024");
        assert_eq!(day_to_string(day), "2024-01-05");
    }
}
