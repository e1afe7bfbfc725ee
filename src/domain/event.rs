use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::utils::time_utils;

/// Closed set of announcement categories the marker layer knows how to draw.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, Default, Debug, Serialize, Deserialize, strum_macros::EnumIter,
)]
pub enum EventCategory {
    Result,
    BoardMeeting,
    General,
    Dividend,
    #[default]
    Other,
}

/// Glyph and colour for one marker.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct MarkerStyle {
    pub glyph: char,
    pub rgb: [u8; 3],
}

impl EventCategory {
    /// Maps free-text exchange categories onto the closed set.
    /// Order matters: "Board Meeting Outcome for Results" is a result.
    pub fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();
        if lower.contains("result") {
            EventCategory::Result
        } else if lower.contains("board") {
            EventCategory::BoardMeeting
        } else if lower.contains("general") || lower.contains("intimation") {
            EventCategory::General
        } else if lower.contains("dividend") {
            EventCategory::Dividend
        } else {
            EventCategory::Other
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            EventCategory::Result => "Result",
            EventCategory::BoardMeeting => "Board Meeting",
            EventCategory::General => "General",
            EventCategory::Dividend => "Dividend",
            EventCategory::Other => "Announcement",
        }
    }

    pub fn style(&self) -> MarkerStyle {
        match self {
            EventCategory::Result => MarkerStyle { glyph: 'R', rgb: [0xf5, 0x9e, 0x0b] }, // Amber
            EventCategory::BoardMeeting => MarkerStyle { glyph: 'B', rgb: [0xf9, 0x73, 0x16] }, // Orange
            EventCategory::General => MarkerStyle { glyph: 'G', rgb: [0x8b, 0x5c, 0xf6] }, // Purple
            EventCategory::Dividend => MarkerStyle { glyph: 'D', rgb: [0xec, 0x48, 0x99] }, // Pink
            EventCategory::Other => MarkerStyle { glyph: 'A', rgb: [0x06, 0xb6, 0xd4] }, // Cyan
        }
    }
}

/// Announcement as delivered by the embedding page.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub time: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub pdf_url: Option<String>,
}

/// A dated announcement, classified and ready to bind to bars.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub id: Option<String>,
    pub time: NaiveDateTime,
    pub category_label: String,
    pub category: EventCategory,
    pub headline: String,
    pub summary: Option<String>,
    pub pdf_url: Option<String>,
}

impl Event {
    /// Category as the exchange wrote it, or the classified name.
    pub fn display_category(&self) -> &str {
        if self.category_label.trim().is_empty() {
            self.category.label()
        } else {
            &self.category_label
        }
    }

    /// `None` when the timestamp cannot be read.
    pub fn from_record(record: EventRecord) -> Option<Self> {
        let time = time_utils::parse_local_datetime(&record.time)?;
        Some(Event {
            id: record.id,
            time,
            category: EventCategory::classify(&record.category),
            category_label: record.category,
            headline: record.headline,
            summary: record.summary.filter(|s| !s.trim().is_empty()),
            pdf_url: record.pdf_url,
        })
    }

    pub fn day(&self) -> NaiveDate {
        self.time.date()
    }

    pub fn style(&self) -> MarkerStyle {
        self.category.style()
    }

    /// Summary text, falling back to the headline.
    pub fn body(&self) -> &str {
        self.summary.as_deref().unwrap_or(&self.headline)
    }
}

/// Parses the page's event list; unreadable entries are skipped.
pub fn events_from_records(records: Vec<EventRecord>) -> Vec<Event> {
    let total = records.len();
    let events: Vec<Event> = records.into_iter().filter_map(Event::from_record).collect();
    if events.len() < total {
        log::warn!(
            "Skipped {} event(s) with unreadable timestamps",
            total - events.len()
        );
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn classifier_maps_free_text() {
        assert_eq!(EventCategory::classify("Financial Results"), EventCategory::Result);
        assert_eq!(EventCategory::classify("Board Meeting"), EventCategory::BoardMeeting);
        assert_eq!(EventCategory::classify("Board Meeting Outcome - Results"), EventCategory::Result);
        assert_eq!(EventCategory::classify("General Intimation"), EventCategory::General);
        assert_eq!(EventCategory::classify("intimation of closure"), EventCategory::General);
        assert_eq!(EventCategory::classify("Dividend"), EventCategory::Dividend);
        assert_eq!(EventCategory::classify("AGM/EGM"), EventCategory::Other);
        assert_eq!(EventCategory::classify(""), EventCategory::Other);
    }

    #[test]
    fn every_category_has_distinct_glyph() {
        let glyphs: Vec<char> = EventCategory::iter().map(|c| c.style().glyph).collect();
        let mut deduped = glyphs.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(glyphs.len(), deduped.len());
    }

    #[test]
    fn record_with_bad_time_is_dropped() {
        let records = vec![
            EventRecord {
                id: Some("a".into()),
                time: "2024-02-01T10:30:00".into(),
                category: "Result".into(),
                headline: "Q3 results".into(),
                summary: Some("  ".into()),
                pdf_url: None,
            },
            EventRecord {
                id: Some("b".into()),
                time: "yesterday".into(),
                category: "Dividend".into(),
                headline: "Dividend".into(),
                summary: None,
                pdf_url: None,
            },
        ];
        let events = events_from_records(records);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].category, EventCategory::Result);
        assert_eq!(events[0].body(), "Q3 results");
        assert_eq!(events[0].display_category(), "Result");
        assert_eq!(events[0].day(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
    }
}
