use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Datelike, Days, NaiveDate, Weekday};

use speedy_chart::config::PERSISTENCE;
use speedy_chart::data::RawBar;
use speedy_chart::domain::{Bar, EventRecord};
use speedy_chart::utils::time_utils;

const BAR_COUNT: usize = 420;
const START_PRICE: f64 = 2_450.0;
const SEED: u64 = 0x5eed_c0ff_ee15_600d;

fn main() -> Result<()> {
    build_demo_fixture()
}

fn build_demo_fixture() -> Result<()> {
    let end = time_utils::today_local();
    let bars = synthetic_bars(end, BAR_COUNT);
    let events = synthetic_events(&bars);

    let dir = PathBuf::from(PERSISTENCE.fixture_dir);
    std::fs::create_dir_all(&dir).with_context(|| format!("Failed to create {:?}", dir))?;

    let raw: Vec<RawBar> = bars.iter().map(RawBar::from).collect();
    let bars_path = dir.join(PERSISTENCE.bars_filename);
    std::fs::write(&bars_path, serde_json::to_string_pretty(&raw)?)
        .with_context(|| format!("Failed to write {:?}", bars_path))?;

    let events_path = dir.join(PERSISTENCE.events_filename);
    std::fs::write(&events_path, serde_json::to_string_pretty(&events)?)
        .with_context(|| format!("Failed to write {:?}", events_path))?;

    println!("✅ {} bars written to {:?}", bars.len(), bars_path);
    println!("✅ {} events written to {:?}", events.len(), events_path);
    println!(
        "Run with: speedy-chart --offline --fixture {:?} --events {:?}",
        bars_path, events_path
    );
    Ok(())
}

/// xorshift64*: same seed, same series.
struct Noise(u64);

impl Noise {
    fn next_unit(&mut self) -> f64 {
        self.0 ^= self.0 >> 12;
        self.0 ^= self.0 << 25;
        self.0 ^= self.0 >> 27;
        let bits = self.0.wrapping_mul(0x2545_f491_4f6c_dd1d) >> 11;
        bits as f64 / (1u64 << 53) as f64
    }

    /// Roughly centred on zero, in `[-1, 1)`.
    fn next_signed(&mut self) -> f64 {
        self.next_unit() * 2.0 - 1.0
    }
}

/// Weekday bars ending on or before `end`, oldest first.
fn synthetic_bars(end: NaiveDate, count: usize) -> Vec<Bar> {
    let mut days = Vec::with_capacity(count);
    let mut day = end;
    while days.len() < count {
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            days.push(day);
        }
        day = day - Days::new(1);
    }
    days.reverse();

    let mut noise = Noise(SEED);
    let mut close = START_PRICE;
    days.into_iter()
        .enumerate()
        .map(|(i, day)| {
            let drift = (i as f64 / 40.0).sin() * 0.004;
            let open = close * (1.0 + noise.next_signed() * 0.006);
            close = (open * (1.0 + drift + noise.next_signed() * 0.015)).max(1.0);
            let high = open.max(close) * (1.0 + noise.next_unit() * 0.01);
            let low = open.min(close) * (1.0 - noise.next_unit() * 0.01);
            let volume = (400_000.0 + noise.next_unit() * 1_600_000.0).round();
            Bar::new(day, round2(open), round2(high), round2(low), round2(close), volume)
        })
        .collect()
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// A spread of announcements over the series, one per category, plus one on
/// a weekend that will not bind to any bar.
fn synthetic_events(bars: &[Bar]) -> Vec<EventRecord> {
    let pick = |back: usize| bars.len().checked_sub(back).and_then(|i| bars.get(i));
    let templates = [
        (8, "Financial Results", "Audited results for the quarter", "17:45:00"),
        (30, "Board Meeting", "Board meeting to consider fund raising", "10:00:00"),
        (55, "General Intimation", "Intimation of analyst meet", "12:30:00"),
        (90, "Dividend", "Final dividend recommended", "16:05:00"),
        (140, "AGM/EGM", "Notice of annual general meeting", "09:15:00"),
    ];

    let mut events: Vec<EventRecord> = templates
        .iter()
        .enumerate()
        .filter_map(|(i, (back, category, headline, time))| {
            let bar = pick(*back)?;
            Some(EventRecord {
                id: Some(format!("demo-{}", i + 1)),
                time: format!("{}T{}", time_utils::day_to_string(bar.time), time),
                category: category.to_string(),
                headline: headline.to_string(),
                summary: Some(format!("{} (synthetic demo announcement).", headline)),
                pdf_url: None,
            })
        })
        .collect();

    if let Some(last) = bars.last() {
        let saturday = last.time - Days::new((last.time.weekday().num_days_from_monday() as u64 + 2) % 7);
        events.push(EventRecord {
            id: Some("demo-weekend".into()),
            time: format!("{}T11:00:00", time_utils::day_to_string(saturday)),
            category: "General".into(),
            headline: "Weekend filing".into(),
            summary: None,
            pdf_url: None,
        });
    }
    events
}
