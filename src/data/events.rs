use std::path::Path;

use anyhow::{Context, Result};

use crate::domain::event::{Event, EventRecord, events_from_records};

/// Parses the embedding page's announcement list (a JSON array).
pub fn parse_events(json: &str) -> Result<Vec<Event>> {
    let records: Vec<EventRecord> =
        serde_json::from_str(json).context("Event list is not a JSON array of announcements")?;
    Ok(events_from_records(records))
}

pub fn load_events_from_path(path: &Path) -> Result<Vec<Event>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read events from {:?}", path))?;
    let events = parse_events(&json)?;
    log::info!("Loaded {} event(s) from {:?}", events.len(), path);
    Ok(events)
}
