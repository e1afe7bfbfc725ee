use std::collections::HashSet;

use chrono::NaiveDate;
use eframe::egui::{Pos2, Rect, pos2, vec2};

use crate::config::CHART;
use crate::domain::{Event, EventCategory, MarkerStyle};
use crate::engine::mapper::CoordinateMapper;
use crate::models::Series;

/// A glyph pinned to one bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundMarker {
    pub bar_index: usize,
    pub day: NaiveDate,
    /// Index into the event list; `None` for the target-date highlight
    pub event_index: Option<usize>,
    pub style: MarkerStyle,
}

impl BoundMarker {
    pub fn is_target(&self) -> bool {
        self.event_index.is_none()
    }
}

/// Events bound to bars by calendar day. Events with no bar on their day
/// are left out. One marker per day; the first event on a day owns it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarkerLayer {
    markers: Vec<BoundMarker>,
}

impl MarkerLayer {
    /// `target` adds a highlight marker when a bar exists on that day and
    /// no event already sits there.
    pub fn bind(series: &Series, events: &[Event], target: Option<NaiveDate>) -> Self {
        let mut taken: HashSet<NaiveDate> = HashSet::new();
        let mut markers: Vec<BoundMarker> = events
            .iter()
            .enumerate()
            .filter_map(|(event_index, event)| {
                let day = event.day();
                let bar_index = series.index_of(day)?;
                taken.insert(day).then_some(BoundMarker {
                    bar_index,
                    day,
                    event_index: Some(event_index),
                    style: event.style(),
                })
            })
            .collect();

        if let Some(day) = target
            && !taken.contains(&day)
            && let Some(bar_index) = series.index_of(day)
        {
            markers.push(BoundMarker {
                bar_index,
                day,
                event_index: None,
                style: EventCategory::Other.style(),
            });
        }

        markers.sort_by_key(|m| m.bar_index);
        Self { markers }
    }

    pub fn markers(&self) -> &[BoundMarker] {
        &self.markers
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn at_bar(&self, bar_index: usize) -> Option<&BoundMarker> {
        self.markers
            .binary_search_by_key(&bar_index, |m| m.bar_index)
            .ok()
            .map(|i| &self.markers[i])
    }

    /// Screen position of each marker in view: just above the bar's high.
    pub fn positions(&self, series: &Series, mapper: &CoordinateMapper) -> Vec<(BoundMarker, Pos2)> {
        let lift = CHART.marker_radius_px * 2.0;
        self.markers
            .iter()
            .filter_map(|m| {
                let bar = series.get(m.bar_index)?;
                let x = mapper.index_to_x(m.bar_index)?;
                let y = mapper.price_to_y(bar.high)?;
                Some((*m, pos2(x, (y - lift).max(mapper.plot_rect().top()))))
            })
            .collect()
    }

    /// Event under a click: the pointer resolves to a bar through the
    /// inverse x mapping, and that bar must carry an event marker.
    pub fn event_at(&self, mapper: &CoordinateMapper, pointer: Pos2) -> Option<usize> {
        if !mapper.plot_rect().contains(pointer) {
            return None;
        }
        let bar_index = mapper.x_to_index(pointer.x)?;
        self.at_bar(bar_index)?.event_index
    }
}

/// An open event popup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopupState {
    pub event_index: usize,
    /// Click position the popup hangs off
    pub anchor: Pos2,
}

/// Popup rectangle next to `anchor`, kept inside `container`.
pub fn popup_rect(anchor: Pos2, container: Rect) -> Rect {
    let cfg = CHART.popup;
    let local = anchor - container.min;
    let max_left = container.width() - cfg.width_px - cfg.inset_px;
    let max_top = container.height() - cfg.height_px;
    let left = (local.x + cfg.offset_x_px).min(max_left).max(cfg.inset_px);
    let top = (local.y - cfg.offset_y_px).min(max_top).max(cfg.inset_px);
    Rect::from_min_size(container.min + vec2(left, top), vec2(cfg.width_px, cfg.height_px))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Bar;
    use crate::engine::viewport::Viewport;
    use chrono::NaiveDateTime;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn series() -> Series {
        // No bar on the 4th
        let bars = [1, 2, 3, 5, 6]
            .iter()
            .map(|&d| Bar::new(day(d), 10.0, 12.0, 8.0, 11.0, 100.0))
            .collect();
        Series::from_canonical(bars)
    }

    fn event(d: u32, hour: u32, category: EventCategory) -> Event {
        Event {
            id: Some(format!("{d}-{hour}")),
            time: NaiveDateTime::new(day(d), chrono::NaiveTime::from_hms_opt(hour, 0, 0).unwrap()),
            category_label: String::new(),
            category,
            headline: "headline".into(),
            summary: None,
            pdf_url: None,
        }
    }

    #[test]
    fn binds_by_calendar_day_and_drops_unmatched() {
        let s = series();
        let events = vec![
            event(2, 17, EventCategory::Result),
            event(4, 10, EventCategory::Dividend),
            event(2, 9, EventCategory::General),
        ];
        let layer = MarkerLayer::bind(&s, &events, None);
        assert_eq!(layer.markers().len(), 1);
        let m = layer.markers()[0];
        assert_eq!(m.bar_index, 1);
        assert_eq!(m.event_index, Some(0));
        assert_eq!(m.style.glyph, 'R');
        assert!(layer.markers().iter().all(|m| m.day != day(4)));
    }

    #[test]
    fn target_marker_only_on_free_bar_day() {
        let s = series();
        let events = vec![event(2, 10, EventCategory::Result)];
        let layer = MarkerLayer::bind(&s, &events, Some(day(5)));
        assert_eq!(layer.markers().len(), 2);
        assert!(layer.at_bar(3).unwrap().is_target());
        assert_eq!(layer.at_bar(3).unwrap().style.glyph, 'A');

        assert_eq!(MarkerLayer::bind(&s, &events, Some(day(2))).markers().len(), 1);
        assert_eq!(MarkerLayer::bind(&s, &events, Some(day(4))).markers().len(), 1);
    }

    #[test]
    fn click_resolves_through_bar_column() {
        let s = series();
        let events = vec![event(3, 10, EventCategory::BoardMeeting)];
        let layer = MarkerLayer::bind(&s, &events, None);
        let plot = Rect::from_min_max(pos2(0.0, 0.0), pos2(500.0, 200.0));
        let vp = Viewport { from: day(1), to: day(6) };
        let mapper = CoordinateMapper::new(plot, &s, vp, [0.0f64; 0]).unwrap();

        // Five bars, 100px each; the 3rd is x in [200, 300)
        assert_eq!(layer.event_at(&mapper, pos2(250.0, 150.0)), Some(0));
        assert_eq!(layer.event_at(&mapper, pos2(150.0, 150.0)), None);
        assert_eq!(layer.event_at(&mapper, pos2(250.0, 250.0)), None);

        let positions = layer.positions(&s, &mapper);
        assert_eq!(positions.len(), 1);
        assert_eq!(positions[0].1.x, 250.0);
    }

    #[test]
    fn popup_stays_inside_container() {
        let container = Rect::from_min_max(pos2(0.0, 0.0), pos2(800.0, 400.0));
        let near_corner = popup_rect(pos2(790.0, 395.0), container);
        assert!(container.contains_rect(near_corner));
        assert_eq!(near_corner.left(), 800.0 - 290.0);
        assert_eq!(near_corner.top(), 400.0 - 180.0);

        let near_top = popup_rect(pos2(100.0, 20.0), container);
        assert_eq!(near_top.left(), 110.0);
        assert_eq!(near_top.top(), 10.0);
    }
}
