use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::CHART;
#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::models::Series;

/// Range-selector ladder.
#[derive(
    Copy, Clone, PartialEq, Eq, Hash, Default, Debug, Serialize, Deserialize, strum_macros::EnumIter,
)]
pub enum RangeKey {
    D1,
    D3,
    W1,
    #[default]
    M1,
    M3,
    M6,
    All,
}

impl RangeKey {
    /// Approximate number of bars shown.
    pub fn day_count(&self) -> usize {
        match self {
            RangeKey::D1 => 1,
            RangeKey::D3 => 3,
            RangeKey::W1 => 7,
            RangeKey::M1 => 30,
            RangeKey::M3 => 90,
            RangeKey::M6 => 180,
            RangeKey::All => 730,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RangeKey::D1 => "1D",
            RangeKey::D3 => "3D",
            RangeKey::W1 => "1W",
            RangeKey::M1 => "1M",
            RangeKey::M3 => "3M",
            RangeKey::M6 => "6M",
            RangeKey::All => "ALL",
        }
    }
}

/// Visible window. Both ends are days that exist in the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl Viewport {
    /// Window spanning series indices `first..=last`, clamped to the series.
    fn from_indices(series: &Series, first: usize, last: usize) -> Option<Self> {
        let last = last.min(series.len().checked_sub(1)?);
        let first = first.min(last);
        Some(Viewport {
            from: series.get(first)?.time,
            to: series.get(last)?.time,
        })
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.from <= day && day <= self.to
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewportState {
    #[default]
    Unset,
    RangeSelected { range: RangeKey, viewport: Viewport },
    Focused { target: NaiveDate, viewport: Viewport },
}

/// Unset -> RangeSelected -> Focused, and back to RangeSelected on a range pick.
#[derive(Debug, Clone, Default)]
pub struct ViewportController {
    state: ViewportState,
    /// Range to restore after a reload or to leave a focus
    range: RangeKey,
}

impl ViewportController {
    pub fn new(range: RangeKey) -> Self {
        Self {
            state: ViewportState::Unset,
            range,
        }
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn viewport(&self) -> Option<Viewport> {
        match self.state {
            ViewportState::Unset => None,
            ViewportState::RangeSelected { viewport, .. } | ViewportState::Focused { viewport, .. } => {
                Some(viewport)
            }
        }
    }

    /// The active range key, or `None` while focused on a date.
    pub fn active_range(&self) -> Option<RangeKey> {
        match self.state {
            ViewportState::RangeSelected { range, .. } => Some(range),
            _ => None,
        }
    }

    pub fn reset(&mut self) {
        self.state = ViewportState::Unset;
    }

    /// Last `min(day_count, len)` bars. An empty series leaves the state Unset.
    pub fn select_range(&mut self, series: &Series, range: RangeKey) -> Option<Viewport> {
        self.range = range;
        let n = series.len();
        let Some(viewport) = Viewport::from_indices(series, n.saturating_sub(range.day_count()), n.saturating_sub(1)) else {
            self.state = ViewportState::Unset;
            return None;
        };
        self.transition(ViewportState::RangeSelected { range, viewport });
        Some(viewport)
    }

    /// Centres on `target` with the configured half-window either side.
    /// No bar on that exact day: nothing changes and `false` is returned.
    pub fn focus(&mut self, series: &Series, target: NaiveDate) -> bool {
        let Some(index) = series.index_of(target) else {
            #[cfg(debug_assertions)]
            if DEBUG_FLAGS.print_viewport_transitions {
                log::debug!("Focus on {} ignored: no bar on that day", target);
            }
            return false;
        };
        let half = CHART.focus_half_window;
        match Viewport::from_indices(series, index.saturating_sub(half), index + half) {
            Some(viewport) => {
                self.transition(ViewportState::Focused { target, viewport });
                true
            }
            None => false,
        }
    }

    /// Re-derives the window after the series was replaced.
    /// A focus whose target vanished falls back to the remembered range.
    pub fn rebase(&mut self, series: &Series) -> Option<Viewport> {
        if let ViewportState::Focused { target, .. } = self.state
            && self.focus(series, target)
        {
            return self.viewport();
        }
        self.select_range(series, self.range)
    }

    fn transition(&mut self, next: ViewportState) {
        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_viewport_transitions && self.state != next {
            log::debug!("Viewport: {:?} -> {:?}", self.state, next);
        }
        self.state = next;
    }
}
