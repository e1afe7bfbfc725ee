use std::time::Duration;

use crate::utils::app_time::AppInstant;

/// Periodic refresh deadline. The only background mutation source;
/// disarmed on teardown so nothing fires for a subscription that is gone.
#[derive(Debug, Clone, Default)]
pub struct PollTimer {
    interval: Option<Duration>,
    next_due: Option<AppInstant>,
}

impl PollTimer {
    /// A zero interval disables polling.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: (!interval.is_zero()).then_some(interval),
            next_due: None,
        }
    }

    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    pub fn arm(&mut self, now: AppInstant) {
        self.next_due = self.interval.map(|i| now + i);
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// True once per elapsed interval; re-arms itself when it fires.
    pub fn fire_if_due(&mut self, now: AppInstant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.arm(now);
                true
            }
            _ => false,
        }
    }

    /// Time left until the next tick, for scheduling a repaint.
    pub fn remaining(&self, now: AppInstant) -> Option<Duration> {
        self.next_due.map(|due| due.saturating_duration_since(now))
    }
}
