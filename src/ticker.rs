use std::time::{Duration, Instant};

/// Default event poll interval in milliseconds
pub const DEFAULT_TICK_MS: u64 = 250;

/// Interval between relative-time refreshes in milliseconds
pub const REFRESH_INTERVAL_MS: u64 = 4000;

/// Get tick duration
pub fn tick_duration() -> Duration {
    Duration::from_millis(DEFAULT_TICK_MS)
}

/// One-shot timer that is re-armed each time it fires.
///
/// The next deadline is measured from the moment of firing, so a late firing
/// pushes every later one back. Starts out due so the first check fires.
#[derive(Debug, Clone)]
pub struct RefreshTimer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl RefreshTimer {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_due: Some(now),
        }
    }

    /// Returns true (and re-arms) if the deadline has passed
    pub fn fire_if_due(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }

    /// Stop the timer for good
    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    #[cfg(test)]
    pub fn is_cancelled(&self) -> bool {
        self.next_due.is_none()
    }
}
