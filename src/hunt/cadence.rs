//! Fixed-period tick schedule for the hunt loop.
//!
//! Events arriving between ticks do not move the next deadline; only a
//! change of interval (a mode switch) restarts the period.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cadence {
    interval_ms: u64,
    next_ms: u64,
}

impl Cadence {
    pub fn new(interval_ms: u64, now_ms: u64) -> Self {
        Self {
            interval_ms,
            next_ms: now_ms + interval_ms,
        }
    }

    /// Absolute time of the next tick.
    pub fn deadline_ms(&self) -> u64 {
        self.next_ms
    }

    /// The tick at `deadline_ms` fired. Periods missed while the loop was
    /// busy are skipped rather than fired back to back.
    pub fn fire(&mut self, now_ms: u64) {
        self.next_ms += self.interval_ms;
        if self.next_ms <= now_ms {
            self.next_ms = now_ms + self.interval_ms;
        }
    }

    /// Adopt the interval for the current mode. Returns whether it changed.
    pub fn retime(&mut self, interval_ms: u64, now_ms: u64) -> bool {
        if interval_ms == self.interval_ms {
            return false;
        }
        *self = Self::new(interval_ms, now_ms);
        true
    }
}
