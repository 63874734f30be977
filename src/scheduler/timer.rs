//! Deadline-based repeating timer polled from the UI loop

use std::time::{Duration, Instant};

/// A repeating timer that fires when polled past its deadline
///
/// The timer never fires on its own; the owner polls it each frame. After
/// firing, the next deadline is one period after the missed one, so polling
/// latency does not accumulate. A loop stalled for a whole period or more
/// re-arms from the poll time and produces one tick instead of a burst.
#[derive(Debug, Clone)]
pub struct RepeatingTimer {
    period: Duration,
    deadline: Option<Instant>,
}

impl RepeatingTimer {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            deadline: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Change the period; takes effect at the next start
    pub fn set_period(&mut self, period: Duration) {
        self.period = period;
    }

    /// (Re)arm the timer one period from `now`
    pub fn start(&mut self, now: Instant) {
        self.deadline = Some(now + self.period);
    }

    pub fn stop(&mut self) {
        self.deadline = None;
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns true if the timer fired, re-arming it for the next period
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                let next = deadline + self.period;
                self.deadline = Some(if now >= next { now + self.period } else { next });
                true
            }
            _ => false,
        }
    }
}
