//! src/meter/pacer.rs
//!
//! Cycle spacing: a cycle starts no earlier than one interval after the
//! previous cycle started. An overrunning cycle (timeouts) pushes the next
//! one back instead of causing a burst of catch-up cycles.

use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    last_start: Option<Instant>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_start: None,
        }
    }

    /// How long to wait at `now` before the next cycle may start.
    pub fn delay(&self, now: Instant) -> Duration {
        match self.last_start {
            None => Duration::ZERO,
            Some(last) => (last + self.interval).saturating_duration_since(now),
        }
    }

    /// Record that a cycle started at `now`.
    pub fn started(&mut self, now: Instant) {
        self.last_start = Some(now);
    }

    /// Sleep until the next cycle is allowed and return its start instant.
    pub fn wait(&mut self) -> Instant {
        let delay = self.delay(Instant::now());
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
        let now = Instant::now();
        self.started(now);
        now
    }
}
