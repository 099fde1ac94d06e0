use std::time::{Duration, Instant};

/// Fixed-rate frame clock.
///
/// Each call to [`FrameClock::poll`] fires at most one tick and moves the
/// deadline forward by exactly one interval, so a late caller sees every
/// missed tick in turn rather than one merged tick.
#[derive(Debug, Clone)]
pub struct FrameClock {
    interval: Duration,
    next_tick: Instant,
    ticks: u64,
    running: bool,
}

impl FrameClock {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next_tick: now + interval,
            ticks: 0,
            running: true,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When the next tick is due, or `None` once stopped
    pub fn next_deadline(&self) -> Option<Instant> {
        self.running.then_some(self.next_tick)
    }

    /// Fire one tick if it is due at `now`
    pub fn poll(&mut self, now: Instant) -> bool {
        if !self.running || now < self.next_tick {
            return false;
        }
        self.next_tick += self.interval;
        self.ticks += 1;
        log::trace!("tick {}", self.ticks);
        true
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn stop(&mut self) {
        self.running = false;
    }
}
