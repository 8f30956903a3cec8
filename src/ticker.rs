use std::time::{Duration, Instant};

/// Fixed-interval timer that the game loop polls between input batches.
pub struct Ticker {
    interval: Duration,
    next: Option<Instant>,
}

impl Ticker {
    /// Creates a running ticker whose first tick is due one interval after `now`.
    pub fn new(interval: Duration, now: Instant) -> Self {
        Ticker { interval, next: Some(now + interval) }
    }

    /// Returns true at most once per interval. Missed intervals are not replayed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next {
            Some(due) if now >= due => {
                let mut next = due + self.interval;
                if next <= now {
                    next = now + self.interval;
                }
                self.next = Some(next);
                true
            }
            _ => false,
        }
    }

    pub fn start(&mut self, now: Instant) {
        self.next = Some(now + self.interval);
    }

    pub fn stop(&mut self) {
        self.next = None;
    }

    /// Time left until the next tick, or `None` while stopped.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.next.map(|due| due.saturating_duration_since(now))
    }
}
