use std::time::{Duration, Instant};

/// Source of monotonic time. Swapped for a manual clock in tests.
pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Repeating deadline checked by elapsed-time comparison.
///
/// Nothing sleeps or wakes here: the owner asks [`LivenessTimer::poll_due`]
/// once per loop iteration, so the timer fires with iteration granularity.
pub struct LivenessTimer<C: Clock = SystemClock> {
    interval: Duration,
    deadline: Instant,
    clock: C,
}

impl<C: Clock> LivenessTimer<C> {
    pub fn new(interval: Duration, clock: C) -> Self {
        let deadline = clock.now() + interval;
        Self { interval, deadline, clock }
    }

    /// True if the deadline has passed. Firing resets the deadline to
    /// `now + interval`, so a late check never fires twice in a row.
    pub fn poll_due(&mut self) -> bool {
        let now = self.clock.now();
        if now < self.deadline {
            return false;
        }
        self.deadline = now + self.interval;
        true
    }
}
