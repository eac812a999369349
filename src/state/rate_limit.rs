//! Throttling and debouncing driven by caller-supplied clocks.
//!
//! Neither type spawns timers. Callers pass `Instant`s with every event and
//! call `poll` from their event loop to release trailing values.

use std::time::{Duration, Instant};

/// Leading-and-trailing throttle: the first value passes immediately, later
/// values within the interval are held and the latest one is released once the
/// interval has elapsed.
#[derive(Debug, Clone)]
pub struct Throttle<T> {
    interval: Duration,
    last_emit: Option<Instant>,
    pending: Option<T>,
}

impl<T> Throttle<T> {
    /// Throttle with the given minimum spacing.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_emit: None,
            pending: None,
        }
    }

    fn ready(&self, now: Instant) -> bool {
        self.last_emit
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval)
    }

    /// Offer a value. Returns it if it may pass now; otherwise it replaces any
    /// held value.
    pub fn push(&mut self, now: Instant, value: T) -> Option<T> {
        if self.ready(now) {
            self.last_emit = Some(now);
            self.pending = None;
            Some(value)
        } else {
            self.pending = Some(value);
            None
        }
    }

    /// Release the held value if the interval has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.pending.is_some() && self.ready(now) {
            self.last_emit = Some(now);
            self.pending.take()
        } else {
            None
        }
    }

    /// Whether a value is held.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Trailing debounce: only the last value of a burst is released, once no new
/// value has arrived for the delay.
#[derive(Debug, Clone)]
pub struct Debounce<T> {
    delay: Duration,
    deadline: Option<Instant>,
    pending: Option<T>,
}

impl<T> Debounce<T> {
    /// Debounce with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
            pending: None,
        }
    }

    /// Record a value and restart the quiet period.
    pub fn push(&mut self, now: Instant, value: T) {
        self.pending = Some(value);
        self.deadline = Some(now + self.delay);
    }

    /// Release the value if the quiet period has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match self.deadline {
            Some(deadline) if now >= deadline => self.flush(),
            _ => None,
        }
    }

    /// Release the held value immediately.
    pub fn flush(&mut self) -> Option<T> {
        self.deadline = None;
        self.pending.take()
    }

    /// Whether a value is held.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
}
