//! Coalescing repaint scheduler.
//!
//! Two states: *Idle* (no pending paint) and *Scheduled* (a paint is
//! queued for ~one frame from now). Any number of requests while already
//! scheduled are absorbed. That is the whole mutation-batching story:
//! every tree mutation asks for a paint, one paint runs. The pending
//! paint is cancelable so teardown can guarantee nothing fires after
//! cleanup.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Repaint cadence, approximating 60Hz.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Shared Idle/Scheduled paint state.
pub struct PaintScheduler {
    deadline: Cell<Option<Instant>>,
    interval: Duration,
}

impl PaintScheduler {
    pub fn new() -> Self {
        Self::with_interval(FRAME_INTERVAL)
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            deadline: Cell::new(None),
            interval,
        }
    }

    /// Request a paint. If one is already scheduled, do nothing.
    pub fn request(&self) {
        if self.deadline.get().is_none() {
            self.deadline.set(Some(Instant::now() + self.interval));
        }
    }

    /// Whether a paint is pending.
    pub fn is_scheduled(&self) -> bool {
        self.deadline.get().is_some()
    }

    /// Time left until the pending paint, zero if overdue, None if idle.
    pub fn due_in(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .get()
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Consume the pending paint if its deadline has passed.
    pub fn take_if_due(&self, now: Instant) -> bool {
        match self.deadline.get() {
            Some(deadline) if now >= deadline => {
                self.deadline.set(None);
                true
            }
            _ => false,
        }
    }

    /// Drop any pending paint.
    pub fn cancel(&self) {
        self.deadline.set(None);
    }
}

impl Default for PaintScheduler {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================
