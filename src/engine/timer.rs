//! Explicit timer handles driven by the event loop's clock.
//!
//! Timers never fire on their own. The loop passes the current time in
//! milliseconds and each timer reports whether it is due, so tests can step
//! time deterministically.

/// A repeating timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntervalTimer {
    interval_ms: u64,
    next_due_ms: Option<u64>,
}

impl IntervalTimer {
    /// Create a stopped timer. A zero interval is treated as one millisecond.
    pub fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            next_due_ms: None,
        }
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    /// (Re)start so the first tick lands one interval after `now_ms`.
    /// Saturates at the end of the clock.
    pub fn schedule(&mut self, now_ms: u64) {
        self.next_due_ms = Some(now_ms.saturating_add(self.interval_ms));
    }

    /// Stop the timer; pending ticks are dropped.
    pub fn cancel(&mut self) {
        self.next_due_ms = None;
    }

    pub fn is_active(&self) -> bool {
        self.next_due_ms.is_some()
    }

    /// When the next tick is due, if running.
    pub fn next_due(&self) -> Option<u64> {
        self.next_due_ms
    }

    /// Consume one due tick, if any.
    ///
    /// Call in a loop to catch up after a long gap; ticks come out strictly
    /// in order, one per call. A tick that would land past the end of the
    /// clock stops the timer.
    pub fn fire(&mut self, now_ms: u64) -> bool {
        match self.next_due_ms {
            Some(due) if due <= now_ms => {
                self.next_due_ms = due.checked_add(self.interval_ms);
                true
            }
            _ => false,
        }
    }
}

/// A one-shot deadline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deadline {
    due_ms: Option<u64>,
}

impl Deadline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the deadline `delay_ms` after `now_ms`.
    pub fn arm(&mut self, now_ms: u64, delay_ms: u64) {
        self.due_ms = Some(now_ms.saturating_add(delay_ms));
    }

    pub fn disarm(&mut self) {
        self.due_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.due_ms.is_some()
    }

    /// Fire once when due; disarms itself.
    pub fn fire(&mut self, now_ms: u64) -> bool {
        match self.due_ms {
            Some(due) if due <= now_ms => {
                self.due_ms = None;
                true
            }
            _ => false,
        }
    }
}
