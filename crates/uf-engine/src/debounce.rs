//! Debounced recompute scheduling.
//!
//! The engine owns no timer.  Input handlers call
//! [`RecomputeScheduler::schedule`] with the current monotonic time; the
//! host's event loop calls [`RecomputeScheduler::take_due`] (via
//! `TrafficEngine::poll`) as often as it likes.  A monotonically increasing
//! epoch makes supersession explicit: scheduling again cancels whatever was
//! pending, so only the most recent deadline ever fires.

/// One pending recompute deadline, superseded by any newer schedule.
#[derive(Default, Debug)]
pub struct RecomputeScheduler {
    epoch: u64,
    /// `(epoch, due_ms)` of the pending recompute, if any.
    pending: Option<(u64, u64)>,
}

impl RecomputeScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule a recompute `delay_ms` from `now_ms`, cancelling any pending
    /// one.  Returns the new epoch (mostly useful for logging/tests).
    pub fn schedule(&mut self, now_ms: u64, delay_ms: u64) -> u64 {
        self.epoch += 1;
        self.pending = Some((self.epoch, now_ms.saturating_add(delay_ms)));
        self.epoch
    }

    /// Drop the pending deadline without running it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Deadline check without consuming the schedule.
    pub fn is_due(&self, now_ms: u64) -> bool {
        matches!(self.pending, Some((_, due)) if now_ms >= due)
    }

    /// Consume the pending schedule if its deadline has passed.
    ///
    /// Returns `true` exactly once per schedule: the caller runs the
    /// recompute, and later polls return `false` until something is
    /// scheduled again.
    pub fn take_due(&mut self, now_ms: u64) -> bool {
        if self.is_due(now_ms) {
            self.pending = None;
            true
        } else {
            false
        }
    }
}
