//! Timer queue for continuations that wait on simulated time.
//!
//! Every entry belongs to an owner. Dropping an owner cancels all of its
//! pending entries through [`TimerQueue::cancel_owner`], so a continuation
//! never fires for something that no longer exists.

use std::time::Duration;

/// Handle returned when scheduling a timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl TimerId {
    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

#[derive(Clone, Debug)]
struct PendingTimer<O, P> {
    id: TimerId,
    owner: O,
    due: Duration,
    payload: P,
}

/// Queue of payloads released once enough simulated time has passed.
#[derive(Clone, Debug)]
pub struct TimerQueue<O, P> {
    now: Duration,
    next_id: u64,
    pending: Vec<PendingTimer<O, P>>,
}

impl<O, P> Default for TimerQueue<O, P> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            pending: Vec::new(),
        }
    }
}

impl<O: PartialEq, P> TimerQueue<O, P> {
    /// Creates an empty queue with the clock at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulated time accumulated through [`TimerQueue::advance`].
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of timers still waiting.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Reports whether no timer is waiting.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Schedules `payload` to be released `delay` from now.
    pub fn schedule(&mut self, owner: O, delay: Duration, payload: P) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.pending.push(PendingTimer {
            id,
            owner,
            due: self.now.saturating_add(delay),
            payload,
        });
        id
    }

    /// Cancels a single timer. Returns `false` when it already fired.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|timer| timer.id != id);
        before != self.pending.len()
    }

    /// Cancels every timer scheduled by `owner`, returning how many were dropped.
    pub fn cancel_owner(&mut self, owner: &O) -> usize {
        let before = self.pending.len();
        self.pending.retain(|timer| timer.owner != *owner);
        before - self.pending.len()
    }

    /// Advances the clock and appends every due payload to `out`.
    ///
    /// Payloads are released in due-time order; ties keep scheduling order.
    pub fn advance(&mut self, dt: Duration, out: &mut Vec<P>) {
        self.now = self.now.saturating_add(dt);
        let now = self.now;

        let mut due = Vec::new();
        let mut index = 0;
        while index < self.pending.len() {
            if self.pending[index].due <= now {
                due.push(self.pending.remove(index));
            } else {
                index += 1;
            }
        }

        due.sort_by_key(|timer| (timer.due, timer.id));
        out.extend(due.into_iter().map(|timer| timer.payload));
    }
}
