//! Timer port used by the engine to pace itself.
//!
//! The engine never sleeps. It asks a [`TickScheduler`] to call it back after
//! a delay and gets a [`TickHandle`]; the host later hands due handles back to
//! the engine. [`ManualScheduler`] drives time by hand for deterministic play
//! and tests, [`RealtimeScheduler`] follows the wall clock for the terminal
//! front-end.

use std::time::{Duration, Instant};

/// Identifies one scheduled callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickHandle(u64);

/// Source of time and delayed callbacks for the engine
pub trait TickScheduler {
    /// Time elapsed on this scheduler's clock
    fn now(&self) -> Duration;

    /// Request a callback `delay` from now
    fn schedule(&mut self, delay: Duration) -> TickHandle;

    /// Drop a pending callback. Unknown or already fired handles are ignored.
    fn cancel(&mut self, handle: TickHandle);
}

/// Pending callbacks ordered by deadline, shared by both schedulers
#[derive(Debug, Default)]
struct TimerQueue {
    next_id: u64,
    pending: Vec<(Duration, TickHandle)>,
}

impl TimerQueue {
    fn push(&mut self, deadline: Duration) -> TickHandle {
        let handle = TickHandle(self.next_id);
        self.next_id += 1;
        self.pending.push((deadline, handle));
        handle
    }

    fn cancel(&mut self, handle: TickHandle) {
        self.pending.retain(|(_, pending)| *pending != handle);
    }

    fn next_deadline(&self) -> Option<Duration> {
        self.pending.iter().map(|(deadline, _)| *deadline).min()
    }

    /// Remove the earliest callback due at or before `now`
    fn pop_due(&mut self, now: Duration) -> Option<TickHandle> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, (deadline, _))| *deadline <= now)
            .min_by_key(|(_, entry)| **entry)
            .map(|(index, _)| index)?;
        Some(self.pending.remove(index).1)
    }

    fn len(&self) -> usize {
        self.pending.len()
    }
}

/// Virtual clock advanced explicitly by the caller
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    queue: TimerQueue,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deadline of the earliest pending callback
    pub fn next_deadline(&self) -> Option<Duration> {
        self.queue.next_deadline()
    }

    /// Move the clock forward without firing anything
    pub fn advance_clock(&mut self, dt: Duration) {
        self.now += dt;
    }

    /// Jump the clock to the earliest deadline and return its handle
    pub fn advance_to_next(&mut self) -> Option<TickHandle> {
        let deadline = self.queue.next_deadline()?;
        self.now = self.now.max(deadline);
        self.queue.pop_due(self.now)
    }

    /// Move the clock forward by `dt` and return every callback now due,
    /// earliest first
    pub fn advance(&mut self, dt: Duration) -> Vec<TickHandle> {
        self.now += dt;
        std::iter::from_fn(|| self.queue.pop_due(self.now)).collect()
    }

    /// Number of callbacks waiting to fire
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

impl TickScheduler for ManualScheduler {
    fn now(&self) -> Duration {
        self.now
    }

    fn schedule(&mut self, delay: Duration) -> TickHandle {
        self.queue.push(self.now + delay)
    }

    fn cancel(&mut self, handle: TickHandle) {
        self.queue.cancel(handle);
    }
}

/// Scheduler following the monotonic wall clock
#[derive(Debug)]
pub struct RealtimeScheduler {
    origin: Instant,
    queue: TimerQueue,
}

impl RealtimeScheduler {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            queue: TimerQueue::default(),
        }
    }

    /// Instant at which the earliest pending callback is due
    pub fn next_deadline(&self) -> Option<Instant> {
        self.queue
            .next_deadline()
            .map(|deadline| self.origin + deadline)
    }

    /// Remove and return every callback due at `now`, earliest first
    pub fn take_due(&mut self, now: Instant) -> Vec<TickHandle> {
        let now = now.saturating_duration_since(self.origin);
        std::iter::from_fn(|| self.queue.pop_due(now)).collect()
    }
}

impl Default for RealtimeScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl TickScheduler for RealtimeScheduler {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    fn schedule(&mut self, delay: Duration) -> TickHandle {
        let deadline = self.now() + delay;
        self.queue.push(deadline)
    }

    fn cancel(&mut self, handle: TickHandle) {
        self.queue.cancel(handle);
    }
}
