//! Delayed callbacks measured in host ticks.
//!
//! A keeper never calls itself back directly: it asks a [`Scheduler`] to
//! deliver a [`DueTask`] for its world after some delay, and keeps the
//! returned [`TaskHandle`] as an opaque cancellation token. [`TickScheduler`]
//! is the single-threaded implementation driven by the host tick loop.
//!
//! Handles are never reused, so a stale handle can neither cancel nor be
//! mistaken for a newer task.

use std::collections::BTreeMap;

use timefold_types::WorldId;

/// Opaque token identifying one scheduled callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskHandle(u64);

/// A callback whose delay has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DueTask {
    /// The handle returned when the task was scheduled.
    pub handle: TaskHandle,
    /// The world whose keeper should run.
    pub world: WorldId,
}

/// Scheduling surface consumed by the keepers.
pub trait Scheduler {
    /// Deliver a callback for `world` once `delay` ticks have elapsed.
    ///
    /// A delay of 0 is due on the current tick.
    fn schedule_after(&mut self, delay: u64, world: WorldId) -> TaskHandle;

    /// Cancel a pending callback. Returns `false` if it already fired, was
    /// already cancelled, or never existed.
    fn cancel(&mut self, handle: TaskHandle) -> bool;
}

/// Tick-driven scheduler with a monotonically increasing handle sequence.
#[derive(Debug, Default)]
pub struct TickScheduler {
    /// Current host tick.
    now: u64,
    /// Next handle value to hand out.
    next_handle: u64,
    /// Pending tasks ordered by due tick, then scheduling order.
    queue: BTreeMap<(u64, TaskHandle), WorldId>,
    /// Due tick of every pending handle, for cancellation.
    due_ticks: BTreeMap<TaskHandle, u64>,
}

impl TickScheduler {
    /// Create a scheduler at tick 0 with nothing pending.
    pub fn new() -> Self {
        Self::default()
    }

    /// The current host tick.
    pub const fn now(&self) -> u64 {
        self.now
    }

    /// Move to the next host tick. Returns the new tick.
    pub const fn advance(&mut self) -> u64 {
        self.now = self.now.saturating_add(1);
        self.now
    }

    /// Skip ahead `ticks` host ticks at once. Returns the new tick.
    pub const fn advance_by(&mut self, ticks: u64) -> u64 {
        self.now = self.now.saturating_add(ticks);
        self.now
    }

    /// Due tick of the earliest pending task.
    pub fn next_due(&self) -> Option<u64> {
        self.queue.first_key_value().map(|(&(due, _), _)| due)
    }

    /// Remove and return the earliest task that is due, if any.
    ///
    /// Tasks scheduled with delay 0 while draining are returned by the same
    /// drain.
    pub fn pop_due(&mut self) -> Option<DueTask> {
        let (&(due, handle), _) = self.queue.first_key_value()?;
        if due > self.now {
            return None;
        }
        let world = self.queue.remove(&(due, handle))?;
        self.due_ticks.remove(&handle);
        Some(DueTask { handle, world })
    }

    /// Number of pending tasks.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Whether a handle is still pending.
    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.due_ticks.contains_key(&handle)
    }

    /// Due tick of a pending handle.
    pub fn due_at(&self, handle: TaskHandle) -> Option<u64> {
        self.due_ticks.get(&handle).copied()
    }
}

impl Scheduler for TickScheduler {
    fn schedule_after(&mut self, delay: u64, world: WorldId) -> TaskHandle {
        let handle = TaskHandle(self.next_handle);
        self.next_handle = self.next_handle.saturating_add(1);
        let due = self.now.saturating_add(delay);
        self.queue.insert((due, handle), world);
        self.due_ticks.insert(handle, due);
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) -> bool {
        match self.due_ticks.remove(&handle) {
            Some(due) => self.queue.remove(&(due, handle)).is_some(),
            None => false,
        }
    }
}
