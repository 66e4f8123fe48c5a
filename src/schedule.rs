//! Delayed tasks driven by the simulation clock.
//!
//! Every task is stamped with the scheduler's generation when it is
//! scheduled. Bumping the generation invalidates everything scheduled
//! before it, so a task from a superseded state never runs even if it is
//! already due.

use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Debug)]
struct Pending<T> {
    id: TaskId,
    due: Duration,
    generation: u64,
    task: T,
}

#[derive(Debug)]
pub struct Scheduler<T> {
    now: Duration,
    next_id: u64,
    generation: u64,
    pending: Vec<Pending<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Scheduler<T> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            next_id: 0,
            generation: 0,
            pending: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.pending
            .iter()
            .filter(|p| p.generation == self.generation)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn schedule(&mut self, delay: Duration, task: T) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            due: self.now + delay,
            generation: self.generation,
            task,
        });
        id
    }

    /// Remove a single task. Returns false if it already ran or was dropped.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    /// Start a new generation. Tasks from older generations are discarded
    /// instead of run when they come due.
    pub fn invalidate(&mut self) {
        self.generation += 1;
    }

    /// Drop every pending task and start a new generation.
    pub fn cancel_all(&mut self) {
        self.pending.clear();
        self.invalidate();
    }

    pub fn advance(&mut self, dt: f32) {
        if dt > 0.0 && dt.is_finite() {
            self.now += Duration::from_secs_f32(dt);
        }
    }

    /// Take the earliest task that is due and still current. Call in a loop
    /// so a task that cancels the others is honoured immediately.
    pub fn pop_due(&mut self) -> Option<T> {
        loop {
            let idx = self
                .pending
                .iter()
                .enumerate()
                .filter(|(_, p)| p.due <= self.now)
                .min_by_key(|(_, p)| (p.due, p.id.0))
                .map(|(idx, _)| idx)?;

            let pending = self.pending.remove(idx);
            if pending.generation == self.generation {
                return Some(pending.task);
            }
            tracing::debug!(id = pending.id.0, "dropped stale scheduled task");
        }
    }
}
