//! Deferred work queue.
//!
//! Work that must not run inside the event that requested it (for example a
//! width recompute right after a structural rebuild, when reused tables have
//! not been laid out yet) is posted here and drained later by the owner.
//!
//! Items are plain values rather than closures so the owner can execute them
//! against its own `&mut self`.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::logging::targets;

/// A unique identifier for a deferred task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

impl TaskId {
    /// Get the raw u64 value of this task ID.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

fn next_task_id() -> TaskId {
    TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
}

#[derive(Debug)]
struct TaskData<T> {
    id: TaskId,
    item: T,
}

/// A FIFO queue of deferred work items.
#[derive(Debug)]
pub struct TaskQueue<T> {
    tasks: VecDeque<TaskData<T>>,
}

impl<T> TaskQueue<T> {
    /// Create an empty task queue.
    pub fn new() -> Self {
        Self {
            tasks: VecDeque::new(),
        }
    }

    /// Post an item to run later.
    ///
    /// Returns the task ID that can be used to cancel it.
    pub fn post(&mut self, item: T) -> TaskId {
        let id = next_task_id();
        self.tasks.push_back(TaskData { id, item });
        tracing::trace!(target: targets::TASK, task = id.as_u64(), pending = self.tasks.len(), "task posted");
        id
    }

    /// Cancel a pending task.
    ///
    /// Returns `true` if the task was found and cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        if let Some(pos) = self.tasks.iter().position(|t| t.id == id) {
            self.tasks.remove(pos);
            true
        } else {
            false
        }
    }

    /// Check if there are any pending tasks.
    pub fn has_pending(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Get the number of pending tasks.
    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    /// Remove every pending item, in posting order.
    ///
    /// Items posted while the returned items are being executed stay queued
    /// for the next drain.
    pub fn drain(&mut self) -> Vec<T> {
        self.tasks.drain(..).map(|t| t.item).collect()
    }

    /// Drop every pending item.
    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}

impl<T: PartialEq> TaskQueue<T> {
    /// Post an item unless an equal item is already pending.
    ///
    /// Returns the ID of the new task, or of the pending task it coalesced into.
    pub fn post_once(&mut self, item: T) -> TaskId {
        if let Some(pending) = self.tasks.iter().find(|t| t.item == item) {
            return pending.id;
        }
        self.post(item)
    }

    /// Check whether an item equal to `item` is pending.
    pub fn is_pending(&self, item: &T) -> bool {
        self.tasks.iter().any(|t| t.item == *item)
    }
}

impl<T> Default for TaskQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
