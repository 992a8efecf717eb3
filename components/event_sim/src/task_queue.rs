//! Task and microtask queue management.
//!
//! This module provides the timer queue and microtask queue used by the
//! scheduler. Timer tasks fire in `(ready_at, id)` order; microtasks are
//! FIFO and drain completely before the next timer task is taken.

use core_types::{SimError, Value};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, VecDeque};

/// The callable a task or microtask runs. The returned value is ignored;
/// an error is reported by the scheduler and isolated to the one task.
type ActionFn = dyn FnOnce() -> Result<Value, SimError>;

/// Identifier assigned to a task at registration time.
///
/// Ids are handed out in increasing order, so they double as the FIFO
/// tie-break between tasks with equal deadlines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(u64);

impl TaskId {
    /// Creates an id from a raw sequence number.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw sequence number.
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

/// A deferred unit of work.
///
/// A task is created at the call site that schedules it, lives in the
/// timer queue until its deadline is reached and the drain loop selects
/// it, and is destroyed immediately after its action completes. There are
/// no repeating timers.
pub struct Task {
    id: TaskId,
    ready_at: u64,
    action: Box<ActionFn>,
}

impl Task {
    /// Creates a new task.
    ///
    /// # Arguments
    ///
    /// * `id` - Registration sequence number, used as tie-break
    /// * `ready_at` - Virtual-time deadline in milliseconds
    /// * `action` - The function to execute when the task fires
    pub fn new<F>(id: TaskId, ready_at: u64, action: F) -> Self
    where
        F: FnOnce() -> Result<Value, SimError> + 'static,
    {
        Self {
            id,
            ready_at,
            action: Box::new(action),
        }
    }

    /// Returns the task's id.
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task's virtual-time deadline.
    pub fn ready_at(&self) -> u64 {
        self.ready_at
    }

    /// Executes the task, consuming it.
    pub fn run(self) -> Result<Value, SimError> {
        (self.action)()
    }
}

impl std::fmt::Debug for Task {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Task {{ id: {:?}, ready_at: {} }}", self.id, self.ready_at)
    }
}

/// An immediate continuation.
///
/// Microtasks carry promise reactions and await resumptions. They have no
/// deadline; the queue drains them in FIFO order with strict priority over
/// timer tasks.
pub struct MicroTask {
    callback: Box<ActionFn>,
}

impl MicroTask {
    /// Creates a new microtask from a closure.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() -> Result<Value, SimError> + 'static,
    {
        Self {
            callback: Box::new(f),
        }
    }

    /// Executes the microtask, consuming it.
    pub fn run(self) -> Result<Value, SimError> {
        (self.callback)()
    }
}

impl std::fmt::Debug for MicroTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MicroTask {{ ... }}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct QueueEntry {
    ready_at: u64,
    id: TaskId,
}

/// The timer queue: an ordered multiset of pending tasks.
///
/// Invariant: for any two pending tasks A and B, if
/// `A.ready_at < B.ready_at` then A fires strictly before B; on equal
/// deadlines the lower id fires first.
///
/// Ordering entries live in a binary heap while actions live in a slot
/// map keyed by id, so cancellation is O(1) and stale heap entries are
/// skipped lazily on pop.
#[derive(Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Reverse<QueueEntry>>,
    actions: HashMap<TaskId, Box<ActionFn>>,
}

impl TimerQueue {
    /// Creates a new empty timer queue.
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            actions: HashMap::new(),
        }
    }

    /// Inserts a task into the queue.
    pub fn insert(&mut self, task: Task) {
        let Task {
            id,
            ready_at,
            action,
        } = task;
        self.heap.push(Reverse(QueueEntry { ready_at, id }));
        self.actions.insert(id, action);
    }

    /// Removes and returns the pending task with the lowest
    /// `(ready_at, id)`, or `None` if the queue is empty.
    pub fn pop_next(&mut self) -> Option<Task> {
        while let Some(Reverse(entry)) = self.heap.pop() {
            if let Some(action) = self.actions.remove(&entry.id) {
                return Some(Task {
                    id: entry.id,
                    ready_at: entry.ready_at,
                    action,
                });
            }
        }
        None
    }

    /// Removes the task with the given id if it is still pending.
    ///
    /// Returns `true` if the task was removed, `false` if it already
    /// fired or the id is unknown.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.actions.remove(&id).is_some()
    }

    /// Returns true if no tasks are pending.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the number of pending tasks.
    pub fn len(&self) -> usize {
        self.actions.len()
    }
}

impl std::fmt::Debug for TimerQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TimerQueue {{ len: {} }}", self.len())
    }
}

/// The microtask queue.
///
/// Drained completely, in FIFO order, before each timer task.
#[derive(Debug, Default)]
pub struct MicrotaskQueue {
    queue: VecDeque<MicroTask>,
}

impl MicrotaskQueue {
    /// Creates a new empty microtask queue.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Adds a microtask to the end of the queue.
    pub fn enqueue(&mut self, microtask: MicroTask) {
        self.queue.push_back(microtask);
    }

    /// Removes and returns the next microtask from the queue.
    pub fn dequeue(&mut self) -> Option<MicroTask> {
        self.queue.pop_front()
    }

    /// Returns true if the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of microtasks in the queue.
    pub fn len(&self) -> usize {
        self.queue.len()
    }
}
