//! Cooperative scheduler.
//!
//! This module provides the drain loop that coordinates timer tasks and
//! microtasks over a virtual clock, following the single-threaded
//! run-to-completion execution model.

use crate::clock::VirtualClock;
use crate::fault::{FaultReporter, StderrReporter};
use crate::task_queue::{MicroTask, MicrotaskQueue, Task, TaskId, TimerQueue};
use core_types::{SimError, Value};
use std::cell::RefCell;
use std::rc::Rc;

struct SchedulerState {
    clock: VirtualClock,
    timers: TimerQueue,
    microtasks: MicrotaskQueue,
    next_task_id: u64,
    unhandled_faults: Vec<SimError>,
    reporter: Rc<dyn FaultReporter>,
}

/// The cooperative scheduler.
///
/// Each drain iteration:
/// 1. Drains the microtask queue completely
/// 2. Selects the single lowest-`(ready_at, id)` pending timer task
/// 3. Advances the virtual clock to the task's deadline and runs it
/// 4. Repeats until both queues are empty
///
/// Run-to-completion is structural: the caller runs its synchronous entry
/// sequence first, then calls [`run`](Scheduler::run), so no deferred task
/// can interleave with synchronous code.
///
/// `Scheduler` is a cheap-clone handle over shared state; task actions and
/// promise reactions hold clones to schedule further work while the drain
/// loop runs.
///
/// # Examples
///
/// ```
/// use event_sim::Scheduler;
/// use core_types::Value;
///
/// let scheduler = Scheduler::new();
/// scheduler.schedule(|| Ok(Value::Undefined), 1000);
/// scheduler.run();
/// assert_eq!(scheduler.now_ms(), 1000);
/// ```
#[derive(Clone)]
pub struct Scheduler {
    state: Rc<RefCell<SchedulerState>>,
}

impl Scheduler {
    /// Creates a scheduler with empty queues, the clock at zero, and the
    /// stderr fault reporter.
    pub fn new() -> Self {
        Self::with_reporter(Rc::new(StderrReporter))
    }

    /// Creates a scheduler that reports faults through `reporter`.
    pub fn with_reporter(reporter: Rc<dyn FaultReporter>) -> Self {
        Self {
            state: Rc::new(RefCell::new(SchedulerState {
                clock: VirtualClock::new(),
                timers: TimerQueue::new(),
                microtasks: MicrotaskQueue::new(),
                next_task_id: 0,
                unhandled_faults: Vec::new(),
                reporter,
            })),
        }
    }

    /// Registers a task with deadline `now + delay_ms`.
    ///
    /// The deadline is computed from the current virtual time, so a task
    /// scheduled from inside another task's action counts its delay from
    /// that task's fire time.
    ///
    /// # Returns
    ///
    /// The id assigned to the task, usable with [`cancel`](Scheduler::cancel).
    pub fn schedule<F>(&self, action: F, delay_ms: u64) -> TaskId
    where
        F: FnOnce() -> Result<Value, SimError> + 'static,
    {
        let mut state = self.state.borrow_mut();
        let id = TaskId::from_raw(state.next_task_id);
        state.next_task_id += 1;
        let ready_at = state.clock.now_ms().saturating_add(delay_ms);
        state.timers.insert(Task::new(id, ready_at, action));
        id
    }

    /// Registers a zero-delay task.
    ///
    /// Zero-delay tasks registered in the same turn fire in FIFO order,
    /// and only after all synchronous code and pending microtasks.
    pub fn schedule_now<F>(&self, action: F) -> TaskId
    where
        F: FnOnce() -> Result<Value, SimError> + 'static,
    {
        self.schedule(action, 0)
    }

    /// Appends an immediate continuation to the microtask queue.
    pub fn enqueue_microtask<F>(&self, action: F)
    where
        F: FnOnce() -> Result<Value, SimError> + 'static,
    {
        self.state
            .borrow_mut()
            .microtasks
            .enqueue(MicroTask::new(action));
    }

    /// Removes the task with the given id if it is still pending.
    ///
    /// Returns `true` if the task was removed, `false` if it already
    /// fired or the id is unknown.
    pub fn cancel(&self, id: TaskId) -> bool {
        self.state.borrow_mut().timers.cancel(id)
    }

    /// Runs the drain loop until both queues are empty.
    ///
    /// An action that fails is reported through the fault reporter and
    /// recorded; the remaining tasks still run.
    pub fn run(&self) {
        loop {
            self.drain_microtasks();

            let task = self.state.borrow_mut().timers.pop_next();
            let Some(task) = task else {
                break;
            };

            self.state.borrow_mut().clock.advance_to(task.ready_at());
            if let Err(error) = task.run() {
                self.record_fault("Uncaught error in scheduled task", error);
            }
        }
    }

    /// Drains the microtask queue completely.
    ///
    /// Microtasks enqueued while draining are also processed before this
    /// method returns.
    pub fn drain_microtasks(&self) {
        loop {
            let microtask = self.state.borrow_mut().microtasks.dequeue();
            let Some(microtask) = microtask else {
                break;
            };

            if let Err(error) = microtask.run() {
                self.record_fault("Uncaught error in microtask", error);
            }
        }
    }

    /// Returns the current virtual time in milliseconds.
    pub fn now_ms(&self) -> u64 {
        self.state.borrow().clock.now_ms()
    }

    /// Returns the number of pending timer tasks.
    pub fn pending_tasks(&self) -> usize {
        self.state.borrow().timers.len()
    }

    /// Returns the number of pending microtasks.
    pub fn pending_microtasks(&self) -> usize {
        self.state.borrow().microtasks.len()
    }

    /// Returns the faults recorded so far, in report order.
    pub fn unhandled_faults(&self) -> Vec<SimError> {
        self.state.borrow().unhandled_faults.clone()
    }

    pub(crate) fn report_unhandled_rejection(&self, error: &SimError) {
        self.record_fault("Unhandled promise rejection", error.clone());
    }

    fn record_fault(&self, context: &str, error: SimError) {
        let reporter = self.state.borrow().reporter.clone();
        reporter.report(context, &error);
        self.state.borrow_mut().unhandled_faults.push(error);
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        write!(
            f,
            "Scheduler {{ now_ms: {}, pending_tasks: {}, pending_microtasks: {} }}",
            state.clock.now_ms(),
            state.timers.len(),
            state.microtasks.len()
        )
    }
}
