//! Deterministic event-loop simulation core.
//!
//! This crate provides the cooperative scheduling components of the
//! simulator:
//! - Scheduler with timer and microtask queues over a virtual clock
//! - Promise-equivalent settlement state machine with chaining and `all`
//! - Await-style continuation scheduling
//!
//! # Overview
//!
//! The simulator reproduces single-threaded run-to-completion execution:
//! - [`Scheduler`] - Drain loop coordinating task execution
//! - [`Promise`] - Settle-once eventual values with `then`/`catch`
//! - [`await_settled`] / [`async_call`] - Continuation/resume split for
//!   simulated async functions
//! - [`VirtualClock`] - Deterministic virtual time
//!
//! # Examples
//!
//! ## Scheduler usage
//!
//! ```
//! use event_sim::Scheduler;
//! use core_types::Value;
//!
//! let scheduler = Scheduler::new();
//! scheduler.schedule(|| Ok(Value::Undefined), 1000);
//! scheduler.schedule_now(|| Ok(Value::Undefined));
//! scheduler.run();
//! ```
//!
//! ## Promise usage
//!
//! ```
//! use event_sim::{Promise, PromiseState, Scheduler};
//! use core_types::Value;
//!
//! let scheduler = Scheduler::new();
//! let promise = Promise::pending(&scheduler);
//! promise.resolve(Value::Int(42));
//! assert_eq!(promise.state(), PromiseState::Fulfilled);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod async_task;
pub mod clock;
pub mod event_loop;
pub mod fault;
pub mod promise;
pub mod task_queue;

// Re-export main types at crate root
pub use async_task::{async_call, await_settled, Completer};
pub use clock::VirtualClock;
pub use event_loop::Scheduler;
pub use fault::{CaptureReporter, FaultReporter, StderrReporter};
pub use promise::{Completion, FulfillHandler, Promise, PromiseState, RejectHandler};
pub use task_queue::{MicroTask, MicrotaskQueue, Task, TaskId, TimerQueue};
