//! Await-style continuation scheduling.
//!
//! An `await` point is represented as an explicit continuation split: the
//! code after the await is a closure resumed on the microtask queue once
//! the awaited promise settles, with either the fulfilled value or the
//! raised failure.

use crate::event_loop::Scheduler;
use crate::promise::{Completion, Promise};
use core_types::{SimError, Value};
use std::cell::RefCell;
use std::rc::Rc;

/// Registers `continuation` to resume when `promise` settles.
///
/// The continuation is enqueued on the microtask queue, so it runs before
/// any pending timer task. It receives `Ok(value)` on fulfillment or
/// `Err(error)` on rejection; matching on the `Err` arm is the scoped
/// error handler of the simulated `try`/`catch`.
///
/// # Examples
///
/// ```
/// use event_sim::{await_settled, Promise, Scheduler};
/// use core_types::Value;
///
/// let scheduler = Scheduler::new();
/// let promise = Promise::fulfilled(&scheduler, Value::Int(3));
/// await_settled(&promise, |settled| {
///     assert_eq!(settled.unwrap(), Value::Int(3));
/// });
/// scheduler.run();
/// ```
pub fn await_settled<K>(promise: &Promise, continuation: K)
where
    K: FnOnce(Result<Value, SimError>) + 'static,
{
    // The pair of handlers shares one take-once slot; settle-exactly-once
    // guarantees a single taker.
    let slot = Rc::new(RefCell::new(Some(continuation)));
    let fulfilled_slot = Rc::clone(&slot);
    promise.then_or_catch(
        Some(Box::new(move |value| {
            if let Some(resume) = fulfilled_slot.borrow_mut().take() {
                resume(Ok(value));
            }
            Completion::Value(Value::Undefined)
        })),
        Some(Box::new(move |error| {
            if let Some(resume) = slot.borrow_mut().take() {
                resume(Err(error));
            }
            Completion::Value(Value::Undefined)
        })),
    );
}

/// Settles the result promise of an asynchronous function.
///
/// Handed to the body passed to [`async_call`]; the body (or one of its
/// continuations) calls [`finish`](Completer::finish) or
/// [`raise`](Completer::raise) exactly once. Later calls are no-ops, per
/// the settle-once contract.
#[derive(Clone)]
pub struct Completer {
    promise: Promise,
}

impl Completer {
    /// Fulfills the function's result promise.
    pub fn finish(&self, value: Value) {
        self.promise.resolve(value);
    }

    /// Rejects the function's result promise.
    pub fn raise(&self, error: SimError) {
        self.promise.reject(error);
    }
}

/// Runs the body of a hand-sequenced asynchronous function.
///
/// The body executes synchronously up to its first await point, exactly
/// like an async function invocation; continuations registered with
/// [`await_settled`] carry the rest. Returns a promise for the function's
/// overall result, settled through the [`Completer`] passed to the body.
pub fn async_call<F>(scheduler: &Scheduler, body: F) -> Promise
where
    F: FnOnce(Completer),
{
    let promise = Promise::pending(scheduler);
    body(Completer {
        promise: promise.clone(),
    });
    promise
}
