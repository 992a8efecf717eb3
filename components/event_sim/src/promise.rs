//! Promise-equivalent values.
//!
//! This module provides the settlement state machine for eventual values:
//! pending, fulfilled, or rejected, settling exactly once, with reactions
//! invoked in registration order on the microtask queue.

use crate::event_loop::Scheduler;
use core_types::{SimError, Value};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// The state of a promise.
///
/// Once settled (Fulfilled or Rejected), a promise cannot change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromiseState {
    /// The initial state; neither fulfilled nor rejected.
    Pending,
    /// The promise has been resolved with a value.
    Fulfilled,
    /// The promise has been rejected with an error.
    Rejected,
}

/// The outcome a settlement handler produces for its chained promise.
pub enum Completion {
    /// Fulfill the chained promise with a value.
    Value(Value),
    /// Reject the chained promise with an error.
    Error(SimError),
    /// Make the chained promise adopt another promise's settlement.
    Chain(Promise),
}

/// Handler invoked with the fulfilled value.
pub type FulfillHandler = Box<dyn FnOnce(Value) -> Completion>;
/// Handler invoked with the rejection error.
pub type RejectHandler = Box<dyn FnOnce(SimError) -> Completion>;

/// A reaction registered via `then`/`catch`, fired exactly once at
/// settlement.
struct Reaction {
    target: Promise,
    on_fulfilled: Option<FulfillHandler>,
    on_rejected: Option<RejectHandler>,
}

struct PromiseShared {
    state: PromiseState,
    result: Option<Value>,
    error: Option<SimError>,
    reactions: Vec<Reaction>,
    handled: bool,
}

/// A promise-equivalent value.
///
/// `Promise` is a cheap-clone handle; all clones observe the same
/// settlement. Reactions run as microtasks, so they fire after the
/// current synchronous turn but before any timer task.
///
/// # Examples
///
/// ```
/// use event_sim::{Promise, PromiseState, Scheduler};
/// use core_types::Value;
///
/// let scheduler = Scheduler::new();
/// let promise = Promise::pending(&scheduler);
/// assert_eq!(promise.state(), PromiseState::Pending);
///
/// promise.resolve(Value::Int(42));
/// assert_eq!(promise.state(), PromiseState::Fulfilled);
/// assert_eq!(promise.result(), Some(Value::Int(42)));
/// ```
#[derive(Clone)]
pub struct Promise {
    shared: Rc<RefCell<PromiseShared>>,
    scheduler: Scheduler,
}

impl Promise {
    /// Creates a new pending promise bound to `scheduler`.
    pub fn pending(scheduler: &Scheduler) -> Self {
        Self {
            shared: Rc::new(RefCell::new(PromiseShared {
                state: PromiseState::Pending,
                result: None,
                error: None,
                reactions: Vec::new(),
                handled: false,
            })),
            scheduler: scheduler.clone(),
        }
    }

    /// Creates a promise already fulfilled with `value`.
    pub fn fulfilled(scheduler: &Scheduler, value: Value) -> Self {
        let promise = Self::pending(scheduler);
        promise.resolve(value);
        promise
    }

    /// Creates a promise already rejected with `error`.
    pub fn rejected(scheduler: &Scheduler, error: SimError) -> Self {
        let promise = Self::pending(scheduler);
        promise.reject(error);
        promise
    }

    /// Returns the current state.
    pub fn state(&self) -> PromiseState {
        self.shared.borrow().state
    }

    /// Returns the fulfilled value, if any.
    pub fn result(&self) -> Option<Value> {
        self.shared.borrow().result.clone()
    }

    /// Returns the rejection error, if any.
    pub fn error(&self) -> Option<SimError> {
        self.shared.borrow().error.clone()
    }

    /// Returns true if reactions are registered and not yet fired.
    pub fn has_pending_reactions(&self) -> bool {
        !self.shared.borrow().reactions.is_empty()
    }

    /// Fulfills the promise with a value.
    ///
    /// If the promise is already settled this is a no-op with no
    /// observable effect.
    pub fn resolve(&self, value: Value) {
        let reactions = {
            let mut shared = self.shared.borrow_mut();
            if shared.state != PromiseState::Pending {
                return;
            }
            shared.state = PromiseState::Fulfilled;
            shared.result = Some(value);
            std::mem::take(&mut shared.reactions)
        };
        for reaction in reactions {
            self.dispatch(reaction);
        }
    }

    /// Rejects the promise with an error.
    ///
    /// If the promise is already settled this is a no-op. A rejection
    /// that still has no handler when the settlement-check microtask
    /// drains is reported as an unhandled rejection; the simulated
    /// process keeps running.
    pub fn reject(&self, error: SimError) {
        let reactions = {
            let mut shared = self.shared.borrow_mut();
            if shared.state != PromiseState::Pending {
                return;
            }
            shared.state = PromiseState::Rejected;
            shared.error = Some(error);
            std::mem::take(&mut shared.reactions)
        };
        for reaction in reactions {
            self.dispatch(reaction);
        }

        let probe = self.clone();
        self.scheduler.enqueue_microtask(move || {
            let unreported = {
                let shared = probe.shared.borrow();
                if shared.handled {
                    None
                } else {
                    shared.error.clone()
                }
            };
            if let Some(error) = unreported {
                probe.scheduler.report_unhandled_rejection(&error);
            }
            Ok(Value::Undefined)
        });
    }

    /// Registers a fulfillment handler; returns the chained promise.
    pub fn then<F>(&self, on_fulfilled: F) -> Promise
    where
        F: FnOnce(Value) -> Completion + 'static,
    {
        self.then_or_catch(Some(Box::new(on_fulfilled)), None)
    }

    /// Registers a rejection handler; returns the chained promise.
    pub fn catch<F>(&self, on_rejected: F) -> Promise
    where
        F: FnOnce(SimError) -> Completion + 'static,
    {
        self.then_or_catch(None, Some(Box::new(on_rejected)))
    }

    /// Registers a fulfillment/rejection handler pair.
    ///
    /// Returns a new promise settled from the handler's [`Completion`].
    /// With no matching handler the settlement is forwarded to the
    /// chained promise unchanged. Handlers registered after settlement
    /// are dispatched immediately (still via the microtask queue).
    pub fn then_or_catch(
        &self,
        on_fulfilled: Option<FulfillHandler>,
        on_rejected: Option<RejectHandler>,
    ) -> Promise {
        let target = Promise::pending(&self.scheduler);
        let reaction = Reaction {
            target: target.clone(),
            on_fulfilled,
            on_rejected,
        };

        let already_settled = {
            let mut shared = self.shared.borrow_mut();
            shared.handled = true;
            if shared.state == PromiseState::Pending {
                shared.reactions.push(reaction);
                None
            } else {
                Some(reaction)
            }
        };
        if let Some(reaction) = already_settled {
            self.dispatch(reaction);
        }
        target
    }

    /// Fulfills with the ordered list of all fulfilled values, or rejects
    /// with the first rejection observed in completion order.
    ///
    /// Input order is preserved in the result regardless of completion
    /// order. A rejection short-circuits the result but does not cancel
    /// the remaining inputs' execution. An empty input list fulfills with
    /// an empty list.
    pub fn all(scheduler: &Scheduler, inputs: Vec<Promise>) -> Promise {
        let result = Promise::pending(scheduler);
        let total = inputs.len();
        if total == 0 {
            result.resolve(Value::List(Vec::new()));
            return result;
        }

        let slots: Rc<RefCell<Vec<Option<Value>>>> = Rc::new(RefCell::new(vec![None; total]));
        let remaining = Rc::new(Cell::new(total));

        for (index, input) in inputs.into_iter().enumerate() {
            let slots = Rc::clone(&slots);
            let remaining = Rc::clone(&remaining);
            let fulfill_target = result.clone();
            let reject_target = result.clone();

            input.then_or_catch(
                Some(Box::new(move |value| {
                    slots.borrow_mut()[index] = Some(value);
                    remaining.set(remaining.get() - 1);
                    if remaining.get() == 0 {
                        let values = slots
                            .borrow_mut()
                            .drain(..)
                            .map(|slot| slot.unwrap_or(Value::Undefined))
                            .collect();
                        fulfill_target.resolve(Value::List(values));
                    }
                    Completion::Value(Value::Undefined)
                })),
                Some(Box::new(move |error| {
                    reject_target.reject(error);
                    Completion::Value(Value::Undefined)
                })),
            );
        }
        result
    }

    /// Enqueues a reaction against this promise's settlement.
    fn dispatch(&self, reaction: Reaction) {
        let Reaction {
            target,
            on_fulfilled,
            on_rejected,
        } = reaction;

        let state = self.shared.borrow().state;
        match state {
            PromiseState::Fulfilled => {
                let value = self
                    .shared
                    .borrow()
                    .result
                    .clone()
                    .unwrap_or(Value::Undefined);
                self.scheduler.enqueue_microtask(move || {
                    match on_fulfilled {
                        Some(handler) => target.settle_from(handler(value)),
                        None => target.resolve(value),
                    }
                    Ok(Value::Undefined)
                });
            }
            PromiseState::Rejected => {
                let error = self
                    .shared
                    .borrow()
                    .error
                    .clone()
                    .unwrap_or_else(|| SimError::internal("rejected promise without error"));
                self.scheduler.enqueue_microtask(move || {
                    match on_rejected {
                        Some(handler) => target.settle_from(handler(error)),
                        None => target.reject(error),
                    }
                    Ok(Value::Undefined)
                });
            }
            PromiseState::Pending => {}
        }
    }

    /// Settles this promise from a handler's completion.
    fn settle_from(&self, completion: Completion) {
        match completion {
            Completion::Value(value) => self.resolve(value),
            Completion::Error(error) => self.reject(error),
            Completion::Chain(inner) => {
                let fulfill_target = self.clone();
                let reject_target = self.clone();
                inner.then_or_catch(
                    Some(Box::new(move |value| {
                        fulfill_target.resolve(value);
                        Completion::Value(Value::Undefined)
                    })),
                    Some(Box::new(move |error| {
                        reject_target.reject(error);
                        Completion::Value(Value::Undefined)
                    })),
                );
            }
        }
    }
}

impl std::fmt::Debug for Promise {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Promise {{ state: {:?} }}", self.state())
    }
}
