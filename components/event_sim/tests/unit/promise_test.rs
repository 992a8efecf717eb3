//! Unit tests for Promise

use core_types::{ErrorKind, SimError, Value};
use event_sim::{CaptureReporter, Completion, Promise, PromiseState, Scheduler};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn new_promise_is_pending() {
    let scheduler = Scheduler::new();
    let promise = Promise::pending(&scheduler);
    assert_eq!(promise.state(), PromiseState::Pending);
    assert!(promise.result().is_none());
    assert!(promise.error().is_none());
    assert!(!promise.has_pending_reactions());
}

#[test]
fn resolve_changes_state_to_fulfilled() {
    let scheduler = Scheduler::new();
    let promise = Promise::pending(&scheduler);
    promise.resolve(Value::Int(42));
    assert_eq!(promise.state(), PromiseState::Fulfilled);
    assert_eq!(promise.result(), Some(Value::Int(42)));
}

#[test]
fn reject_changes_state_to_rejected() {
    let scheduler = Scheduler::new();
    let promise = Promise::pending(&scheduler);
    promise.reject(SimError::data_unavailable("Data is not available"));
    assert_eq!(promise.state(), PromiseState::Rejected);
    assert_eq!(promise.error().unwrap().kind, ErrorKind::DataUnavailable);
}

#[test]
fn cannot_resolve_already_fulfilled_promise() {
    let scheduler = Scheduler::new();
    let promise = Promise::pending(&scheduler);
    promise.resolve(Value::Int(42));
    promise.resolve(Value::Int(100)); // Should be ignored
    assert_eq!(promise.result(), Some(Value::Int(42)));
}

#[test]
fn cannot_reject_already_fulfilled_promise() {
    let scheduler = Scheduler::new();
    let promise = Promise::pending(&scheduler);
    promise.resolve(Value::Int(42));
    promise.reject(SimError::internal("late")); // Should be ignored
    assert_eq!(promise.state(), PromiseState::Fulfilled);
}

#[test]
fn cannot_resolve_already_rejected_promise() {
    let scheduler = Scheduler::new();
    let promise = Promise::pending(&scheduler);
    promise.reject(SimError::internal("first"));
    promise.resolve(Value::Int(42)); // Should be ignored
    assert_eq!(promise.state(), PromiseState::Rejected);
    // A reaction consumes the rejection so it is not reported unhandled
    promise.catch(|_| Completion::Value(Value::Undefined));
    scheduler.run();
}

#[test]
fn then_handler_receives_fulfilled_value_after_drain() {
    let scheduler = Scheduler::new();
    let promise = Promise::pending(&scheduler);
    let seen = Rc::new(RefCell::new(None));

    let seen_slot = seen.clone();
    let chained = promise.then(move |value| {
        *seen_slot.borrow_mut() = Some(value.clone());
        Completion::Value(value)
    });

    promise.resolve(Value::string("payload"));
    assert!(seen.borrow().is_none());

    scheduler.run();
    assert_eq!(*seen.borrow(), Some(Value::string("payload")));
    assert_eq!(chained.state(), PromiseState::Fulfilled);
    assert_eq!(chained.result(), Some(Value::string("payload")));
}

#[test]
fn reactions_fire_in_registration_order() {
    let scheduler = Scheduler::new();
    let promise = Promise::pending(&scheduler);
    let order = Rc::new(RefCell::new(Vec::new()));

    for label in ["first", "second", "third"] {
        let order = order.clone();
        promise.then(move |value| {
            order.borrow_mut().push(label);
            Completion::Value(value)
        });
    }

    promise.resolve(Value::Undefined);
    scheduler.run();
    assert_eq!(*order.borrow(), vec!["first", "second", "third"]);
}

#[test]
fn then_without_rejection_handler_forwards_to_catch() {
    let scheduler = Scheduler::new();
    let promise = Promise::pending(&scheduler);
    let order = Rc::new(RefCell::new(Vec::new()));

    let then_order = order.clone();
    let catch_order = order.clone();
    promise
        .then(move |value| {
            then_order.borrow_mut().push("then");
            Completion::Value(value)
        })
        .catch(move |error| {
            catch_order.borrow_mut().push("catch");
            Completion::Value(error.to_value())
        });

    promise.reject(SimError::data_unavailable("Data is not available"));
    scheduler.run();

    // The then handler is skipped; the rejection flows to the catch
    assert_eq!(*order.borrow(), vec!["catch"]);
}

#[test]
fn catch_recovers_into_a_fulfilled_chain() {
    let scheduler = Scheduler::new();
    let promise = Promise::rejected(&scheduler, SimError::data_unavailable("nope"));

    let recovered = promise.catch(|error| Completion::Value(error.to_value()));
    scheduler.run();

    assert_eq!(recovered.state(), PromiseState::Fulfilled);
    assert_eq!(
        recovered.result().unwrap().to_display_string(),
        "{ err: 'nope' }"
    );
}

#[test]
fn handler_returning_chain_adopts_inner_settlement() {
    let scheduler = Scheduler::new();
    let outer = Promise::pending(&scheduler);
    let inner = Promise::pending(&scheduler);

    let inner_for_handler = inner.clone();
    let adopted = outer.then(move |_| Completion::Chain(inner_for_handler));

    outer.resolve(Value::Undefined);
    scheduler.run();
    // Inner is still pending, so the adopted promise is too
    assert_eq!(adopted.state(), PromiseState::Pending);

    inner.resolve(Value::Int(9));
    scheduler.run();
    assert_eq!(adopted.state(), PromiseState::Fulfilled);
    assert_eq!(adopted.result(), Some(Value::Int(9)));
}

#[test]
fn handler_registered_after_settlement_still_fires() {
    let scheduler = Scheduler::new();
    let promise = Promise::fulfilled(&scheduler, Value::Int(1));
    let seen = Rc::new(RefCell::new(false));

    let seen_flag = seen.clone();
    promise.then(move |value| {
        *seen_flag.borrow_mut() = true;
        Completion::Value(value)
    });

    scheduler.run();
    assert!(*seen.borrow());
}

mod all_combinator {
    use super::*;

    #[test]
    fn fulfills_with_values_in_input_order() {
        let scheduler = Scheduler::new();
        let slow = Promise::pending(&scheduler);
        let fast = Promise::pending(&scheduler);

        // The second input completes first
        let slow_handle = slow.clone();
        scheduler.schedule(
            move || {
                slow_handle.resolve(Value::Int(1));
                Ok(Value::Undefined)
            },
            100,
        );
        let fast_handle = fast.clone();
        scheduler.schedule(
            move || {
                fast_handle.resolve(Value::Int(2));
                Ok(Value::Undefined)
            },
            10,
        );

        let combined = Promise::all(&scheduler, vec![slow, fast]);
        scheduler.run();

        assert_eq!(
            combined.result(),
            Some(Value::List(vec![Value::Int(1), Value::Int(2)]))
        );
    }

    #[test]
    fn rejects_with_first_rejection_in_completion_order() {
        let scheduler = Scheduler::new();
        let late_failure = Promise::pending(&scheduler);
        let early_failure = Promise::pending(&scheduler);

        let late_handle = late_failure.clone();
        scheduler.schedule(
            move || {
                late_handle.reject(SimError::data_unavailable("late"));
                Ok(Value::Undefined)
            },
            100,
        );
        let early_handle = early_failure.clone();
        scheduler.schedule(
            move || {
                early_handle.reject(SimError::data_unavailable("early"));
                Ok(Value::Undefined)
            },
            10,
        );

        let combined = Promise::all(&scheduler, vec![late_failure, early_failure]);
        let seen = Rc::new(RefCell::new(None));
        let seen_slot = seen.clone();
        combined.catch(move |error| {
            *seen_slot.borrow_mut() = Some(error.message.clone());
            Completion::Value(Value::Undefined)
        });

        scheduler.run();
        assert_eq!(*seen.borrow(), Some("early".to_string()));
    }

    #[test]
    fn rejection_does_not_cancel_sibling_execution() {
        let scheduler = Scheduler::new();
        let failing = Promise::rejected(&scheduler, SimError::data_unavailable("down"));
        let sibling = Promise::pending(&scheduler);
        let sibling_ran = Rc::new(RefCell::new(false));

        let sibling_handle = sibling.clone();
        let sibling_flag = sibling_ran.clone();
        scheduler.schedule(
            move || {
                *sibling_flag.borrow_mut() = true;
                sibling_handle.resolve(Value::Int(3));
                Ok(Value::Undefined)
            },
            50,
        );

        let combined = Promise::all(&scheduler, vec![failing, sibling]);
        combined.catch(|_| Completion::Value(Value::Undefined));
        scheduler.run();

        // The combined promise rejected early, but the sibling's task
        // still executed
        assert!(*sibling_ran.borrow());
        assert_eq!(combined.state(), PromiseState::Rejected);
    }

    #[test]
    fn empty_input_fulfills_with_empty_list() {
        let scheduler = Scheduler::new();
        let combined = Promise::all(&scheduler, vec![]);
        assert_eq!(combined.state(), PromiseState::Fulfilled);
        assert_eq!(combined.result(), Some(Value::List(vec![])));
    }
}

mod unhandled_rejections {
    use super::*;

    #[test]
    fn rejection_without_handler_is_reported() {
        let reporter = CaptureReporter::new();
        let scheduler = Scheduler::with_reporter(Rc::new(reporter.clone()));

        let promise = Promise::pending(&scheduler);
        promise.reject(SimError::data_unavailable("nobody listening"));
        scheduler.run();

        let faults = reporter.faults();
        assert_eq!(faults.len(), 1);
        assert_eq!(faults[0].0, "Unhandled promise rejection");
        assert_eq!(faults[0].1.message, "nobody listening");
    }

    #[test]
    fn rejection_with_catch_is_not_reported() {
        let reporter = CaptureReporter::new();
        let scheduler = Scheduler::with_reporter(Rc::new(reporter.clone()));

        let promise = Promise::pending(&scheduler);
        promise.catch(|_| Completion::Value(Value::Undefined));
        promise.reject(SimError::data_unavailable("caught"));
        scheduler.run();

        assert!(reporter.faults().is_empty());
    }

    #[test]
    fn rejection_handled_later_in_the_same_turn_is_not_reported() {
        let reporter = CaptureReporter::new();
        let scheduler = Scheduler::with_reporter(Rc::new(reporter.clone()));

        let promise = Promise::pending(&scheduler);
        promise.reject(SimError::data_unavailable("handled below"));
        promise.catch(|_| Completion::Value(Value::Undefined));
        scheduler.run();

        assert!(reporter.faults().is_empty());
    }
}
