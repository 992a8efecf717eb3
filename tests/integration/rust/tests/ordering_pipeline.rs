//! Cross-component ordering tests
//!
//! These tests exercise the scheduler, promises, and the data source
//! together and pin down the total execution order: synchronous code,
//! then microtasks, then timer tasks by `(deadline, id)`.

use core_types::Value;
use data_source::UserDirectory;
use event_sim::{await_settled, Completion, Promise, Scheduler};
use std::cell::RefCell;
use std::rc::Rc;

type Trace = Rc<RefCell<Vec<String>>>;

fn trace() -> Trace {
    Rc::new(RefCell::new(Vec::new()))
}

fn push(trace: &Trace, label: &str) {
    trace.borrow_mut().push(label.to_string());
}

#[test]
fn delayed_then_immediate_fires_immediate_first() {
    let scheduler = Scheduler::new();
    let order = trace();

    let a = order.clone();
    scheduler.schedule(
        move || {
            push(&a, "A");
            Ok(Value::Undefined)
        },
        1000,
    );
    let b = order.clone();
    scheduler.schedule(
        move || {
            push(&b, "B");
            Ok(Value::Undefined)
        },
        0,
    );

    scheduler.run();
    assert_eq!(*order.borrow(), vec!["B", "A"]);
}

#[test]
fn fetch_reaction_beats_a_later_zero_delay_timer() {
    let scheduler = Scheduler::new();
    let order = trace();

    // The fetch's delivery task is registered first, so it fires first;
    // its reaction microtask then drains before the marker task
    let directory = UserDirectory::new().unwrap();
    let data_order = order.clone();
    directory.fetch_users(&scheduler).then(move |_| {
        push(&data_order, "data");
        Completion::Value(Value::Undefined)
    });

    let marker_order = order.clone();
    scheduler.schedule(
        move || {
            push(&marker_order, "marker");
            Ok(Value::Undefined)
        },
        0,
    );

    scheduler.run();
    assert_eq!(*order.borrow(), vec!["data", "marker"]);
}

#[test]
fn await_resumption_has_priority_over_equal_deadline_timers() {
    let scheduler = Scheduler::new();
    let order = trace();

    let source = Promise::pending(&scheduler);
    let settle = source.clone();
    scheduler.schedule(
        move || {
            settle.resolve(Value::Int(1));
            Ok(Value::Undefined)
        },
        100,
    );

    // Registered after the settling task, same deadline: higher id, so
    // it fires second, after the settling task and its microtasks
    let timer_order = order.clone();
    scheduler.schedule(
        move || {
            push(&timer_order, "timer-100");
            Ok(Value::Undefined)
        },
        100,
    );

    let resume_order = order.clone();
    await_settled(&source, move |_| {
        push(&resume_order, "resumed");
    });

    scheduler.run();
    assert_eq!(*order.borrow(), vec!["resumed", "timer-100"]);
}

#[test]
fn two_directories_combined_with_all_keep_input_order() {
    let scheduler = Scheduler::new();
    let slow = UserDirectory::with_users(vec![]).with_latency_ms(300);
    let fast = UserDirectory::new().unwrap().with_latency_ms(20);

    let combined = Promise::all(
        &scheduler,
        vec![slow.fetch_users(&scheduler), fast.fetch_users(&scheduler)],
    );
    scheduler.run();

    // The slow (empty) listing completes last but stays first in the result
    match combined.result().unwrap() {
        Value::List(results) => {
            assert_eq!(results.len(), 2);
            assert_eq!(results[0], Value::List(vec![]));
            match &results[1] {
                Value::List(users) => assert_eq!(users.len(), 5),
                other => panic!("expected user list, got {:?}", other),
            }
        }
        other => panic!("expected list of listings, got {:?}", other),
    }
}

#[test]
fn tasks_scheduled_while_draining_keep_deterministic_order() {
    let scheduler = Scheduler::new();
    let order = trace();

    let outer_order = order.clone();
    let handle = scheduler.clone();
    scheduler.schedule(
        move || {
            push(&outer_order, "first");
            let nested_order = outer_order.clone();
            handle.schedule(
                move || {
                    push(&nested_order, "nested-0ms");
                    Ok(Value::Undefined)
                },
                0,
            );
            Ok(Value::Undefined)
        },
        10,
    );

    let sibling_order = order.clone();
    scheduler.schedule(
        move || {
            push(&sibling_order, "sibling-10ms");
            Ok(Value::Undefined)
        },
        10,
    );

    scheduler.run();

    // The nested task's deadline equals the siblings' (10 + 0), but its
    // id is higher, so it fires after the already-registered sibling
    assert_eq!(*order.borrow(), vec!["first", "sibling-10ms", "nested-0ms"]);
}
