//! Demo scenarios.
//!
//! Each scenario drives a fresh scheduler through one of the canonical
//! ordering exercises: nested synchronous calls racing two timers, timer
//! and fetch interleaving, promise chains, `all`, and async functions
//! awaiting the user directory. All output goes through the injected
//! console so callers can capture and assert on it.

use crate::error::{DemoError, DemoResult};
use console::Console;
use core_types::{SimError, Value};
use data_source::UserDirectory;
use event_sim::{async_call, await_settled, Completion, Promise, Scheduler};
use std::rc::Rc;

/// Tunable inputs shared by the scenarios.
#[derive(Debug, Clone)]
pub struct ScenarioOptions {
    /// Virtual latency of the user directory, in milliseconds.
    pub latency_ms: u64,
    /// Make the user directory reject every fetch.
    pub fail_fetch: bool,
    /// Deterministic stand-in for the snippets' random draw.
    pub value: f64,
}

impl Default for ScenarioOptions {
    fn default() -> Self {
        Self {
            latency_ms: 100,
            fail_fetch: false,
            value: 7.3,
        }
    }
}

/// Scenario catalog: name and summary, in presentation order.
pub const SCENARIOS: &[(&str, &str)] = &[
    ("call-stack", "nested synchronous calls racing two timers"),
    ("timers", "two timers interleaved with a fetch"),
    ("promise-chain", "then/catch on a settled promise"),
    ("promise-all", "combining four settled promises"),
    ("load-data", "async function awaiting a fetch"),
    (
        "load-data-recover",
        "async function recovering from a failed fetch",
    ),
];

/// Runs the named scenario, writing output through `console`.
pub fn run_scenario(
    name: &str,
    console: &Rc<Console>,
    options: &ScenarioOptions,
) -> DemoResult<()> {
    match name {
        "call-stack" => call_stack(console),
        "timers" => timers(console, options),
        "promise-chain" => promise_chain(console, options),
        "promise-all" => promise_all(console, options),
        "load-data" => load_data(console, options),
        "load-data-recover" => load_data_recover(console, options),
        other => Err(DemoError::UnknownScenario(other.to_string())),
    }
}

fn build_directory(options: &ScenarioOptions) -> DemoResult<UserDirectory> {
    let mut directory = UserDirectory::new()?.with_latency_ms(options.latency_ms);
    if options.fail_fetch {
        directory = directory.unavailable();
    }
    Ok(directory)
}

/// Six nested synchronous calls, each logging after its callee returns.
///
/// `three` registers a 1000ms timer and `five` a 0ms timer on the way
/// down, so the output is `6,5,4,3,2,1`, then `inside five`, then
/// `inside three`: all synchronous logging completes before either timer
/// fires, and the 0ms timer beats the earlier-registered 1000ms one.
pub fn call_stack(console: &Rc<Console>) -> DemoResult<()> {
    let scheduler = Scheduler::new();
    one(console, &scheduler);
    scheduler.run();
    Ok(())
}

fn one(console: &Rc<Console>, scheduler: &Scheduler) {
    two(console, scheduler);
    console.log(&[Value::Int(1)]);
}

fn two(console: &Rc<Console>, scheduler: &Scheduler) {
    three(console, scheduler);
    console.log(&[Value::Int(2)]);
}

fn three(console: &Rc<Console>, scheduler: &Scheduler) {
    let timer_console = console.clone();
    scheduler.schedule(
        move || {
            timer_console.log(&[Value::string("inside three")]);
            Ok(Value::Undefined)
        },
        1000,
    );
    four(console, scheduler);
    console.log(&[Value::Int(3)]);
}

fn four(console: &Rc<Console>, scheduler: &Scheduler) {
    five(console, scheduler);
    console.log(&[Value::Int(4)]);
}

fn five(console: &Rc<Console>, scheduler: &Scheduler) {
    let timer_console = console.clone();
    scheduler.schedule(
        move || {
            timer_console.log(&[Value::string("inside five")]);
            Ok(Value::Undefined)
        },
        0,
    );
    six(console);
    console.log(&[Value::Int(5)]);
}

fn six(console: &Rc<Console>) {
    console.log(&[Value::Int(6)]);
}

/// Two long timers registered before a fetch: the synchronous tail logs
/// first, then the fetch data at its latency, then the 4000ms and 5000ms
/// timers in deadline order.
pub fn timers(console: &Rc<Console>, options: &ScenarioOptions) -> DemoResult<()> {
    let scheduler = Scheduler::new();
    let directory = build_directory(options)?;

    console.log(&[Value::string("one")]);
    console.log(&[Value::string("two")]);

    let three_console = console.clone();
    scheduler.schedule(
        move || {
            three_console.log(&[Value::string("three")]);
            Ok(Value::Undefined)
        },
        5000,
    );

    let new_console = console.clone();
    scheduler.schedule(
        move || {
            new_console.log(&[Value::string("new")]);
            Ok(Value::Undefined)
        },
        4000,
    );

    let data_console = console.clone();
    directory.fetch_users(&scheduler).then(move |data| {
        data_console.log(&[data]);
        Completion::Value(Value::Undefined)
    });

    console.log(&[Value::string("four")]);
    console.log(&[Value::string("five")]);

    scheduler.run();
    Ok(())
}

/// Logs the drawn number, then fulfills with `{ <key>: draw }` when it
/// exceeds 5 or rejects with "<label> is not available".
fn draw(
    console: &Rc<Console>,
    scheduler: &Scheduler,
    number: f64,
    key: &str,
    label: &str,
) -> Promise {
    console.log(&[Value::string("generated number"), Value::Double(number)]);
    if number > 5.0 {
        Promise::fulfilled(scheduler, Value::record(vec![(key, Value::Double(number))]))
    } else {
        Promise::rejected(
            scheduler,
            SimError::data_unavailable(format!("{} is not available", label)),
        )
    }
}

/// A single draw consumed by a then/catch pair.
pub fn promise_chain(console: &Rc<Console>, options: &ScenarioOptions) -> DemoResult<()> {
    let scheduler = Scheduler::new();
    let data = draw(console, &scheduler, options.value, "num", "Data");

    let data_console = console.clone();
    let err_console = console.clone();
    data.then(move |value| {
        data_console.log(&[value]);
        Completion::Value(Value::Undefined)
    })
    .catch(move |error| {
        err_console.log(&[error.to_value()]);
        Completion::Value(Value::Undefined)
    });

    scheduler.run();
    Ok(())
}

/// Four draws combined with `all`: the ordered result list when every
/// draw succeeds, or the first failure in completion order.
pub fn promise_all(console: &Rc<Console>, options: &ScenarioOptions) -> DemoResult<()> {
    let scheduler = Scheduler::new();
    let sources = vec![
        draw(console, &scheduler, options.value, "num", "Data"),
        draw(console, &scheduler, options.value + 1.0, "num1", "Data1"),
        draw(console, &scheduler, options.value + 2.0, "num2", "Data2"),
        draw(console, &scheduler, options.value + 3.0, "num3", "Data3"),
    ];

    let list_console = console.clone();
    let err_console = console.clone();
    Promise::all(&scheduler, sources)
        .then(move |values| {
            list_console.log(&[values]);
            Completion::Value(Value::Undefined)
        })
        .catch(move |error| {
            err_console.log(&[error.to_value()]);
            Completion::Value(Value::Undefined)
        });

    scheduler.run();
    Ok(())
}

/// Async data loader without recovery: a failed fetch surfaces as an
/// unhandled rejection diagnostic instead of the tail logs.
pub fn load_data(console: &Rc<Console>, options: &ScenarioOptions) -> DemoResult<()> {
    let scheduler = Scheduler::new();
    let directory = build_directory(options)?;

    let body_console = console.clone();
    let body_scheduler = scheduler.clone();
    async_call(&scheduler, move |completer| {
        body_console.log(&[Value::string("one")]);
        body_console.log(&[Value::string("two")]);

        let users = directory.fetch_users(&body_scheduler);
        let tail_console = body_console.clone();
        await_settled(&users, move |settled| match settled {
            Ok(data) => {
                let first = match &data {
                    Value::List(items) => items.first().cloned().unwrap_or(Value::Undefined),
                    _ => Value::Undefined,
                };
                tail_console.log(&[Value::string("three"), first]);
                tail_console.log(&[Value::string("four")]);
                tail_console.log(&[Value::string("five")]);
                completer.finish(Value::Undefined);
            }
            Err(error) => completer.raise(error),
        });
    });

    scheduler.run();
    Ok(())
}

/// Async data loader with scoped recovery: the catch branch logs `err`
/// in place of the success log, and the tail logs run either way.
pub fn load_data_recover(console: &Rc<Console>, options: &ScenarioOptions) -> DemoResult<()> {
    let scheduler = Scheduler::new();
    let directory = build_directory(options)?;

    let body_console = console.clone();
    let body_scheduler = scheduler.clone();
    async_call(&scheduler, move |completer| {
        body_console.log(&[Value::Int(1)]);
        body_console.log(&[Value::Int(2)]);

        let users = directory.fetch_users(&body_scheduler);
        let tail_console = body_console.clone();
        await_settled(&users, move |settled| {
            match settled {
                Ok(data) => {
                    let count = match &data {
                        Value::List(items) => items.len() as i64,
                        _ => 0,
                    };
                    tail_console.log(&[Value::string("3"), Value::Int(count)]);
                }
                Err(_) => {
                    tail_console.log(&[Value::string("err")]);
                }
            }
            tail_console.log(&[Value::Int(4)]);
            tail_console.log(&[Value::Int(5)]);
            completer.finish(Value::Undefined);
        });
    });

    scheduler.run();
    Ok(())
}
