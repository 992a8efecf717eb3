//! Mock user directory service.
//!
//! The simulator consumes the data source as a black box: a call that
//! eventually yields a list of user records or a failure. Completion
//! delay is an injectable parameter so tests stay deterministic.

use crate::users::{bundled_users, UserRecord};
use core_types::{SimError, Value};
use event_sim::{Promise, Scheduler};

/// An opaque asynchronous source of user records.
///
/// # Examples
///
/// ```
/// use data_source::UserDirectory;
/// use event_sim::Scheduler;
///
/// let scheduler = Scheduler::new();
/// let directory = UserDirectory::new().unwrap().with_latency_ms(100);
/// let users = directory.fetch_users(&scheduler);
/// scheduler.run();
/// assert!(users.result().is_some());
/// ```
#[derive(Debug, Clone)]
pub struct UserDirectory {
    users: Vec<UserRecord>,
    latency_ms: u64,
    available: bool,
}

impl UserDirectory {
    /// Creates a directory backed by the bundled user fixture, with zero
    /// latency and data available.
    pub fn new() -> Result<Self, SimError> {
        Ok(Self {
            users: bundled_users()?,
            latency_ms: 0,
            available: true,
        })
    }

    /// Creates a directory backed by the given records.
    pub fn with_users(users: Vec<UserRecord>) -> Self {
        Self {
            users,
            latency_ms: 0,
            available: true,
        }
    }

    /// Sets the completion delay of each fetch, in virtual milliseconds.
    pub fn with_latency_ms(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    /// Makes every fetch fail with `DataUnavailable`.
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Returns the number of records a successful fetch delivers.
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Returns true if a successful fetch would deliver no records.
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// Starts a fetch against this directory.
    ///
    /// Returns a promise that settles after the configured latency:
    /// fulfilled with the record list as a `Value::List`, or rejected
    /// with `DataUnavailable` when the directory is offline. The promise
    /// settles from a scheduled timer task, never synchronously.
    pub fn fetch_users(&self, scheduler: &Scheduler) -> Promise {
        let promise = Promise::pending(scheduler);
        let outcome = if self.available {
            Ok(Value::List(self.users.iter().map(UserRecord::to_value).collect()))
        } else {
            Err(SimError::data_unavailable("Data is not available"))
        };

        let settle = promise.clone();
        scheduler.schedule(
            move || {
                match outcome {
                    Ok(listing) => settle.resolve(listing),
                    Err(error) => settle.reject(error),
                }
                Ok(Value::Undefined)
            },
            self.latency_ms,
        );
        promise
    }
}
