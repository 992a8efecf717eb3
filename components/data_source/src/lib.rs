//! Opaque asynchronous data source.
//!
//! This crate provides the simulator's one external collaborator: a mock
//! user directory that eventually yields a list of user records or a
//! failure. The core treats it as a black-box promise producer; network
//! and wire-format concerns are not modeled.
//!
//! # Examples
//!
//! ```
//! use data_source::UserDirectory;
//! use event_sim::Scheduler;
//!
//! let scheduler = Scheduler::new();
//! let directory = UserDirectory::new().unwrap();
//! let users = directory.fetch_users(&scheduler);
//! scheduler.run();
//! assert!(users.result().is_some());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

mod service;
mod users;

pub use service::UserDirectory;
pub use users::{bundled_users, parse_users, UserRecord};
