//! Core simulation value types and error handling.
//!
//! This crate provides the foundational types for the event-loop
//! simulator, including value representation and error types.
//!
//! # Overview
//!
//! - [`Value`] - Tagged representation of simulation values
//! - [`SimError`] - Errors raised by task actions and data sources
//! - [`ErrorKind`] - Types of simulation errors
//!
//! # Examples
//!
//! ```
//! use core_types::{Value, SimError, ErrorKind};
//!
//! // Create simulation values
//! let num = Value::Int(42);
//! assert!(num.is_truthy());
//! assert_eq!(num.type_of(), "number");
//!
//! // Create an error
//! let error = SimError::data_unavailable("Data is not available");
//! assert_eq!(error.kind, ErrorKind::DataUnavailable);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod error;
mod value;

pub use error::{ErrorKind, SimError};
pub use value::Value;
