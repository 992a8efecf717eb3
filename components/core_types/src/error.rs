//! Simulation error types.
//!
//! This module provides the error type shared across the simulator:
//! task actions, promise rejections, and the data source all fail with
//! a [`SimError`].

use crate::Value;
use std::fmt;

/// The kind of simulation error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A value had the wrong shape for an operation
    TypeError,
    /// A numeric value was out of its allowed range
    RangeError,
    /// The asynchronous data source had no data to deliver
    DataUnavailable,
    /// Internal simulator error
    InternalError,
}

impl ErrorKind {
    /// Returns the display name of this kind.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::TypeError => "TypeError",
            ErrorKind::RangeError => "RangeError",
            ErrorKind::DataUnavailable => "DataUnavailable",
            ErrorKind::InternalError => "InternalError",
        }
    }
}

/// An error raised inside the simulation.
///
/// # Examples
///
/// ```
/// use core_types::{ErrorKind, SimError};
///
/// let error = SimError::data_unavailable("Data is not available");
/// assert_eq!(error.kind, ErrorKind::DataUnavailable);
/// assert_eq!(error.to_string(), "DataUnavailable: Data is not available");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SimError {
    /// The type of error
    pub kind: ErrorKind,
    /// Human-readable error message
    pub message: String,
}

impl SimError {
    /// Creates an error of the given kind.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Creates a `TypeError`.
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::TypeError, message)
    }

    /// Creates a `RangeError`.
    pub fn range_error(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::RangeError, message)
    }

    /// Creates a `DataUnavailable` error.
    pub fn data_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::DataUnavailable, message)
    }

    /// Creates an `InternalError`.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InternalError, message)
    }

    /// Converts this error into the record shape rejection reasons carry,
    /// `{ err: <message> }`.
    pub fn to_value(&self) -> Value {
        Value::record(vec![("err", Value::string(self.message.clone()))])
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.name(), self.message)
    }
}

impl std::error::Error for SimError {}
