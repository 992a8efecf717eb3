//! User records.
//!
//! The record shape matches the public mock user listing the simulated
//! programs fetch: id, name, username, email.

use core_types::{SimError, Value};
use serde::Deserialize;

/// A single user record delivered by the data source.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserRecord {
    /// Numeric id
    pub id: u64,
    /// Full name
    pub name: String,
    /// Account name
    pub username: String,
    /// Contact address
    pub email: String,
}

impl UserRecord {
    /// Converts this record into its `Value` representation.
    pub fn to_value(&self) -> Value {
        Value::record(vec![
            ("id", Value::Int(self.id as i64)),
            ("name", Value::string(self.name.clone())),
            ("username", Value::string(self.username.clone())),
            ("email", Value::string(self.email.clone())),
        ])
    }
}

/// Parses a JSON user listing into records.
pub fn parse_users(json: &str) -> Result<Vec<UserRecord>, SimError> {
    serde_json::from_str(json)
        .map_err(|e| SimError::internal(format!("malformed user listing: {}", e)))
}

/// Returns the bundled user fixture.
pub fn bundled_users() -> Result<Vec<UserRecord>, SimError> {
    parse_users(include_str!("users.json"))
}
