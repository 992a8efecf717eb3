//! Event Loop Simulator CLI Library
//!
//! Provides the scenario catalog and supporting modules for the demo CLI.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod error;
pub mod scenarios;

pub use cli::Cli;
pub use error::{DemoError, DemoResult};
pub use scenarios::{run_scenario, ScenarioOptions, SCENARIOS};
