//! Error types for the CLI

use core_types::SimError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum DemoError {
    /// The requested scenario does not exist
    #[error("unknown scenario '{0}'")]
    UnknownScenario(String),

    /// Simulation failure surfaced by a scenario
    #[error("simulation error: {0}")]
    Sim(#[from] SimError),
}

/// Result type for CLI operations
pub type DemoResult<T> = Result<T, DemoError>;
