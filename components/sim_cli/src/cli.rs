//! CLI argument definitions

use clap::Parser;

/// Command-line arguments for the simulator
#[derive(Parser, Debug)]
#[command(
    name = "relay-sim",
    version,
    about = "Deterministic event loop simulation scenarios"
)]
pub struct Cli {
    /// Scenario to run
    #[arg(long)]
    pub scenario: Option<String>,

    /// List available scenarios
    #[arg(long)]
    pub list: bool,

    /// Virtual latency of the user directory in milliseconds
    #[arg(long, default_value_t = 100)]
    pub latency_ms: u64,

    /// Make the user directory reject every fetch
    #[arg(long)]
    pub fail_fetch: bool,

    /// Deterministic stand-in for the random draw in the promise scenarios
    #[arg(long, default_value_t = 7.3)]
    pub value: f64,
}
