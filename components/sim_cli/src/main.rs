//! Relay Event Loop Simulator CLI
//!
//! Entry point for the simulator. Parses CLI arguments and runs the
//! requested demo scenario.

use clap::Parser as ClapParser;
use console::Console;
use sim_cli::{run_scenario, Cli, DemoError, ScenarioOptions, SCENARIOS};
use std::rc::Rc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let options = ScenarioOptions {
        latency_ms: cli.latency_ms,
        fail_fetch: cli.fail_fetch,
        value: cli.value,
    };

    if let Some(name) = cli.scenario {
        let console = Rc::new(Console::new());
        match run_scenario(&name, &console, &options) {
            Ok(()) => {}
            Err(DemoError::UnknownScenario(name)) => {
                eprintln!("Error: unknown scenario '{}'", name);
                eprintln!("Run 'relay-sim --list' to see the available scenarios.");
                std::process::exit(1);
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    } else if cli.list {
        println!("Available scenarios:");
        for (name, summary) in SCENARIOS {
            println!("  {:<20} {}", name, summary);
        }
    } else {
        // Default: show usage
        println!("Relay Event Loop Simulator v0.1.0");
        println!();
        println!("Usage:");
        println!("  relay-sim --scenario <NAME>    Run a demo scenario");
        println!("  relay-sim --list               List available scenarios");
        println!();
        println!("Run 'relay-sim --help' for more options.");
    }

    Ok(())
}
