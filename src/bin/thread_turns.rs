//==============================================================================
// thread-turns: spawn, sleep, print, join
//==============================================================================
//
// Prints the demonstration to stdout. Diagnostics go to stderr and are
// controlled with RUST_LOG, e.g. `RUST_LOG=thread_turns=debug`.
// Set THREAD_TURNS_CONFIG to a TOML file to change messages and timings.

use thread_turns::scenario;
use thread_turns::{ConsoleSink, DemoConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let config = DemoConfig::from_env()?;
    let sink = ConsoleSink::new(config.color);

    let report = scenario::run(&config, &sink)?;
    tracing::debug!(?report, "all scenarios finished");
    Ok(())
}
