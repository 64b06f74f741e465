// =============================================================================
// Scenarios: one printer spawned, one on the calling thread, then join
// =============================================================================

use crate::config::{CounterConfig, DemoConfig, PairConfig, TurnsConfig};
use crate::counter::increment_counter;
use crate::error::Result;
use crate::printer::{print_bounded, print_periodic};
use crate::sink::{Role, Sink};
use crate::task::{self, stop_signal};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnsReport {
    pub mine: usize,
    pub yours: usize,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairReport {
    pub spawned: usize,
    pub initiator: usize,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CounterReport {
    pub ticks: usize,
    pub tocks: usize,
    pub final_value: i32,
    pub elapsed: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunReport {
    pub turns: Option<TurnsReport>,
    pub hello_goodbye: PairReport,
    pub counter: CounterReport,
}

/// Two periodic printers taking turns until `cfg.run_for` has passed.
///
/// Neither printer has a bound of its own: both stop only because a timer
/// thread fires the shared stop signal.
pub fn take_turns(cfg: &TurnsConfig, sink: &dyn Sink) -> Result<TurnsReport> {
    info!(run_for_ms = cfg.run_for_ms, "turns: starting");
    let start = Instant::now();
    let (handle, token) = stop_signal();
    let stopper = handle.stop_after(cfg.run_for())?;

    let (mine, yours) = thread::scope(|scope| -> Result<(usize, usize)> {
        let mine_token = token.clone();
        let mine = task::spawn_scoped(scope, "my-turn", move || {
            print_periodic(sink, Role::Spawned, &cfg.mine, &mine_token)
        })?;
        let yours = print_periodic(sink, Role::Initiator, &cfg.yours, &token);
        Ok((mine.join()?, yours))
    })?;
    debug!(thread = stopper.name(), stopped = token.is_stopped(), "joining stopper");
    stopper.join()?;

    let report = TurnsReport {
        mine,
        yours,
        elapsed: start.elapsed(),
    };
    info!(?report, "turns: finished");
    Ok(report)
}

/// Runs `cfg.spawned` on a new thread while the caller runs `cfg.initiator`,
/// then waits for the spawned thread before announcing that both are done.
pub fn hello_goodbye(cfg: &PairConfig, sink: &dyn Sink) -> Result<PairReport> {
    info!("hello/goodbye: starting");
    let start = Instant::now();

    let (spawned, initiator, name) = thread::scope(|scope| -> Result<(usize, usize, String)> {
        let hello = task::spawn_scoped(scope, "hello", || {
            print_bounded(sink, Role::Spawned, &cfg.spawned)
        })?;
        let initiator = print_bounded(sink, Role::Initiator, &cfg.initiator);
        let name = hello.name().to_string();
        // Without this the caller would move on while the spawned printer
        // is still mid-series.
        let spawned = hello.join()?;
        Ok((spawned, initiator, name))
    })?;

    sink.line(
        Role::Summary,
        &format!("Both main and \"{}\" threads ended!", name),
    );

    let report = PairReport {
        spawned,
        initiator,
        elapsed: start.elapsed(),
    };
    info!(?report, "hello/goodbye: finished");
    Ok(report)
}

/// Lends a counter to a ticking thread while the caller tocks, then reads
/// the counter once the ticker has been joined.
///
/// A config whose final value would overflow an `i32` is rejected before
/// any thread starts.
pub fn count_ticks(cfg: &CounterConfig, sink: &dyn Sink) -> Result<CounterReport> {
    cfg.validate()?;
    info!(initial = cfg.initial, "counter: starting");
    let start = Instant::now();
    let mut counter = cfg.initial;

    let (seen, tocks) = thread::scope(|scope| -> Result<(i32, usize)> {
        // The ticker is the only writer until the join below.
        let lent = &mut counter;
        let ticker = task::spawn_scoped(scope, "ticker", move || {
            *increment_counter(lent, &cfg.ticker, sink, Role::Spawned)
        })?;
        let tocks = print_bounded(sink, Role::Initiator, &cfg.initiator);
        let seen = ticker.join()?;
        Ok((seen, tocks))
    })?;

    sink.line(Role::Summary, &format!("Counter's final value = {}", counter));

    let report = CounterReport {
        ticks: seen.abs_diff(cfg.initial) as usize,
        tocks,
        final_value: counter,
        elapsed: start.elapsed(),
    };
    info!(?report, "counter: finished");
    Ok(report)
}

/// Runs every enabled scenario in order.
pub fn run(config: &DemoConfig, sink: &dyn Sink) -> Result<RunReport> {
    let turns = if config.turns.enabled {
        Some(take_turns(&config.turns, sink)?)
    } else {
        None
    };
    let hello_goodbye = hello_goodbye(&config.hello_goodbye, sink)?;
    let counter = count_ticks(&config.counter, sink)?;

    Ok(RunReport {
        turns,
        hello_goodbye,
        counter,
    })
}
