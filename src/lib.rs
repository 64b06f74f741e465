//! Threads taking turns: spawning, sleeping, printing and joining.
//!
//! Each scenario runs one printer on a spawned thread and another on the
//! calling thread, then joins before moving on. The counter scenario lends a
//! `&mut i32` to the spawned thread and reads it back only after the join.
//!
//! Run with: cargo run --bin thread-turns

pub mod config;
pub mod counter;
pub mod error;
pub mod printer;
pub mod scenario;
pub mod sink;
pub mod task;

pub use config::{CounterConfig, DemoConfig, PairConfig, PeriodicSpec, PrinterSpec, TurnsConfig};
pub use error::{DemoError, Result};
pub use sink::{ChannelSink, ConsoleSink, Line, Role, Sink};
