// =============================================================================
// Output sinks: where printed lines go
// =============================================================================

use colored::Colorize;
use crossbeam::channel::{unbounded, Receiver, Sender};

/// Which side of a scenario produced a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// The thread started by the scenario.
    Spawned,
    /// The thread that started the scenario.
    Initiator,
    /// Lines printed after the join.
    Summary,
}

/// A line-oriented output shared by every thread of a scenario.
///
/// Each call writes one whole line, so lines from different threads
/// interleave but never tear.
pub trait Sink: Send + Sync {
    fn line(&self, role: Role, text: &str);
}

/// Writes to stdout, optionally colouring each role differently.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleSink {
    color: bool,
}

impl ConsoleSink {
    pub fn new(color: bool) -> Self {
        Self { color }
    }
}

impl Sink for ConsoleSink {
    fn line(&self, role: Role, text: &str) {
        if !self.color {
            println!("{}", text);
            return;
        }
        match role {
            Role::Spawned => println!("{}", text.cyan()),
            Role::Initiator => println!("{}", text.yellow()),
            Role::Summary => println!("{}", text.green().bold()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub role: Role,
    pub text: String,
}

/// Forwards every line over a channel, in the order the sink received them.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<Line>,
}

impl ChannelSink {
    pub fn new() -> (Self, Receiver<Line>) {
        let (tx, rx) = unbounded();
        (Self { tx }, rx)
    }
}

impl Sink for ChannelSink {
    fn line(&self, role: Role, text: &str) {
        // Nobody listening is not an error for a printer.
        let _ = self.tx.send(Line {
            role,
            text: text.to_string(),
        });
    }
}
