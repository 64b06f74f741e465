// =============================================================================
// Demo configuration: every default is the classic hello/goodbye timing
// =============================================================================

use crate::error::{DemoError, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable naming an optional TOML config file.
pub const CONFIG_ENV: &str = "THREAD_TURNS_CONFIG";

/// A printer that stops after a fixed number of lines.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PrinterSpec {
    pub message: String,
    pub iterations: usize,
    pub interval_ms: u64,
}

impl PrinterSpec {
    pub fn new(message: impl Into<String>, iterations: usize, interval_ms: u64) -> Self {
        Self {
            message: message.into(),
            iterations,
            interval_ms,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Wall time the printer needs when nothing else gets in the way.
    /// `None` when it does not fit in a `Duration`.
    pub fn expected_duration(&self) -> Option<Duration> {
        let iterations = u32::try_from(self.iterations).ok()?;
        self.interval().checked_mul(iterations)
    }

    fn validate(&self, field: &str) -> Result<()> {
        if self.iterations == 0 {
            return Err(DemoError::invalid_config(
                format!("{field}.iterations"),
                "must be at least 1",
            ));
        }
        if self.interval_ms == 0 {
            return Err(DemoError::invalid_config(
                format!("{field}.interval_ms"),
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// A printer that keeps going until it is told to stop.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PeriodicSpec {
    pub message: String,
    pub interval_ms: u64,
}

impl PeriodicSpec {
    pub fn new(message: impl Into<String>, interval_ms: u64) -> Self {
        Self {
            message: message.into(),
            interval_ms,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TurnsConfig {
    pub enabled: bool,
    pub run_for_ms: u64,
    pub mine: PeriodicSpec,
    pub yours: PeriodicSpec,
}

impl TurnsConfig {
    pub fn run_for(&self) -> Duration {
        Duration::from_millis(self.run_for_ms)
    }
}

impl Default for TurnsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            run_for_ms: 6_000,
            mine: PeriodicSpec::new("My turn!", 1_000),
            yours: PeriodicSpec::new("Your turn!", 2_000),
        }
    }
}

/// Two bounded printers: one spawned, one on the calling thread.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PairConfig {
    pub spawned: PrinterSpec,
    pub initiator: PrinterSpec,
}

impl Default for PairConfig {
    fn default() -> Self {
        Self {
            spawned: PrinterSpec::new("Hello!", 10, 1_000),
            initiator: PrinterSpec::new("Goodbye!", 3, 2_000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    pub initial: i32,
    pub ticker: PrinterSpec,
    pub initiator: PrinterSpec,
}

impl CounterConfig {
    /// The value the counter ends on, if it fits in an `i32`.
    pub fn final_value(&self) -> Option<i32> {
        let ticks = i32::try_from(self.ticker.iterations).ok()?;
        self.initial.checked_add(ticks)
    }

    pub fn validate(&self) -> Result<()> {
        self.ticker.validate("counter.ticker")?;
        self.initiator.validate("counter.initiator")?;
        if self.final_value().is_none() {
            return Err(DemoError::invalid_config(
                "counter.initial",
                format!(
                    "{} plus {} ticks overflows an i32",
                    self.initial, self.ticker.iterations
                ),
            ));
        }
        Ok(())
    }
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            initial: 0,
            ticker: PrinterSpec::new("Tick", 10, 1_000),
            initiator: PrinterSpec::new("Tock", 3, 2_000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    pub color: bool,
    pub turns: TurnsConfig,
    pub hello_goodbye: PairConfig,
    pub counter: CounterConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            color: true,
            turns: TurnsConfig::default(),
            hello_goodbye: PairConfig::default(),
            counter: CounterConfig::default(),
        }
    }
}

impl DemoConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: DemoConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| DemoError::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Loads the file named by `THREAD_TURNS_CONFIG`, or the defaults when unset.
    pub fn from_env() -> Result<Self> {
        Self::from_optional_path(env::var_os(CONFIG_ENV).map(PathBuf::from))
    }

    pub fn from_optional_path(path: Option<PathBuf>) -> Result<Self> {
        match path {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading config");
                Self::from_file(&path)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.turns.enabled {
            if self.turns.run_for_ms == 0 {
                return Err(DemoError::invalid_config("turns.run_for_ms", "must be at least 1"));
            }
            for (field, spec) in [("turns.mine", &self.turns.mine), ("turns.yours", &self.turns.yours)] {
                if spec.interval_ms == 0 {
                    return Err(DemoError::invalid_config(
                        format!("{field}.interval_ms"),
                        "must be at least 1",
                    ));
                }
            }
        }
        self.hello_goodbye.spawned.validate("hello_goodbye.spawned")?;
        self.hello_goodbye.initiator.validate("hello_goodbye.initiator")?;
        self.counter.validate()
    }
}
