//! Named threads whose spawn and join both report failure.
//!
//! `thread::spawn` panics when the OS refuses a new thread and
//! `JoinHandle::join` hands back an opaque panic payload. The wrappers here
//! turn both into [`DemoError`] values so callers can use `?`.

use crate::error::{panic_message, DemoError, Result};
use crossbeam::channel::{bounded, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle, Scope, ScopedJoinHandle};
use std::time::Duration;
use tracing::{debug, error};

pub struct Task<T> {
    name: String,
    handle: JoinHandle<T>,
}

/// Spawns a named thread that may outlive the caller's stack frame.
pub fn spawn_named<F, T>(name: impl Into<String>, f: F) -> Result<Task<T>>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    let name = name.into();
    let handle = thread::Builder::new()
        .name(name.clone())
        .spawn(f)
        .map_err(|source| DemoError::Spawn {
            name: name.clone(),
            source,
        })?;
    debug!(thread = %name, "spawned");
    Ok(Task { name, handle })
}

impl<T> Task<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Blocks until the thread finishes.
    pub fn join(self) -> Result<T> {
        settle(self.name, self.handle.join())
    }
}

pub struct ScopedTask<'scope, T> {
    name: String,
    handle: ScopedJoinHandle<'scope, T>,
}

/// Spawns a named thread inside `scope`, so it may borrow from the caller.
pub fn spawn_scoped<'scope, 'env, F, T>(
    scope: &'scope Scope<'scope, 'env>,
    name: impl Into<String>,
    f: F,
) -> Result<ScopedTask<'scope, T>>
where
    F: FnOnce() -> T + Send + 'scope,
    T: Send + 'scope,
{
    let name = name.into();
    let handle = thread::Builder::new()
        .name(name.clone())
        .spawn_scoped(scope, f)
        .map_err(|source| DemoError::Spawn {
            name: name.clone(),
            source,
        })?;
    debug!(thread = %name, "spawned in scope");
    Ok(ScopedTask { name, handle })
}

impl<'scope, T> ScopedTask<'scope, T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Blocks until the thread finishes. Everything it wrote is visible
    /// to the caller afterwards.
    pub fn join(self) -> Result<T> {
        settle(self.name, self.handle.join())
    }
}

fn settle<T>(name: String, outcome: thread::Result<T>) -> Result<T> {
    match outcome {
        Ok(value) => {
            debug!(thread = %name, "joined");
            Ok(value)
        }
        Err(payload) => {
            let message = panic_message(&*payload);
            error!(thread = %name, %message, "thread panicked");
            Err(DemoError::Panicked { name, message })
        }
    }
}

// =============================================================================
// Stop signal
// =============================================================================

/// Creates a connected stop handle and token.
///
/// Nothing is ever sent on the channel: dropping the handle disconnects it,
/// and every token observes the disconnect at once.
pub fn stop_signal() -> (StopHandle, StopToken) {
    let (tx, rx) = bounded(0);
    (StopHandle { _tx: tx }, StopToken { rx })
}

/// Owning side of a stop signal. Dropping it stops every token.
pub struct StopHandle {
    _tx: Sender<()>,
}

impl StopHandle {
    pub fn stop(self) {
        debug!("stop signalled");
    }

    /// Stops every token after `delay`, from a separate timer thread.
    pub fn stop_after(self, delay: Duration) -> Result<Task<()>> {
        spawn_named("stopper", move || {
            thread::sleep(delay);
            self.stop();
        })
    }
}

#[derive(Clone)]
pub struct StopToken {
    rx: Receiver<()>,
}

impl StopToken {
    /// Blocks for up to `interval`. Returns `true` as soon as the signal
    /// fires, `false` if the whole interval passed without it.
    pub fn wait(&self, interval: Duration) -> bool {
        !matches!(self.rx.recv_timeout(interval), Err(RecvTimeoutError::Timeout))
    }

    pub fn is_stopped(&self) -> bool {
        !matches!(self.rx.try_recv(), Err(TryRecvError::Empty))
    }
}
