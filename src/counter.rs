// =============================================================================
// Counter incrementing on another thread
// =============================================================================

use crate::config::PrinterSpec;
use crate::error::Result;
use crate::sink::{Role, Sink};
use crate::task;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;
use std::thread;

/// Sleeps then increments `counter` and prints `spec.message`,
/// `spec.iterations` times. Hands the same reference back.
/// `*counter + spec.iterations` must fit in an `i32`; `CounterConfig::validate`
/// checks that for configured runs.
///
/// There is no locking: the caller must be the only other party touching
/// `counter`, and may read it only after the thread running this has been
/// joined. With a scoped thread the borrow checker enforces exactly that,
/// so reading before the scope ends does not compile:
///
/// ```compile_fail
/// use std::thread;
///
/// let mut counter = 0;
/// thread::scope(|s| {
///     s.spawn(|| counter += 1);
///     println!("{}", counter);
/// });
/// ```
pub fn increment_counter<'a>(
    counter: &'a mut i32,
    spec: &PrinterSpec,
    sink: &dyn Sink,
    role: Role,
) -> &'a mut i32 {
    for _ in 0..spec.iterations {
        thread::sleep(spec.interval());
        *counter += 1;
        sink.line(role, &spec.message);
    }
    counter
}

/// Same loop as [`increment_counter`] over a counter shared with `Arc`.
pub fn increment_shared(counter: &AtomicI32, spec: &PrinterSpec, sink: &dyn Sink, role: Role) {
    for _ in 0..spec.iterations {
        thread::sleep(spec.interval());
        counter.fetch_add(1, Ordering::Relaxed);
        sink.line(role, &spec.message);
    }
}

/// What a reader sees of a shared counter before and after joining its writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RaceObservation {
    pub before_join: i32,
    pub after_join: i32,
}

/// Reads a counter that a freshly spawned thread is still incrementing,
/// then joins and reads it again.
///
/// The first read is unsynchronized: any value from 0 to the final count may
/// come back. Only the second read is guaranteed to see every increment.
pub fn read_without_join<S>(spec: PrinterSpec, sink: Arc<S>) -> Result<RaceObservation>
where
    S: Sink + 'static,
{
    let counter = Arc::new(AtomicI32::new(0));
    let writer = {
        let counter = Arc::clone(&counter);
        task::spawn_named("unjoined-ticker", move || {
            increment_shared(&counter, &spec, &*sink, Role::Spawned)
        })?
    };

    let before_join = counter.load(Ordering::Relaxed);
    writer.join()?;
    let after_join = counter.load(Ordering::Relaxed);

    Ok(RaceObservation {
        before_join,
        after_join,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::ChannelSink;
    use std::time::{Duration, Instant};

    #[test]
    fn test_increment_on_calling_thread() {
        let (sink, rx) = ChannelSink::new();
        let mut counter = 0;
        let spec = PrinterSpec::new("Tick", 4, 1);

        let returned = increment_counter(&mut counter, &spec, &sink, Role::Initiator);
        assert_eq!(*returned, 4);
        assert_eq!(counter, 4);
        assert_eq!(rx.try_iter().filter(|l| l.text == "Tick").count(), 4);
    }

    #[test]
    fn test_joined_counter_equals_iterations() {
        let (sink, _rx) = ChannelSink::new();
        let spec = PrinterSpec::new("Tick", 10, 2);
        let mut counter = 0;

        thread::scope(|s| {
            let lent = &mut counter;
            let (spec, sink) = (&spec, &sink);
            let ticker = s.spawn(move || {
                // Move the borrow in whole so it can be handed back out.
                let lent = lent;
                increment_counter(lent, spec, sink, Role::Spawned)
            });
            let back = ticker.join().unwrap();
            assert_eq!(*back, 10);
        });

        assert_eq!(counter, 10);
    }

    #[test]
    fn test_starts_from_initial_value() {
        let (sink, _rx) = ChannelSink::new();
        let mut counter = -3;
        increment_counter(&mut counter, &PrinterSpec::new("Tick", 5, 1), &sink, Role::Spawned);
        assert_eq!(counter, 2);
    }

    #[test]
    fn test_read_without_join_misses_increments() {
        let (sink, rx) = ChannelSink::new();
        let spec = PrinterSpec::new("Tick", 5, 30);

        let start = Instant::now();
        let seen = read_without_join(spec, Arc::new(sink)).unwrap();

        // The writer sleeps before its first increment, so the early read
        // cannot have seen all five.
        assert!(seen.before_join < 5);
        assert_eq!(seen.after_join, 5);
        assert!(start.elapsed() >= Duration::from_millis(150));
        assert_eq!(rx.try_iter().count(), 5);
    }

    #[test]
    fn test_shared_counter_from_several_writers() {
        let (sink, _rx) = ChannelSink::new();
        let counter = AtomicI32::new(0);
        let spec = PrinterSpec::new("Tick", 10, 1);

        thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| increment_shared(&counter, &spec, &sink, Role::Spawned));
            }
        });

        assert_eq!(counter.load(Ordering::Relaxed), 40);
    }
}
