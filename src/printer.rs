//! Printers that sleep between lines.
//!
//! The sleep is a real blocking sleep: the thread is parked for the whole
//! interval and does nothing else in the meantime.

use crate::config::{PeriodicSpec, PrinterSpec};
use crate::sink::{Role, Sink};
use crate::task::StopToken;
use std::thread;
use tracing::debug;

/// Sleeps then prints `spec.message`, `spec.iterations` times.
/// Returns the number of lines printed.
pub fn print_bounded(sink: &dyn Sink, role: Role, spec: &PrinterSpec) -> usize {
    for _ in 0..spec.iterations {
        thread::sleep(spec.interval());
        sink.line(role, &spec.message);
    }
    spec.iterations
}

/// Prints `spec.message` once per interval until `stop` fires.
/// Returns the number of lines printed.
pub fn print_periodic(sink: &dyn Sink, role: Role, spec: &PeriodicSpec, stop: &StopToken) -> usize {
    let mut printed = 0;
    while !stop.wait(spec.interval()) {
        sink.line(role, &spec.message);
        printed += 1;
    }
    debug!(message = %spec.message, printed, "periodic printer stopped");
    printed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::ChannelSink;
    use crate::task::stop_signal;
    use std::time::{Duration, Instant};

    #[test]
    fn test_bounded_prints_exactly_n_times() {
        let (sink, rx) = ChannelSink::new();
        let spec = PrinterSpec::new("Goodbye!", 3, 5);

        let printed = print_bounded(&sink, Role::Initiator, &spec);

        let lines: Vec<_> = rx.try_iter().collect();
        assert_eq!(printed, 3);
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.text == "Goodbye!" && l.role == Role::Initiator));
    }

    #[test]
    fn test_bounded_takes_iterations_times_interval() {
        let (sink, _rx) = ChannelSink::new();
        let spec = PrinterSpec::new("Hello!", 5, 20);

        let start = Instant::now();
        print_bounded(&sink, Role::Spawned, &spec);
        let elapsed = start.elapsed();
        let expected = spec.expected_duration().unwrap();

        assert!(elapsed >= expected);
        assert!(elapsed < expected + Duration::from_millis(500));
    }

    #[test]
    fn test_two_bounded_printers_concurrently() {
        let (sink, rx) = ChannelSink::new();
        let hello = PrinterSpec::new("Hello!", 10, 5);
        let goodbye = PrinterSpec::new("Goodbye!", 3, 10);

        thread::scope(|s| {
            let handle = s.spawn(|| print_bounded(&sink, Role::Spawned, &hello));
            print_bounded(&sink, Role::Initiator, &goodbye);
            handle.join().unwrap();
        });

        // Only counts are asserted: the interleaving is up to the scheduler.
        let lines: Vec<_> = rx.try_iter().collect();
        assert_eq!(lines.len(), 13);
        assert_eq!(lines.iter().filter(|l| l.text == "Hello!").count(), 10);
        assert_eq!(lines.iter().filter(|l| l.text == "Goodbye!").count(), 3);
    }

    #[test]
    fn test_periodic_runs_until_stopped() {
        let (sink, rx) = ChannelSink::new();
        let (handle, token) = stop_signal();
        let spec = PeriodicSpec::new("My turn!", 10);

        let stopper = handle.stop_after(Duration::from_millis(200)).unwrap();
        let start = Instant::now();
        let printed = print_periodic(&sink, Role::Spawned, &spec, &token);
        stopper.join().unwrap();

        assert!(start.elapsed() >= Duration::from_millis(200));
        assert!(printed >= 1);
        assert!(printed <= 20);
        assert_eq!(rx.try_iter().count(), printed);
    }

    #[test]
    fn test_periodic_already_stopped_prints_nothing() {
        let (sink, rx) = ChannelSink::new();
        let (handle, token) = stop_signal();
        handle.stop();

        let printed = print_periodic(&sink, Role::Spawned, &PeriodicSpec::new("never", 1_000), &token);
        assert_eq!(printed, 0);
        assert_eq!(rx.try_iter().count(), 0);
    }
}
