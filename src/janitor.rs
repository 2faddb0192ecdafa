//! Periodic sweeper that asks its table to run an expiration pass.
//!
//! A dedicated OS thread selects between its tick period and a one-shot stop
//! signal using `std::sync::mpsc`. The janitor holds only a [`Weak`]
//! back-reference to its table — it never extends the table's lifetime.

use std::sync::mpsc;
use std::sync::{Arc, Weak};
use std::thread;
use std::time::Duration;

use crate::table::Sweepable;

/// Scoped background worker owned by a [`crate::Table`].
///
/// Dropping a `Janitor` sends its stop signal and joins the worker thread,
/// so a table's janitor is always stopped before the table becomes
/// unreachable.
pub(crate) struct Janitor {
    stop_tx: mpsc::Sender<()>,
    handle: Option<thread::JoinHandle<()>>,
}

impl Janitor {
    pub(crate) fn spawn<T>(table: Weak<T>, interval: Duration) -> Self
    where
        T: Sweepable + Send + Sync + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let handle = thread::Builder::new()
            .name("cache-janitor".to_string())
            .spawn(move || loop {
                match stop_rx.recv_timeout(interval) {
                    Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
                    Err(mpsc::RecvTimeoutError::Timeout) => {
                        let Some(table) = table.upgrade() else {
                            break;
                        };
                        table.run_expiration_pass();
                    }
                }
            })
            .expect("failed to spawn janitor thread");

        Self {
            stop_tx,
            handle: Some(handle),
        }
    }

    /// Deliver the one-shot stop signal and join the worker. Idempotent:
    /// a second call finds the sender's channel already useless (the thread
    /// has exited) and simply no-ops.
    fn stop(&mut self) {
        let _ = self.stop_tx.send(());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Janitor {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Test-only helper kept generic over `Arc<T>` so unit tests in this module
/// don't need a full `Table`.
#[cfg(test)]
struct CountingSweeper {
    sweeps: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl Sweepable for CountingSweeper {
    fn run_expiration_pass(&self) {
        self.sweeps.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn ticks_trigger_expiration_pass() {
        let sweeper = Arc::new(CountingSweeper {
            sweeps: AtomicUsize::new(0),
        });
        let janitor = Janitor::spawn(Arc::downgrade(&sweeper), Duration::from_millis(5));

        thread::sleep(Duration::from_millis(40));
        drop(janitor);

        assert!(sweeper.sweeps.load(Ordering::SeqCst) >= 2);
    }

    #[test]
    fn stop_is_delivered_exactly_once_and_is_idempotent_in_effect() {
        let sweeper = Arc::new(CountingSweeper {
            sweeps: AtomicUsize::new(0),
        });
        let mut janitor = Janitor::spawn(Arc::downgrade(&sweeper), Duration::from_secs(3600));

        janitor.stop();
        let after_first_stop = sweeper.sweeps.load(Ordering::SeqCst);
        janitor.stop();
        assert_eq!(sweeper.sweeps.load(Ordering::SeqCst), after_first_stop);
    }

    #[test]
    fn janitor_exits_once_table_is_dropped() {
        let sweeper = Arc::new(CountingSweeper {
            sweeps: AtomicUsize::new(0),
        });
        let weak = Arc::downgrade(&sweeper);
        let janitor = Janitor::spawn(weak, Duration::from_millis(5));
        drop(sweeper);

        // The worker should notice the table is gone on its next tick and
        // exit on its own; joining on drop must not hang.
        drop(janitor);
    }
}
