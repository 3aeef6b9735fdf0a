//! Thread-based polling driver.
//!
//! [`ThreadPoller`] fetches a full snapshot on a fixed cadence from a
//! dedicated background thread and hands it to a [`SnapshotSink`].

use super::{PollingDriver, SnapshotSink};
use crate::network::InterfaceFetcher;
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Name of the background polling thread.
pub const POLLER_THREAD_NAME: &str = "netif-watch-poller";

/// Default time between two snapshots.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Granularity of the stop-flag check while sleeping.
const STOP_CHECK_TICK: Duration = Duration::from_millis(10);

/// State of the first-enumeration barrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Enumeration {
    /// No snapshot delivered since the last (re)start.
    Pending,
    /// A caller is fetching the first snapshot synchronously.
    InProgress,
    /// At least one snapshot has been delivered.
    Done,
}

/// A running poller thread and its private stop flag.
struct Worker {
    handle: JoinHandle<()>,
    stop: Arc<AtomicBool>,
}

struct Shared<F> {
    fetcher: F,
    interval: Duration,
    barrier: Mutex<Enumeration>,
    enumerated: Condvar,
}

impl<F: InterfaceFetcher> Shared<F> {
    /// Fetches once and delivers the result. A failed fetch keeps the
    /// retained snapshot.
    fn refresh(&self, sink: &dyn SnapshotSink) {
        match self.fetcher.fetch() {
            Ok(interfaces) => {
                tracing::debug!("Fetched {} interfaces", interfaces.len());
                sink.on_new_interfaces(interfaces);
            }
            Err(e) => tracing::warn!("Failed to fetch interfaces: {e}"),
        }
    }

    fn mark_enumerated(&self) {
        *self.barrier.lock() = Enumeration::Done;
        self.enumerated.notify_all();
    }

    fn run(&self, sink: &dyn SnapshotSink, stop: &AtomicBool) {
        tracing::debug!("Poller started (interval {:?})", self.interval);

        while !stop.load(Ordering::Acquire) {
            self.refresh(sink);
            if stop.load(Ordering::Acquire) {
                break;
            }
            self.mark_enumerated();

            let deadline = Instant::now() + self.interval;
            while !stop.load(Ordering::Acquire) {
                let now = Instant::now();
                if now >= deadline {
                    break;
                }
                thread::sleep(STOP_CHECK_TICK.min(deadline - now));
            }
        }

        tracing::debug!("Poller stopped");
    }
}

/// The default [`PollingDriver`]: one background thread per running period.
///
/// # Lifecycle
///
/// - `on_first_observer_registered` spawns the thread
/// - `on_last_observer_unregistered` sets its stop flag, joins it, and resets
///   the first-enumeration barrier
/// - `wait_for_first_enumeration` performs a synchronous fetch if nothing
///   has been delivered yet; concurrent callers wait for that fetch
///
/// Dropping the poller stops the thread.
pub struct ThreadPoller<F> {
    shared: Arc<Shared<F>>,
    worker: Mutex<Option<Worker>>,
}

impl<F: InterfaceFetcher + 'static> ThreadPoller<F> {
    /// Creates a poller with the default one second cadence.
    #[must_use]
    pub fn new(fetcher: F) -> Self {
        Self::with_interval(fetcher, DEFAULT_POLL_INTERVAL)
    }

    /// Creates a poller with a custom cadence.
    #[must_use]
    pub fn with_interval(fetcher: F, interval: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                fetcher,
                interval,
                barrier: Mutex::new(Enumeration::Pending),
                enumerated: Condvar::new(),
            }),
            worker: Mutex::new(None),
        }
    }

    /// Returns the configured cadence.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.shared.interval
    }

    /// Returns true while the background thread is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.worker.lock().is_some()
    }

    fn stop(&self) {
        let Some(worker) = self.worker.lock().take() else {
            return;
        };
        worker.stop.store(true, Ordering::Release);

        // An observer may unregister from inside a callback on the poller
        // thread; that thread exits on its own at the next tick.
        if worker.handle.thread().id() != thread::current().id()
            && worker.handle.join().is_err()
        {
            tracing::warn!("Poller thread panicked");
        }

        *self.shared.barrier.lock() = Enumeration::Pending;
    }
}

impl<F: InterfaceFetcher + 'static> PollingDriver for ThreadPoller<F> {
    fn wait_for_first_enumeration(&self, sink: &Arc<dyn SnapshotSink>) {
        let mut state = self.shared.barrier.lock();
        loop {
            match *state {
                Enumeration::Done => return,
                Enumeration::InProgress => self.shared.enumerated.wait(&mut state),
                Enumeration::Pending => {
                    *state = Enumeration::InProgress;
                    drop(state);

                    self.shared.refresh(sink.as_ref());
                    self.shared.mark_enumerated();
                    return;
                }
            }
        }
    }

    fn on_first_observer_registered(&self, sink: &Arc<dyn SnapshotSink>) {
        let mut worker = self.worker.lock();
        if worker.is_some() {
            return;
        }

        let stop = Arc::new(AtomicBool::new(false));
        let shared = Arc::clone(&self.shared);
        let sink = Arc::clone(sink);
        let thread_stop = Arc::clone(&stop);

        match thread::Builder::new()
            .name(POLLER_THREAD_NAME.to_string())
            .spawn(move || shared.run(sink.as_ref(), &thread_stop))
        {
            Ok(handle) => *worker = Some(Worker { handle, stop }),
            Err(e) => tracing::warn!("Failed to spawn poller thread: {e}"),
        }
    }

    fn on_last_observer_unregistered(&self) {
        self.stop();
    }
}

impl<F> Drop for ThreadPoller<F> {
    fn drop(&mut self) {
        if let Some(worker) = self.worker.get_mut().take() {
            worker.stop.store(true, Ordering::Release);
            if worker.handle.thread().id() != thread::current().id() {
                let _ = worker.handle.join();
            }
        }
    }
}

impl<F> std::fmt::Debug for ThreadPoller<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThreadPoller")
            .field("interval", &self.shared.interval)
            .field("running", &self.worker.lock().is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;
