//! The interface monitor service: retained snapshot plus observer registry.

use super::{InterfaceEvent, MonitorError, Observer, PollingDriver, SnapshotSink, ThreadPoller, diff};
use crate::network::{Interface, InterfaceFetcher, Interfaces};
use parking_lot::{Mutex, ReentrantMutex};
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::time::Duration;

/// Retained snapshot and registered observers.
#[derive(Default)]
struct State {
    interfaces: Interfaces,
    observers: Vec<Arc<dyn Observer>>,
    /// Nesting depth of replays running on the thread holding `dispatch`.
    replay_depth: usize,
    /// The last observer left during a replay; the driver is stopped once
    /// the outermost replay releases `dispatch`.
    stop_pending: bool,
}

impl State {
    /// Returns true if the driver should be stopped now, false if there is
    /// nothing to stop or the stop was deferred to the running replay.
    fn release_driver(&mut self, became_empty: bool) -> bool {
        if !became_empty {
            return false;
        }
        if self.replay_depth > 0 {
            tracing::debug!("Last observer left during replay, deferring poller stop");
            self.stop_pending = true;
            return false;
        }
        true
    }
}

/// Shared core that receives snapshots from the driver.
///
/// `dispatch` serializes snapshot application, replay and unregistration,
/// so callbacks never interleave and nothing is delivered to an observer
/// after its unregistration returns. It is re-entrant so callbacks may call
/// back into the monitor. `state` is only held for short critical sections,
/// never while a callback runs.
#[derive(Default)]
struct Registry {
    dispatch: ReentrantMutex<()>,
    state: Mutex<State>,
}

impl Registry {
    fn is_registered(&self, observer: &Arc<dyn Observer>) -> bool {
        self.state
            .lock()
            .observers
            .iter()
            .any(|registered| same_observer(registered, observer))
    }

    fn dispatch(&self, events: &[InterfaceEvent], observers: &[Arc<dyn Observer>]) {
        for event in events {
            for observer in observers {
                // Skip observers unregistered by an earlier callback.
                if self.is_registered(observer) {
                    deliver(event, observer.as_ref());
                }
            }
        }
    }
}

impl SnapshotSink for Registry {
    fn on_new_interfaces(&self, interfaces: Interfaces) {
        let _dispatch = self.dispatch.lock();

        let (events, observers) = {
            let mut state = self.state.lock();
            let events = diff(&state.interfaces, &interfaces);
            state.interfaces = interfaces;
            (events, state.observers.clone())
        };

        if !events.is_empty() {
            tracing::debug!(
                "Dispatching {} events to {} observers",
                events.len(),
                observers.len()
            );
        }
        self.dispatch(&events, &observers);
    }
}

/// Compares observers by allocation, ignoring vtable identity.
fn same_observer(a: &Arc<dyn Observer>, b: &Arc<dyn Observer>) -> bool {
    std::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
}

/// Invokes one callback, logging and swallowing a panic.
fn deliver(event: &InterfaceEvent, observer: &dyn Observer) {
    if catch_unwind(AssertUnwindSafe(|| event.notify(observer))).is_err() {
        tracing::warn!(
            "Observer panicked while handling an event for {}",
            event.interface().id
        );
    }
}

/// Watches the host's network interfaces and notifies observers of changes.
///
/// This is an explicitly owned service object: construct one, share it by
/// reference (or `Arc`), and drop it (or call [`shutdown`](Self::shutdown))
/// to stop polling.
///
/// # Polling
///
/// The driver starts polling when the first observer registers and stops
/// when the last one unregisters. Queries made while nothing is registered
/// see the snapshot taken by the first query (or the last one retained).
///
/// # Example
///
/// ```no_run
/// use netif_watch::monitor::{InterfaceMonitor, Observer};
/// use netif_watch::network::{Interface, platform::PlatformFetcher};
/// use std::sync::Arc;
///
/// struct Printer;
///
/// impl Observer for Printer {
///     fn on_interface_added(&self, interface: &Interface) {
///         println!("+ {}", interface.id);
///     }
/// }
///
/// let monitor = InterfaceMonitor::new(PlatformFetcher::new());
/// let _subscription = monitor.subscribe(Arc::new(Printer));
/// std::thread::sleep(std::time::Duration::from_secs(10));
/// ```
pub struct InterfaceMonitor {
    registry: Arc<Registry>,
    driver: Box<dyn PollingDriver>,
}

impl InterfaceMonitor {
    /// Creates a monitor polling `fetcher` every second.
    #[must_use]
    pub fn new<F: InterfaceFetcher + 'static>(fetcher: F) -> Self {
        Self::with_driver(ThreadPoller::new(fetcher))
    }

    /// Creates a monitor polling `fetcher` at a custom cadence.
    #[must_use]
    pub fn with_poll_interval<F: InterfaceFetcher + 'static>(fetcher: F, interval: Duration) -> Self {
        Self::with_driver(ThreadPoller::with_interval(fetcher, interval))
    }

    /// Creates a monitor fed by any polling driver.
    #[must_use]
    pub fn with_driver<D: PollingDriver + 'static>(driver: D) -> Self {
        Self {
            registry: Arc::new(Registry::default()),
            driver: Box::new(driver),
        }
    }

    fn sink(&self) -> Arc<dyn SnapshotSink> {
        Arc::clone(&self.registry) as Arc<dyn SnapshotSink>
    }

    /// Calls `visit` for every known interface, in id order.
    ///
    /// Blocks until the first snapshot is available. A panic in `visit` is
    /// logged and enumeration continues with the next interface.
    pub fn enumerate_interfaces(&self, mut visit: impl FnMut(&Interface)) {
        self.driver.wait_for_first_enumeration(&self.sink());

        let interfaces = self.registry.state.lock().interfaces.clone();
        for interface in interfaces.values() {
            if catch_unwind(AssertUnwindSafe(|| visit(interface))).is_err() {
                tracing::warn!("Enumeration callback panicked on {}", interface.id);
            }
        }
    }

    /// Returns a copy of every known interface.
    ///
    /// Blocks until the first snapshot is available.
    #[must_use]
    pub fn interfaces(&self) -> Interfaces {
        self.driver.wait_for_first_enumeration(&self.sink());
        self.registry.state.lock().interfaces.clone()
    }

    /// Looks up an interface by id.
    ///
    /// Blocks until the first snapshot is available.
    ///
    /// # Errors
    ///
    /// Returns [`MonitorError::NotFound`] if no interface has this id.
    pub fn get_interface_by_name(&self, name: &str) -> Result<Interface, MonitorError> {
        self.driver.wait_for_first_enumeration(&self.sink());

        self.registry
            .state
            .lock()
            .interfaces
            .get(name)
            .cloned()
            .ok_or_else(|| MonitorError::NotFound {
                name: name.to_string(),
            })
    }

    /// Registers `observer` and replays every known interface to it as
    /// `Added` before returning.
    ///
    /// Registering the same `Arc` twice is a no-op. The first registration
    /// starts the polling driver.
    pub fn register_observer(&self, observer: &Arc<dyn Observer>) {
        self.driver.wait_for_first_enumeration(&self.sink());

        let (start, stop) = {
            let _dispatch = self.registry.dispatch.lock();

            let (replay, is_first) = {
                let mut state = self.registry.state.lock();
                if state
                    .observers
                    .iter()
                    .any(|registered| same_observer(registered, observer))
                {
                    return;
                }
                state.observers.push(Arc::clone(observer));
                state.replay_depth += 1;
                (
                    diff(&Interfaces::new(), &state.interfaces),
                    state.observers.len() == 1,
                )
            };

            for event in &replay {
                if !self.registry.is_registered(observer) {
                    break;
                }
                deliver(event, observer.as_ref());
            }

            let mut state = self.registry.state.lock();
            state.replay_depth -= 1;
            let stop = state.replay_depth == 0
                && std::mem::take(&mut state.stop_pending)
                && state.observers.is_empty();
            (is_first && !state.observers.is_empty(), stop)
        };

        // The driver is never started or stopped while `dispatch` is held.
        if stop {
            tracing::debug!("Last observer unregistered, stopping poller");
            self.driver.on_last_observer_unregistered();
        } else if start {
            tracing::debug!("First observer registered, starting poller");
            self.driver.on_first_observer_registered(&self.sink());
        }
    }

    /// Unregisters `observer`. Unknown observers are ignored.
    ///
    /// Once this returns no further callbacks reach `observer`. The last
    /// unregistration stops the polling driver; when it happens inside a
    /// replay the stop runs as that registration returns.
    pub fn unregister_observer(&self, observer: &Arc<dyn Observer>) {
        let is_last = {
            let _dispatch = self.registry.dispatch.lock();
            let mut state = self.registry.state.lock();

            let before = state.observers.len();
            state
                .observers
                .retain(|registered| !same_observer(registered, observer));
            let became_empty = before != state.observers.len() && state.observers.is_empty();
            state.release_driver(became_empty)
        };

        if is_last {
            tracing::debug!("Last observer unregistered, stopping poller");
            self.driver.on_last_observer_unregistered();
        }
    }

    /// Registers `observer` and returns a guard that unregisters it on drop.
    #[must_use = "dropping the subscription unregisters the observer immediately"]
    pub fn subscribe(&self, observer: Arc<dyn Observer>) -> Subscription<'_> {
        self.register_observer(&observer);
        Subscription {
            monitor: self,
            observer,
        }
    }

    /// Returns the number of registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.registry.state.lock().observers.len()
    }

    /// Unregisters every observer and stops the polling driver.
    pub fn shutdown(&self) {
        let had_observers = {
            let _dispatch = self.registry.dispatch.lock();
            let mut state = self.registry.state.lock();
            let had_observers = !state.observers.is_empty();
            state.observers.clear();
            state.release_driver(had_observers)
        };

        if had_observers {
            self.driver.on_last_observer_unregistered();
        }
    }
}

impl Drop for InterfaceMonitor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for InterfaceMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.registry.state.lock();
        f.debug_struct("InterfaceMonitor")
            .field("interfaces", &state.interfaces.len())
            .field("observers", &state.observers.len())
            .finish_non_exhaustive()
    }
}

/// Keeps an observer registered for as long as it lives.
///
/// Returned by [`InterfaceMonitor::subscribe`].
pub struct Subscription<'a> {
    monitor: &'a InterfaceMonitor,
    observer: Arc<dyn Observer>,
}

impl Subscription<'_> {
    /// Returns the subscribed observer.
    #[must_use]
    pub const fn observer(&self) -> &Arc<dyn Observer> {
        &self.observer
    }
}

impl Drop for Subscription<'_> {
    fn drop(&mut self) {
        self.monitor.unregister_observer(&self.observer);
    }
}

impl std::fmt::Debug for Subscription<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
