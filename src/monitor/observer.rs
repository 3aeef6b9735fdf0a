//! Observer and polling-driver traits.

use crate::address::{IpAddress, IpAddressInfo};
use crate::network::{Interface, Interfaces};
use std::sync::Arc;

/// Receives interface change notifications.
///
/// Every callback defaults to a no-op, so implementors override only what
/// they need. Callbacks run on the thread that applied the snapshot (the
/// poller thread, or the caller of `register_observer` during replay).
/// A panicking callback is logged and skipped.
#[allow(unused_variables)]
pub trait Observer: Send + Sync {
    /// An interface appeared, or is replayed on registration.
    fn on_interface_added(&self, interface: &Interface) {}

    /// An interface disappeared.
    fn on_interface_removed(&self, interface: &Interface) {}

    /// The administrative state changed.
    fn on_enabled_state_changed(&self, interface: &Interface, is_enabled: bool) {}

    /// The link state changed.
    fn on_connected_state_changed(&self, interface: &Interface, is_connected: bool) {}

    /// The alias changed.
    fn on_alias_changed(&self, interface: &Interface, alias: &str) {}

    /// The ordered address list changed.
    fn on_ip_address_infos_changed(&self, interface: &Interface, ip_address_infos: &[IpAddressInfo]) {}

    /// The ordered gateway list changed.
    fn on_gateways_changed(&self, interface: &Interface, gateways: &[IpAddress]) {}
}

/// Accepts full snapshots from a polling driver.
pub trait SnapshotSink: Send + Sync {
    /// Diffs `interfaces` against the retained snapshot, notifies observers
    /// and retains `interfaces`.
    fn on_new_interfaces(&self, interfaces: Interfaces);
}

/// Produces snapshots on behalf of the monitor.
///
/// The monitor never depends on a concrete driver. [`super::ThreadPoller`]
/// is the default one.
pub trait PollingDriver: Send + Sync {
    /// Blocks until at least one snapshot has been delivered to `sink`
    /// since the driver was last (re)started.
    fn wait_for_first_enumeration(&self, sink: &Arc<dyn SnapshotSink>);

    /// Starts periodic polling into `sink`.
    fn on_first_observer_registered(&self, sink: &Arc<dyn SnapshotSink>);

    /// Stops polling and resets the first-enumeration barrier.
    fn on_last_observer_unregistered(&self);
}

impl<T: PollingDriver + ?Sized> PollingDriver for Arc<T> {
    fn wait_for_first_enumeration(&self, sink: &Arc<dyn SnapshotSink>) {
        (**self).wait_for_first_enumeration(sink);
    }

    fn on_first_observer_registered(&self, sink: &Arc<dyn SnapshotSink>) {
        (**self).on_first_observer_registered(sink);
    }

    fn on_last_observer_unregistered(&self) {
        (**self).on_last_observer_unregistered();
    }
}
