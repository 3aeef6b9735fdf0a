//! Interface change events and snapshot diffing.

use super::Observer;
use crate::address::{IpAddress, IpAddressInfo};
use crate::network::{Interface, Interfaces};

/// A change observed between two interface snapshots.
///
/// Every variant carries the interface record as it is *after* the change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterfaceEvent {
    /// An interface appeared (or is being replayed to a new observer).
    Added(Interface),
    /// An interface disappeared. Carries its last known state.
    Removed(Interface),
    /// The administrative state changed.
    EnabledChanged {
        /// The updated interface.
        interface: Interface,
        /// New enabled state.
        is_enabled: bool,
    },
    /// The link state changed.
    ConnectedChanged {
        /// The updated interface.
        interface: Interface,
        /// New connected state.
        is_connected: bool,
    },
    /// The user facing name changed.
    AliasChanged {
        /// The updated interface.
        interface: Interface,
        /// New alias.
        alias: String,
    },
    /// The address list changed (compared as an ordered list).
    IpAddressInfosChanged {
        /// The updated interface.
        interface: Interface,
        /// New address list.
        ip_address_infos: Vec<IpAddressInfo>,
    },
    /// The gateway list changed (compared as an ordered list).
    GatewaysChanged {
        /// The updated interface.
        interface: Interface,
        /// New gateway list.
        gateways: Vec<IpAddress>,
    },
}

impl InterfaceEvent {
    /// Returns the interface this event is about.
    #[must_use]
    pub const fn interface(&self) -> &Interface {
        match self {
            Self::Added(interface)
            | Self::Removed(interface)
            | Self::EnabledChanged { interface, .. }
            | Self::ConnectedChanged { interface, .. }
            | Self::AliasChanged { interface, .. }
            | Self::IpAddressInfosChanged { interface, .. }
            | Self::GatewaysChanged { interface, .. } => interface,
        }
    }

    /// Returns true for [`InterfaceEvent::Added`].
    #[must_use]
    pub const fn is_added(&self) -> bool {
        matches!(self, Self::Added(_))
    }

    /// Returns true for [`InterfaceEvent::Removed`].
    #[must_use]
    pub const fn is_removed(&self) -> bool {
        matches!(self, Self::Removed(_))
    }

    /// Invokes the observer callback matching this event.
    pub fn notify(&self, observer: &dyn Observer) {
        match self {
            Self::Added(interface) => observer.on_interface_added(interface),
            Self::Removed(interface) => observer.on_interface_removed(interface),
            Self::EnabledChanged {
                interface,
                is_enabled,
            } => observer.on_enabled_state_changed(interface, *is_enabled),
            Self::ConnectedChanged {
                interface,
                is_connected,
            } => observer.on_connected_state_changed(interface, *is_connected),
            Self::AliasChanged { interface, alias } => observer.on_alias_changed(interface, alias),
            Self::IpAddressInfosChanged {
                interface,
                ip_address_infos,
            } => observer.on_ip_address_infos_changed(interface, ip_address_infos),
            Self::GatewaysChanged {
                interface,
                gateways,
            } => observer.on_gateways_changed(interface, gateways),
        }
    }
}

/// Compares two full snapshots and returns the events that turn `previous`
/// into `next`.
///
/// This is a pure function. Events come out in a fixed order:
///
/// 1. `Removed` for ids only in `previous`, in `previous` order
/// 2. `Added` for ids only in `next`, in `next` order
/// 3. Field changes for ids in both, in `previous` order. Within one
///    interface the fields are checked as enabled, connected, alias,
///    addresses, gateways.
///
/// Description, MAC, kind and the virtual flag are not tracked; a change
/// there is only visible through the record carried by other events.
#[must_use]
pub fn diff(previous: &Interfaces, next: &Interfaces) -> Vec<InterfaceEvent> {
    let mut events: Vec<InterfaceEvent> = previous
        .iter()
        .filter(|(id, _)| !next.contains_key(*id))
        .map(|(_, interface)| InterfaceEvent::Removed(interface.clone()))
        .collect();

    events.extend(
        next.iter()
            .filter(|(id, _)| !previous.contains_key(*id))
            .map(|(_, interface)| InterfaceEvent::Added(interface.clone())),
    );

    for (id, old) in previous {
        if let Some(new) = next.get(id) {
            diff_interface(&mut events, old, new);
        }
    }

    events
}

/// Appends one event per tracked field that differs.
fn diff_interface(events: &mut Vec<InterfaceEvent>, old: &Interface, new: &Interface) {
    if old.is_enabled != new.is_enabled {
        events.push(InterfaceEvent::EnabledChanged {
            interface: new.clone(),
            is_enabled: new.is_enabled,
        });
    }
    if old.is_connected != new.is_connected {
        events.push(InterfaceEvent::ConnectedChanged {
            interface: new.clone(),
            is_connected: new.is_connected,
        });
    }
    if old.alias != new.alias {
        events.push(InterfaceEvent::AliasChanged {
            interface: new.clone(),
            alias: new.alias.clone(),
        });
    }
    if old.ip_address_infos != new.ip_address_infos {
        events.push(InterfaceEvent::IpAddressInfosChanged {
            interface: new.clone(),
            ip_address_infos: new.ip_address_infos.clone(),
        });
    }
    if old.gateways != new.gateways {
        events.push(InterfaceEvent::GatewaysChanged {
            interface: new.clone(),
            gateways: new.gateways.clone(),
        });
    }
}

#[cfg(test)]
#[path = "change_tests.rs"]
mod tests;
