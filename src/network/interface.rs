//! Core types for interface representation.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::MacAddress;
use crate::address::{IpAddress, IpAddressInfo};

/// A full snapshot of every known interface, keyed by [`Interface::id`].
///
/// The map iterates in id order, which is the order used for enumeration
/// and for event emission.
pub type Interfaces = BTreeMap<String, Interface>;

/// Network interface type classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum InterfaceKind {
    /// Unknown or unclassified interface.
    #[default]
    None,
    /// Loopback interface (localhost).
    Loopback,
    /// Wired Ethernet interface.
    Ethernet,
    /// Wireless (Wi-Fi) interface.
    WiFi,
    /// Apple Wireless Direct Link.
    Awdl,
}

impl InterfaceKind {
    /// Returns true if this is a loopback interface.
    #[must_use]
    pub const fn is_loopback(self) -> bool {
        matches!(self, Self::Loopback)
    }
}

impl fmt::Display for InterfaceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Loopback => write!(f, "Loopback"),
            Self::Ethernet => write!(f, "Ethernet"),
            Self::WiFi => write!(f, "WiFi"),
            Self::Awdl => write!(f, "AWDL"),
        }
    }
}

/// The state of one network interface at a point in time.
///
/// # Identity
///
/// Two snapshots describe the same interface when their `id` matches.
/// Address and gateway order matters for equality.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[allow(clippy::struct_excessive_bools)] // Interface flags are naturally boolean
pub struct Interface {
    /// Unique identifier, stable across polls.
    pub id: String,
    /// Human readable description of the device.
    pub description: String,
    /// User facing name, which may change while the interface exists.
    pub alias: String,
    /// Hardware address.
    pub mac_address: MacAddress,
    /// Assigned addresses with their netmasks, in OS order.
    pub ip_address_infos: Vec<IpAddressInfo>,
    /// Gateway addresses, in OS order.
    pub gateways: Vec<IpAddress>,
    /// Interface type.
    pub kind: InterfaceKind,
    /// Administratively up.
    pub is_enabled: bool,
    /// Up with a carrier.
    pub is_connected: bool,
    /// Backed by software rather than a physical device.
    pub is_virtual: bool,
}

impl Interface {
    /// Creates an interface whose description and alias default to its id.
    #[must_use]
    pub fn new(id: impl Into<String>, kind: InterfaceKind) -> Self {
        let id = id.into();
        Self {
            description: id.clone(),
            alias: id.clone(),
            id,
            kind,
            is_virtual: kind.is_loopback(),
            ..Self::default()
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the alias.
    #[must_use]
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    /// Sets the hardware address.
    #[must_use]
    pub const fn with_mac_address(mut self, mac_address: MacAddress) -> Self {
        self.mac_address = mac_address;
        self
    }

    /// Appends an address/netmask pair.
    #[must_use]
    pub fn with_ip_address_info(mut self, info: IpAddressInfo) -> Self {
        self.ip_address_infos.push(info);
        self
    }

    /// Appends a gateway.
    #[must_use]
    pub fn with_gateway(mut self, gateway: IpAddress) -> Self {
        self.gateways.push(gateway);
        self
    }

    /// Sets the enabled and connected flags.
    #[must_use]
    pub const fn with_state(mut self, is_enabled: bool, is_connected: bool) -> Self {
        self.is_enabled = is_enabled;
        self.is_connected = is_connected;
        self
    }

    /// Marks the interface as virtual or physical.
    #[must_use]
    pub const fn with_virtual(mut self, is_virtual: bool) -> Self {
        self.is_virtual = is_virtual;
        self
    }

    /// Returns true if any address is assigned.
    #[must_use]
    pub fn has_addresses(&self) -> bool {
        !self.ip_address_infos.is_empty()
    }
}
