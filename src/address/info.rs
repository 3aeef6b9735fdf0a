//! An address paired with its netmask.

use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use super::AddressError;
use super::ip::{AddressKind, IpAddress};
use super::netmask::{prefix_length, validate_netmask_v4};

/// A private IPv4 block and the least specific mask it accepts.
struct PrivateRange {
    first: u32,
    last: u32,
    mask: u32,
}

const PRIVATE_RANGES: [PrivateRange; 3] = [
    // 10.0.0.0/8
    PrivateRange {
        first: 0x0A00_0000,
        last: 0x0AFF_FFFF,
        mask: 0xFF00_0000,
    },
    // 172.16.0.0/12
    PrivateRange {
        first: 0xAC10_0000,
        last: 0xAC1F_FFFF,
        mask: 0xFFF0_0000,
    },
    // 192.168.0.0/16
    PrivateRange {
        first: 0xC0A8_0000,
        last: 0xC0A8_FFFF,
        mask: 0xFFFF_0000,
    },
];

/// An interface address together with its netmask.
///
/// Derived addresses are recomputed on every call; the netmask is checked
/// for contiguity each time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct IpAddressInfo {
    /// The address itself.
    pub address: IpAddress,
    /// Netmask of the network the address belongs to.
    pub netmask: IpAddress,
}

impl IpAddressInfo {
    /// Creates a new address/netmask pair.
    #[must_use]
    pub const fn new(address: IpAddress, netmask: IpAddress) -> Self {
        Self { address, netmask }
    }

    /// Compares by address, then by netmask.
    ///
    /// # Errors
    ///
    /// Fails when a compared pair of addresses are both `None`.
    pub fn try_cmp(&self, other: &Self) -> Result<Ordering, AddressError> {
        match self.address.try_cmp(&other.address)? {
            Ordering::Equal => self.netmask.try_cmp(&other.netmask),
            ordering => Ok(ordering),
        }
    }

    /// Packed address and netmask, once both are known to be IPv4 and the
    /// mask is contiguous.
    fn packed_v4(&self, operation: &'static str) -> Result<(u32, u32), AddressError> {
        match (self.address.kind(), self.netmask.kind()) {
            (AddressKind::V4, AddressKind::V4) => {
                validate_netmask_v4(&self.netmask)?;
                Ok((self.address.packed_v4()?, self.netmask.packed_v4()?))
            }
            (AddressKind::V6, AddressKind::V6) => Err(AddressError::unsupported(operation)),
            _ => Err(AddressError::mismatch(operation)),
        }
    }

    /// Returns `address & netmask`.
    ///
    /// # Errors
    ///
    /// - [`AddressError::TypeMismatch`] for mixed or `None` families.
    /// - [`AddressError::Unsupported`] for IPv6.
    /// - [`AddressError::Parse`] for an invalid netmask.
    pub fn network_base_address(&self) -> Result<IpAddress, AddressError> {
        let (address, netmask) = self.packed_v4("network base address")?;
        Ok(IpAddress::from_packed_v4(address & netmask))
    }

    /// Returns `address | !netmask`.
    ///
    /// # Errors
    ///
    /// Same as [`network_base_address`](Self::network_base_address).
    pub fn broadcast_address(&self) -> Result<IpAddress, AddressError> {
        let (address, netmask) = self.packed_v4("broadcast address")?;
        Ok(IpAddress::from_packed_v4(address | !netmask))
    }

    /// True if the address lies in 10/8, 172.16/12 or 192.168/16 and the
    /// netmask is at least as specific as that block.
    ///
    /// # Errors
    ///
    /// Same as [`network_base_address`](Self::network_base_address). An
    /// invalid netmask fails before any range is considered.
    pub fn is_private_network_address(&self) -> Result<bool, AddressError> {
        let (address, netmask) = self.packed_v4("private network check")?;
        Ok(PRIVATE_RANGES
            .iter()
            .any(|range| (range.first..=range.last).contains(&address) && netmask >= range.mask))
    }

    /// Prefix length of the netmask.
    ///
    /// # Errors
    ///
    /// Fails if the netmask is not a valid contiguous mask.
    pub fn prefix_length(&self) -> Result<u8, AddressError> {
        prefix_length(&self.netmask)
    }
}

impl fmt::Display for IpAddressInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.prefix_length() {
            Ok(prefix) => write!(f, "{}/{prefix}", self.address),
            Err(_) => write!(f, "{} netmask {}", self.address, self.netmask),
        }
    }
}

#[cfg(test)]
#[path = "info_tests.rs"]
mod tests;
