//! Netmask construction and contiguity checks.

use super::AddressError;
use super::ip::{AddressKind, IpAddress, PackedV6};

/// Builds a packed IPv4 mask with `count` leading one bits. Counts of 32 or
/// more give an all-ones mask.
#[must_use]
pub const fn make_packed_mask_v4(count: u8) -> u32 {
    match count {
        0 => 0,
        1..=31 => u32::MAX << (32 - count as u32),
        _ => u32::MAX,
    }
}

/// Builds a packed IPv6 mask with `count` leading one bits.
#[must_use]
pub const fn make_packed_mask_v6(count: u8) -> PackedV6 {
    PackedV6::from_prefix_length(count)
}

/// Checks that an IPv4 netmask is a non-empty run of ones from the top bit.
///
/// # Errors
///
/// - [`AddressError::TypeMismatch`] if `netmask` is not IPv4.
/// - [`AddressError::Parse`] if the mask is empty or not contiguous.
pub fn validate_netmask_v4(netmask: &IpAddress) -> Result<(), AddressError> {
    let packed = netmask.packed_v4()?;
    if packed == 0 {
        return Err(AddressError::parse(netmask.as_str(), "netmask is empty"));
    }
    if packed.leading_ones() + packed.trailing_zeros() != u32::BITS {
        return Err(AddressError::parse(
            netmask.as_str(),
            "netmask is not contiguous",
        ));
    }
    Ok(())
}

/// Checks that an IPv6 netmask matches the mask rebuilt from its prefix length.
///
/// # Errors
///
/// - [`AddressError::TypeMismatch`] if `netmask` is not IPv6.
/// - [`AddressError::Parse`] if the mask is not contiguous.
pub fn validate_netmask_v6(netmask: &IpAddress) -> Result<(), AddressError> {
    let packed = netmask.packed_v6()?;
    if make_packed_mask_v6(packed.prefix_length()) != packed {
        return Err(AddressError::parse(
            netmask.as_str(),
            "netmask is not contiguous",
        ));
    }
    Ok(())
}

/// Validates a netmask of either family.
///
/// # Errors
///
/// See [`validate_netmask_v4`] and [`validate_netmask_v6`]. The `None`
/// address is a [`AddressError::TypeMismatch`].
pub fn validate_netmask(netmask: &IpAddress) -> Result<(), AddressError> {
    match netmask.kind() {
        AddressKind::V4 => validate_netmask_v4(netmask),
        AddressKind::V6 => validate_netmask_v6(netmask),
        AddressKind::None => Err(AddressError::mismatch("netmask validation")),
    }
}

/// Returns the prefix length of a valid netmask.
///
/// # Errors
///
/// Fails like [`validate_netmask`].
#[allow(clippy::cast_possible_truncation)] // At most 32
pub fn prefix_length(netmask: &IpAddress) -> Result<u8, AddressError> {
    validate_netmask(netmask)?;
    match netmask.kind() {
        AddressKind::V6 => Ok(netmask.packed_v6()?.prefix_length()),
        _ => Ok(netmask.packed_v4()?.count_ones() as u8),
    }
}
