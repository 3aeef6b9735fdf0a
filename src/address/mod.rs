//! IP address value types.
//!
//! This module provides:
//! - A strict IPv4/IPv6 address value ([`IpAddress`]) with parsing, RFC 5952
//!   text rendering, packing and wrapping arithmetic
//! - Netmask construction and contiguity checks ([`validate_netmask`])
//! - Address/netmask pairs with derived network addresses ([`IpAddressInfo`])
//! - The error type shared by all of the above ([`AddressError`])

mod error;
mod format;
mod info;
mod ip;
mod netmask;
mod ops;
mod parse;

pub use error::AddressError;
pub use info::IpAddressInfo;
pub use ip::{AddressKind, IpAddress, PackedV6, pack_v4, pack_v6, unpack_v4, unpack_v6};
pub use netmask::{
    make_packed_mask_v4, make_packed_mask_v6, prefix_length, validate_netmask,
    validate_netmask_v4, validate_netmask_v6,
};
