//! Network layer for fetching and representing interface information.
//!
//! This module provides types and traits for:
//! - Representing interface snapshots ([`Interface`], [`Interfaces`])
//! - Hardware addresses ([`MacAddress`])
//! - Interface type classification ([`InterfaceKind`])
//! - Fetching interface information ([`InterfaceFetcher`])
//! - Filtering interfaces ([`filter`])
//! - Platform-specific implementations ([`platform`])

mod fetcher;
pub mod filter;
mod interface;
mod mac;
pub mod platform;

pub use fetcher::{FetchError, InterfaceFetcher};
pub use interface::{Interface, InterfaceKind, Interfaces};
pub use mac::MacAddress;
