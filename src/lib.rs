//! netif-watch: Network Interface Watcher
//!
//! A strict IPv4/IPv6 address value type, plus a polling observer that
//! snapshots the host's network interfaces and reports what changed.

pub mod address;
pub mod config;
pub mod monitor;
pub mod network;
