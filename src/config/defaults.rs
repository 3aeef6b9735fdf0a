//! Default values for configuration options.
//!
//! Centralized constants to avoid magic numbers scattered across the codebase.

use std::time::Duration;

/// Default polling interval in milliseconds.
pub const POLL_INTERVAL_MS: u64 = 1000;

/// Default separator between MAC address bytes.
pub const MAC_SEPARATOR: char = ':';

/// Whether MAC addresses are printed in uppercase by default.
pub const MAC_UPPERCASE: bool = true;

/// Default polling interval as Duration.
#[must_use]
pub const fn poll_interval() -> Duration {
    Duration::from_millis(POLL_INTERVAL_MS)
}
