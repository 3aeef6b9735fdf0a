//! Platform-specific interface fetcher implementations.
//!
//! # Platform Support
//!
//! - **Windows**: Uses `GetAdaptersAddresses` via the `windows` crate.
//! - **Linux / other Unix**: Uses `getifaddrs` via `libc`, plus
//!   `/proc/net/route` for default gateways on Linux.

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;

#[cfg(unix)]
pub use unix::UnixFetcher;
#[cfg(windows)]
pub use windows::WindowsFetcher;

/// The fetcher for the platform this crate was built for.
#[cfg(unix)]
pub use unix::UnixFetcher as PlatformFetcher;
/// The fetcher for the platform this crate was built for.
#[cfg(windows)]
pub use windows::WindowsFetcher as PlatformFetcher;
