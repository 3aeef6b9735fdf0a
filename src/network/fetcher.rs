//! Interface fetching trait and error types.

use super::Interfaces;
use thiserror::Error;

/// Error type for interface enumeration.
///
/// Describes what went wrong without dictating recovery strategy.
/// The poller logs these and keeps the previous snapshot.
#[derive(Debug, Error)]
pub enum FetchError {
    /// An OS call or pseudo-file read failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Windows API call failed.
    #[cfg(windows)]
    #[error("Windows API error: {0}")]
    WindowsApi(#[from] windows::core::Error),

    /// Permission denied to access network information.
    #[error("Permission denied: {context}")]
    PermissionDenied {
        /// Additional context about what permission was denied.
        context: String,
    },

    /// Platform-specific error with a generic message.
    #[error("Platform error: {message}")]
    Platform {
        /// Error message describing the platform-specific failure.
        message: String,
    },
}

/// Produces a full snapshot of the host's network interfaces.
///
/// # Design
///
/// - The monitor only ever talks to this trait, so tests drive it with
///   scripted snapshots
/// - Platform implementations live in [`super::platform`]
///
/// # Example
///
/// ```ignore
/// use netif_watch::network::{FetchError, InterfaceFetcher, Interfaces};
///
/// struct Scripted(std::sync::Mutex<Vec<Interfaces>>);
///
/// impl InterfaceFetcher for Scripted {
///     fn fetch(&self) -> Result<Interfaces, FetchError> {
///         Ok(self.0.lock().unwrap().pop().unwrap_or_default())
///     }
/// }
/// ```
pub trait InterfaceFetcher: Send + Sync {
    /// Enumerates every interface currently present.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when:
    /// - Platform API calls fail (`FetchError::WindowsApi`, `FetchError::Io`)
    /// - Insufficient permissions to access network information (`FetchError::PermissionDenied`)
    /// - Other platform-specific failures (`FetchError::Platform`)
    ///
    /// # Implementation Notes
    ///
    /// - Return ALL interfaces; filtering is done by a decorator
    /// - Address and gateway order within an interface should be stable across calls
    fn fetch(&self) -> Result<Interfaces, FetchError>;
}

impl<T: InterfaceFetcher + ?Sized> InterfaceFetcher for std::sync::Arc<T> {
    fn fetch(&self) -> Result<Interfaces, FetchError> {
        (**self).fetch()
    }
}

impl<T: InterfaceFetcher + ?Sized> InterfaceFetcher for Box<T> {
    fn fetch(&self) -> Result<Interfaces, FetchError> {
        (**self).fetch()
    }
}
