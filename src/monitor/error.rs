//! Error types for the monitor layer.

use thiserror::Error;

/// Error type for monitor queries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonitorError {
    /// No interface with this id is in the current snapshot.
    #[error("Interface not found: {name}")]
    NotFound {
        /// The id that was looked up.
        name: String,
    },
}
