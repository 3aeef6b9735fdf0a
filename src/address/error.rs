//! Error type for address parsing, arithmetic and derived-address operations.

use thiserror::Error;

/// Error type for [`IpAddress`](super::IpAddress) and
/// [`IpAddressInfo`](super::IpAddressInfo) operations.
///
/// Parsing, arithmetic and netmask checks all surface their failures
/// synchronously through this type. Nothing falls back to a default value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// Malformed address or netmask text, or a netmask that is not a contiguous prefix.
    #[error("Invalid address '{input}': {reason}")]
    Parse {
        /// The offending input, rendered as text.
        input: String,
        /// What rule was violated.
        reason: &'static str,
    },

    /// Operation between a V4 and a V6 value, or involving an address of type None.
    #[error("Type mismatch in {operation}")]
    TypeMismatch {
        /// Name of the attempted operation.
        operation: &'static str,
    },

    /// Operation not available for this address type.
    #[error("{operation} is not supported for IPv6 addresses")]
    Unsupported {
        /// Name of the attempted operation.
        operation: &'static str,
    },
}

impl AddressError {
    pub(crate) fn parse(input: impl Into<String>, reason: &'static str) -> Self {
        Self::Parse {
            input: input.into(),
            reason,
        }
    }

    pub(crate) const fn mismatch(operation: &'static str) -> Self {
        Self::TypeMismatch { operation }
    }

    pub(crate) const fn unsupported(operation: &'static str) -> Self {
        Self::Unsupported { operation }
    }
}
