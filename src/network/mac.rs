//! Hardware (MAC) address type and its text form.

use std::fmt::{self, Write};
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::address::AddressError;

/// Default separator between hex pairs.
pub const DEFAULT_SEPARATOR: char = ':';

/// A 6-byte hardware address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Wraps raw bytes.
    #[must_use]
    pub const fn new(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }

    /// True if any byte is non-zero.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.0.iter().any(|&b| b != 0)
    }

    /// Renders hex pairs joined by `separator` (`None` for the compact form).
    #[must_use]
    pub fn to_string_with(&self, upper_case: bool, separator: Option<char>) -> String {
        let mut text = String::with_capacity(17);
        for (index, byte) in self.0.iter().enumerate() {
            if index > 0 {
                if let Some(separator) = separator {
                    text.push(separator);
                }
            }
            // Writing to a String cannot fail.
            let _ = if upper_case {
                write!(text, "{byte:02X}")
            } else {
                write!(text, "{byte:02x}")
            };
        }
        text
    }

    /// Parses hex pairs joined by `separator` (`None` for twelve bare hex digits).
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::Parse`] for a wrong pair count, pair length or
    /// non-hex character.
    pub fn parse_with(text: &str, separator: Option<char>) -> Result<Self, AddressError> {
        let pairs: Vec<&str> = match separator {
            Some(separator) => text.split(separator).collect(),
            None if text.len() == 12 && text.is_ascii() => {
                (0..6).map(|index| &text[index * 2..index * 2 + 2]).collect()
            }
            None => return Err(AddressError::parse(text, "expected 12 hex digits")),
        };
        if pairs.len() != 6 {
            return Err(AddressError::parse(text, "expected 6 hex pairs"));
        }

        let mut bytes = [0u8; 6];
        for (byte, pair) in bytes.iter_mut().zip(pairs) {
            if pair.len() != 2 || !pair.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(AddressError::parse(text, "invalid hex pair"));
            }
            *byte = u8::from_str_radix(pair, 16)
                .map_err(|_| AddressError::parse(text, "invalid hex pair"))?;
        }
        Ok(Self(bytes))
    }
}

impl From<[u8; 6]> for MacAddress {
    fn from(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_string_with(true, Some(DEFAULT_SEPARATOR)))
    }
}

impl FromStr for MacAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with(s, Some(DEFAULT_SEPARATOR))
    }
}

impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
