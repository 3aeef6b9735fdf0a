//! The [`IpAddress`] value type.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use serde::{Serialize, Serializer};

use super::AddressError;
use super::format::TextBuffer;
use super::parse::parse_address;

/// Address family of an [`IpAddress`].
///
/// The declaration order is the ordering used when comparing addresses of
/// different families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum AddressKind {
    /// No address has been set.
    None,
    /// IPv4 address.
    V4,
    /// IPv6 address.
    V6,
}

impl fmt::Display for AddressKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::V4 => write!(f, "IPv4"),
            Self::V6 => write!(f, "IPv6"),
        }
    }
}

/// Raw storage for an address value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Value {
    None,
    V4([u8; 4]),
    V6([u16; 8]),
}

/// Packed IPv6 address: the first four groups in `high`, the last four in `low`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PackedV6 {
    /// Groups 0..4, most significant group first.
    pub high: u64,
    /// Groups 4..8, most significant group first.
    pub low: u64,
}

impl PackedV6 {
    /// Creates a packed value from its two halves.
    #[must_use]
    pub const fn new(high: u64, low: u64) -> Self {
        Self { high, low }
    }

    /// Splits a 128-bit value into its halves.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // Truncation selects the half
    pub const fn from_u128(value: u128) -> Self {
        Self {
            high: (value >> 64) as u64,
            low: value as u64,
        }
    }

    /// Joins both halves into one 128-bit value.
    #[must_use]
    pub const fn to_u128(self) -> u128 {
        ((self.high as u128) << 64) | self.low as u128
    }

    /// Builds a mask with `count` leading one bits. Counts above 128 saturate.
    #[must_use]
    pub const fn from_prefix_length(count: u8) -> Self {
        let bits = match count {
            0 => 0,
            1..=127 => u128::MAX << (128 - count as u32),
            _ => u128::MAX,
        };
        Self::from_u128(bits)
    }

    /// Number of bits set across both halves.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)] // At most 128
    pub const fn prefix_length(self) -> u8 {
        (self.high.count_ones() + self.low.count_ones()) as u8
    }
}

/// Packs four octets into a 32-bit word, most significant octet first.
#[must_use]
pub const fn pack_v4(octets: [u8; 4]) -> u32 {
    u32::from_be_bytes(octets)
}

/// Inverse of [`pack_v4`].
#[must_use]
pub const fn unpack_v4(packed: u32) -> [u8; 4] {
    packed.to_be_bytes()
}

/// Packs eight 16-bit groups into two 64-bit words.
#[must_use]
pub fn pack_v6(groups: [u16; 8]) -> PackedV6 {
    let fold = |half: &[u16]| {
        half.iter()
            .fold(0u64, |acc, &group| (acc << 16) | u64::from(group))
    };
    PackedV6::new(fold(&groups[..4]), fold(&groups[4..]))
}

/// Inverse of [`pack_v6`].
#[must_use]
#[allow(clippy::cast_possible_truncation)] // Each shift isolates one group
pub const fn unpack_v6(packed: PackedV6) -> [u16; 8] {
    let mut groups = [0u16; 8];
    let mut index = 0;
    while index < 4 {
        let shift = 48 - 16 * index;
        groups[index] = (packed.high >> shift) as u16;
        groups[index + 4] = (packed.low >> shift) as u16;
        index += 1;
    }
    groups
}

/// An IPv4 or IPv6 address, or the absence of one.
///
/// The canonical text form (RFC 5952 for IPv6) is computed whenever the value
/// changes and stored inline, so [`as_str`](Self::as_str) and `Display`
/// never allocate or reformat.
///
/// # Equality and ordering
///
/// Equality compares values: two `None` addresses are equal, and addresses of
/// different families are never equal. Ordering is only available through
/// [`try_cmp`](Self::try_cmp) because a `None` address has no position.
///
/// # Examples
///
/// ```
/// use netif_watch::address::IpAddress;
///
/// let address: IpAddress = "2001:DB8:0:0:8:800:200C:417A".parse().unwrap();
/// assert_eq!(address.as_str(), "2001:db8::8:800:200c:417a");
/// ```
#[derive(Clone, Copy)]
pub struct IpAddress {
    value: Value,
    text: TextBuffer,
}

impl IpAddress {
    /// Maximum length of the canonical text form.
    pub const MAX_TEXT_LEN: usize = super::format::MAX_TEXT_LEN;

    fn from_value(value: Value) -> Self {
        Self {
            value,
            text: TextBuffer::render(&value),
        }
    }

    /// Creates an IPv4 address from its octets.
    #[must_use]
    pub fn from_v4(octets: [u8; 4]) -> Self {
        Self::from_value(Value::V4(octets))
    }

    /// Creates an IPv6 address from its eight 16-bit groups.
    #[must_use]
    pub fn from_v6(groups: [u16; 8]) -> Self {
        Self::from_value(Value::V6(groups))
    }

    /// Creates an IPv4 address from its packed form.
    #[must_use]
    pub fn from_packed_v4(packed: u32) -> Self {
        Self::from_v4(unpack_v4(packed))
    }

    /// Creates an IPv6 address from its packed form.
    #[must_use]
    pub fn from_packed_v6(packed: PackedV6) -> Self {
        Self::from_v6(unpack_v6(packed))
    }

    /// Embeds an IPv4 address as an IPv4-compatible IPv6 address (`::a.b.c.d`).
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::TypeMismatch`] if `v4` is not an IPv4 address.
    pub fn ipv4_compatible(v4: &Self) -> Result<Self, AddressError> {
        let [a, b, c, d] = v4.v4()?;
        Ok(Self::from_v6([
            0,
            0,
            0,
            0,
            0,
            0,
            u16::from_be_bytes([a, b]),
            u16::from_be_bytes([c, d]),
        ]))
    }

    /// Embeds an IPv4 address as an IPv4-mapped IPv6 address (`::ffff:a.b.c.d`).
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::TypeMismatch`] if `v4` is not an IPv4 address.
    pub fn ipv4_mapped(v4: &Self) -> Result<Self, AddressError> {
        let [a, b, c, d] = v4.v4()?;
        Ok(Self::from_v6([
            0,
            0,
            0,
            0,
            0,
            0xffff,
            u16::from_be_bytes([a, b]),
            u16::from_be_bytes([c, d]),
        ]))
    }

    /// Parses an address from text.
    ///
    /// Text containing `:` is parsed as IPv6, anything else as IPv4.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::Parse`] carrying the input on any grammar violation.
    pub fn parse(text: &str) -> Result<Self, AddressError> {
        parse_address(text).map(Self::from_value)
    }

    pub(crate) const fn value(&self) -> Value {
        self.value
    }

    /// Returns the address family.
    #[must_use]
    pub const fn kind(&self) -> AddressKind {
        match self.value {
            Value::None => AddressKind::None,
            Value::V4(_) => AddressKind::V4,
            Value::V6(_) => AddressKind::V6,
        }
    }

    /// Returns true unless this is the `None` address.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        !matches!(self.value, Value::None)
    }

    /// Returns the cached canonical text form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// Returns the IPv4 octets.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::TypeMismatch`] for non-IPv4 addresses.
    pub const fn v4(&self) -> Result<[u8; 4], AddressError> {
        match self.value {
            Value::V4(octets) => Ok(octets),
            _ => Err(AddressError::mismatch("IPv4 access")),
        }
    }

    /// Returns the IPv6 groups.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::TypeMismatch`] for non-IPv6 addresses.
    pub const fn v6(&self) -> Result<[u16; 8], AddressError> {
        match self.value {
            Value::V6(groups) => Ok(groups),
            _ => Err(AddressError::mismatch("IPv6 access")),
        }
    }

    /// Returns the packed IPv4 value.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::TypeMismatch`] for non-IPv4 addresses.
    pub fn packed_v4(&self) -> Result<u32, AddressError> {
        self.v4().map(pack_v4)
    }

    /// Returns the packed IPv6 value.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::TypeMismatch`] for non-IPv6 addresses.
    pub fn packed_v6(&self) -> Result<PackedV6, AddressError> {
        self.v6().map(pack_v6)
    }

    /// Replaces the value with an IPv4 address.
    pub fn set_v4(&mut self, octets: [u8; 4]) {
        *self = Self::from_v4(octets);
    }

    /// Replaces the value with an IPv6 address.
    pub fn set_v6(&mut self, groups: [u16; 8]) {
        *self = Self::from_v6(groups);
    }

    /// Replaces the value with a packed IPv4 address.
    pub fn set_packed_v4(&mut self, packed: u32) {
        *self = Self::from_packed_v4(packed);
    }

    /// Replaces the value with a packed IPv6 address.
    pub fn set_packed_v6(&mut self, packed: PackedV6) {
        *self = Self::from_packed_v6(packed);
    }

    /// True for IPv6 addresses whose top 96 bits are zero.
    #[must_use]
    pub fn is_ipv4_compatible(&self) -> bool {
        matches!(self.value, Value::V6(groups) if groups[..6].iter().all(|&g| g == 0))
    }

    /// True for IPv6 addresses of the form `::ffff:a.b.c.d`.
    #[must_use]
    pub fn is_ipv4_mapped(&self) -> bool {
        matches!(
            self.value,
            Value::V6(groups) if groups[..5].iter().all(|&g| g == 0) && groups[5] == 0xffff
        )
    }

    /// Extracts the IPv4 address embedded in an IPv4-compatible address.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::TypeMismatch`] for non-IPv6 addresses and
    /// [`AddressError::Parse`] when the compatible pattern does not match.
    pub fn embedded_ipv4_compatible(&self) -> Result<Self, AddressError> {
        let groups = self.v6()?;
        if !self.is_ipv4_compatible() {
            return Err(AddressError::parse(
                self.as_str(),
                "not an IPv4-compatible address",
            ));
        }
        Ok(Self::from_v4(embedded_octets(groups)))
    }

    /// Extracts the IPv4 address embedded in an IPv4-mapped address.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::TypeMismatch`] for non-IPv6 addresses and
    /// [`AddressError::Parse`] when the mapped pattern does not match.
    pub fn embedded_ipv4_mapped(&self) -> Result<Self, AddressError> {
        let groups = self.v6()?;
        if !self.is_ipv4_mapped() {
            return Err(AddressError::parse(
                self.as_str(),
                "not an IPv4-mapped address",
            ));
        }
        Ok(Self::from_v4(embedded_octets(groups)))
    }

    /// Compares two addresses: family first (`None < V4 < V6`), numeric
    /// value second.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::TypeMismatch`] if both addresses are `None`.
    pub fn try_cmp(&self, other: &Self) -> Result<Ordering, AddressError> {
        match (self.value, other.value) {
            (Value::None, Value::None) => Err(AddressError::mismatch("comparison")),
            (Value::V4(lhs), Value::V4(rhs)) => Ok(lhs.cmp(&rhs)),
            (Value::V6(lhs), Value::V6(rhs)) => Ok(lhs.cmp(&rhs)),
            _ => Ok(self.kind().cmp(&other.kind())),
        }
    }

    /// Converts to the standard library address type.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::TypeMismatch`] for the `None` address.
    pub fn to_ip_addr(&self) -> Result<IpAddr, AddressError> {
        match self.value {
            Value::None => Err(AddressError::mismatch("conversion")),
            Value::V4(octets) => Ok(IpAddr::V4(Ipv4Addr::from(octets))),
            Value::V6(groups) => Ok(IpAddr::V6(Ipv6Addr::from(groups))),
        }
    }
}

/// Low 32 bits of an IPv6 address as IPv4 octets.
const fn embedded_octets(groups: [u16; 8]) -> [u8; 4] {
    let [a, b] = groups[6].to_be_bytes();
    let [c, d] = groups[7].to_be_bytes();
    [a, b, c, d]
}

impl Default for IpAddress {
    fn default() -> Self {
        Self::from_value(Value::None)
    }
}

impl PartialEq for IpAddress {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for IpAddress {}

impl Hash for IpAddress {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl fmt::Debug for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IpAddress").field(&self.as_str()).finish()
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IpAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for IpAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl From<[u8; 4]> for IpAddress {
    fn from(octets: [u8; 4]) -> Self {
        Self::from_v4(octets)
    }
}

impl From<[u16; 8]> for IpAddress {
    fn from(groups: [u16; 8]) -> Self {
        Self::from_v6(groups)
    }
}

impl From<Ipv4Addr> for IpAddress {
    fn from(address: Ipv4Addr) -> Self {
        Self::from_v4(address.octets())
    }
}

impl From<Ipv6Addr> for IpAddress {
    fn from(address: Ipv6Addr) -> Self {
        Self::from_v6(address.segments())
    }
}

impl From<IpAddr> for IpAddress {
    fn from(address: IpAddr) -> Self {
        match address {
            IpAddr::V4(v4) => v4.into(),
            IpAddr::V6(v6) => v6.into(),
        }
    }
}

#[cfg(test)]
#[path = "ip_tests.rs"]
mod tests;
