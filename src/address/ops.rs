//! Wrapping arithmetic and bitwise combination of addresses.
//!
//! IPv4 values operate on the packed 32-bit word and IPv6 values on the
//! 128-bit value formed by both packed halves. Both wrap at their width.

use super::AddressError;
use super::ip::{IpAddress, PackedV6, Value, pack_v4, pack_v6};

#[derive(Debug, Clone, Copy)]
enum BitOp {
    And,
    Or,
}

impl BitOp {
    const fn name(self) -> &'static str {
        match self {
            Self::And => "bitwise and",
            Self::Or => "bitwise or",
        }
    }

    const fn apply_u32(self, lhs: u32, rhs: u32) -> u32 {
        match self {
            Self::And => lhs & rhs,
            Self::Or => lhs | rhs,
        }
    }

    const fn apply_u128(self, lhs: u128, rhs: u128) -> u128 {
        match self {
            Self::And => lhs & rhs,
            Self::Or => lhs | rhs,
        }
    }
}

impl IpAddress {
    /// Returns the address `value` steps after this one, wrapping at the top.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::TypeMismatch`] for the `None` address.
    pub fn wrapping_add(&self, value: u32) -> Result<Self, AddressError> {
        match self.value() {
            Value::None => Err(AddressError::mismatch("addition")),
            Value::V4(octets) => Ok(Self::from_packed_v4(pack_v4(octets).wrapping_add(value))),
            Value::V6(groups) => {
                let sum = pack_v6(groups).to_u128().wrapping_add(u128::from(value));
                Ok(Self::from_packed_v6(PackedV6::from_u128(sum)))
            }
        }
    }

    /// Returns the address `value` steps before this one, wrapping at zero.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::TypeMismatch`] for the `None` address.
    pub fn wrapping_sub(&self, value: u32) -> Result<Self, AddressError> {
        match self.value() {
            Value::None => Err(AddressError::mismatch("subtraction")),
            Value::V4(octets) => Ok(Self::from_packed_v4(pack_v4(octets).wrapping_sub(value))),
            Value::V6(groups) => {
                let difference = pack_v6(groups).to_u128().wrapping_sub(u128::from(value));
                Ok(Self::from_packed_v6(PackedV6::from_u128(difference)))
            }
        }
    }

    /// Advances this address by one.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::TypeMismatch`] for the `None` address.
    pub fn increment(&mut self) -> Result<(), AddressError> {
        *self = self.wrapping_add(1)?;
        Ok(())
    }

    /// Steps this address back by one.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::TypeMismatch`] for the `None` address.
    pub fn decrement(&mut self) -> Result<(), AddressError> {
        *self = self.wrapping_sub(1)?;
        Ok(())
    }

    /// Bitwise AND of two addresses of the same family.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::TypeMismatch`] when the families differ or
    /// either side is `None`.
    pub fn try_bitand(&self, other: &Self) -> Result<Self, AddressError> {
        self.combine(other, BitOp::And)
    }

    /// Bitwise OR of two addresses of the same family.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::TypeMismatch`] when the families differ or
    /// either side is `None`.
    pub fn try_bitor(&self, other: &Self) -> Result<Self, AddressError> {
        self.combine(other, BitOp::Or)
    }

    fn combine(&self, other: &Self, op: BitOp) -> Result<Self, AddressError> {
        match (self.value(), other.value()) {
            (Value::V4(lhs), Value::V4(rhs)) => Ok(Self::from_packed_v4(
                op.apply_u32(pack_v4(lhs), pack_v4(rhs)),
            )),
            (Value::V6(lhs), Value::V6(rhs)) => {
                let bits = op.apply_u128(pack_v6(lhs).to_u128(), pack_v6(rhs).to_u128());
                Ok(Self::from_packed_v6(PackedV6::from_u128(bits)))
            }
            _ => Err(AddressError::mismatch(op.name())),
        }
    }
}
