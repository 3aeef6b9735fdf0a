//! Canonical text rendering.
//!
//! IPv4 is plain dotted decimal. IPv6 follows RFC 5952: lowercase hex,
//! no leading zeros, the first longest run of two or more zero groups
//! collapsed to `::`, and dotted-decimal tails for IPv4-compatible and
//! IPv4-mapped addresses.

use std::fmt::{self, Write};

use super::ip::Value;

/// Capacity of the inline text cache.
pub const MAX_TEXT_LEN: usize = 40;

/// Text rendered for the `None` address.
const NONE_TEXT: &str = "Invalid IP";

/// Fixed-capacity buffer holding the canonical text of an address.
#[derive(Clone, Copy)]
pub(crate) struct TextBuffer {
    bytes: [u8; MAX_TEXT_LEN],
    len: u8,
}

impl TextBuffer {
    const fn new() -> Self {
        Self {
            bytes: [0; MAX_TEXT_LEN],
            len: 0,
        }
    }

    /// Renders `value` into a fresh buffer.
    ///
    /// # Panics
    ///
    /// Panics if the rendering exceeds [`MAX_TEXT_LEN`]. No valid value can
    /// reach that length, so an overflow is a broken invariant rather than
    /// bad input.
    pub(crate) fn render(value: &Value) -> Self {
        let mut buffer = Self::new();
        let result = match value {
            Value::None => buffer.write_str(NONE_TEXT),
            Value::V4(octets) => write_v4(&mut buffer, *octets),
            Value::V6(groups) => write_v6(&mut buffer, groups),
        };
        assert!(
            result.is_ok(),
            "canonical address text exceeds {MAX_TEXT_LEN} bytes"
        );
        buffer
    }

    pub(crate) fn as_str(&self) -> &str {
        // Only ASCII is ever written.
        std::str::from_utf8(&self.bytes[..usize::from(self.len)]).unwrap_or_default()
    }
}

impl Write for TextBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let start = usize::from(self.len);
        let end = start + s.len();
        if end > MAX_TEXT_LEN {
            return Err(fmt::Error);
        }
        self.bytes[start..end].copy_from_slice(s.as_bytes());
        self.len = u8::try_from(end).map_err(|_| fmt::Error)?;
        Ok(())
    }
}

fn write_v4(out: &mut impl Write, octets: [u8; 4]) -> fmt::Result {
    let [a, b, c, d] = octets;
    write!(out, "{a}.{b}.{c}.{d}")
}

fn write_v6(out: &mut impl Write, groups: &[u16; 8]) -> fmt::Result {
    const LOOPBACK: [u16; 8] = [0, 0, 0, 0, 0, 0, 0, 1];

    if groups.iter().all(|&g| g == 0) {
        return out.write_str("::");
    }
    if *groups == LOOPBACK {
        return out.write_str("::1");
    }

    let [a, b] = groups[6].to_be_bytes();
    let [c, d] = groups[7].to_be_bytes();
    if groups[..6].iter().all(|&g| g == 0) {
        out.write_str("::")?;
        return write_v4(out, [a, b, c, d]);
    }
    if groups[..5].iter().all(|&g| g == 0) && groups[5] == 0xffff {
        out.write_str("::ffff:")?;
        return write_v4(out, [a, b, c, d]);
    }

    match longest_zero_run(groups) {
        Some((start, len)) => {
            write_groups(out, &groups[..start])?;
            out.write_str("::")?;
            write_groups(out, &groups[start + len..])
        }
        None => write_groups(out, groups),
    }
}

fn write_groups(out: &mut impl Write, groups: &[u16]) -> fmt::Result {
    for (index, group) in groups.iter().enumerate() {
        if index > 0 {
            out.write_char(':')?;
        }
        write!(out, "{group:x}")?;
    }
    Ok(())
}

/// Finds the first longest run of at least two zero groups.
fn longest_zero_run(groups: &[u16; 8]) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    let mut index = 0;
    while index < groups.len() {
        if groups[index] != 0 {
            index += 1;
            continue;
        }
        let start = index;
        while index < groups.len() && groups[index] == 0 {
            index += 1;
        }
        let len = index - start;
        if len >= 2 && best.is_none_or(|(_, best_len)| len > best_len) {
            best = Some((start, len));
        }
    }
    best
}
