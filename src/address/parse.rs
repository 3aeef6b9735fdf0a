//! Text parsing for IPv4 and IPv6 addresses.

use super::AddressError;
use super::ip::Value;

const V6_GROUPS: usize = 8;

/// Parses either family. Text containing `:` is treated as IPv6.
pub(crate) fn parse_address(text: &str) -> Result<Value, AddressError> {
    if text.contains(':') {
        parse_v6(text).map(Value::V6)
    } else {
        parse_v4(text).map(Value::V4)
    }
}

/// Parses dotted IPv4 text.
///
/// Exactly four tokens are required. Each token may be decimal, `0x`/`0X`
/// hexadecimal or `0b` binary, and may be surrounded by whitespace.
pub(crate) fn parse_v4(text: &str) -> Result<[u8; 4], AddressError> {
    let mut octets = [0u8; 4];
    let mut count = 0;

    for token in text.split('.') {
        if count == octets.len() {
            return Err(AddressError::parse(text, "expected 4 dot-separated tokens"));
        }
        octets[count] = parse_octet(token)
            .ok_or_else(|| AddressError::parse(text, "invalid IPv4 token"))?;
        count += 1;
    }

    if count != octets.len() {
        return Err(AddressError::parse(text, "expected 4 dot-separated tokens"));
    }
    Ok(octets)
}

fn parse_octet(token: &str) -> Option<u8> {
    let token = token.trim();
    let (digits, radix) = if let Some(hex) = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
    {
        (hex, 16)
    } else if let Some(binary) = token.strip_prefix("0b") {
        (binary, 2)
    } else {
        (token, 10)
    };

    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u8::from_str_radix(digits, radix).ok()
}

fn parse_group(token: &str) -> Option<u16> {
    if token.is_empty() || token.len() > 4 || !token.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(token, 16).ok()
}

/// Parses colon-separated IPv6 text, with at most one `::` elision and an
/// optional trailing embedded IPv4 literal.
pub(crate) fn parse_v6(text: &str) -> Result<[u16; 8], AddressError> {
    let error = |reason| AddressError::parse(text, reason);
    let mut tokens: Vec<&str> = text.split(':').collect();
    if tokens.len() < 3 {
        return Err(error("too few groups"));
    }

    // A leading or trailing "::" yields two empty tokens; keep one.
    if tokens.len() >= 2 && tokens[0].is_empty() {
        if !tokens[1].is_empty() {
            return Err(error("address starts with a single ':'"));
        }
        tokens.remove(0);
    }
    let count = tokens.len();
    if count >= 2 && tokens[count - 1].is_empty() {
        if !tokens[count - 2].is_empty() {
            return Err(error("address ends with a single ':'"));
        }
        tokens.pop();
    }

    let last = tokens.len() - 1;
    let mut explicit: Vec<u16> = Vec::with_capacity(V6_GROUPS);
    let mut elision: Option<usize> = None;

    for (index, token) in tokens.iter().enumerate() {
        if token.is_empty() {
            if elision.is_some() {
                return Err(error("'::' elision is not contiguous"));
            }
            elision = Some(explicit.len());
        } else if token.contains('.') {
            if index != last {
                return Err(error("embedded IPv4 must be the last token"));
            }
            let [a, b, c, d] = parse_v4(token).map_err(|_| error("invalid embedded IPv4"))?;
            explicit.push(u16::from_be_bytes([a, b]));
            explicit.push(u16::from_be_bytes([c, d]));
        } else {
            explicit.push(parse_group(token).ok_or_else(|| error("invalid hex group"))?);
        }

        if explicit.len() > V6_GROUPS {
            return Err(error("too many groups"));
        }
    }

    let mut groups = [0u16; V6_GROUPS];
    match elision {
        None if explicit.len() == V6_GROUPS => groups.copy_from_slice(&explicit),
        None => return Err(error("expected 8 groups")),
        Some(_) if explicit.len() == V6_GROUPS => {
            return Err(error("'::' must stand for at least one group"));
        }
        Some(at) => {
            let tail = explicit.len() - at;
            groups[..at].copy_from_slice(&explicit[..at]);
            groups[V6_GROUPS - tail..].copy_from_slice(&explicit[at..]);
        }
    }
    Ok(groups)
}
