//! Field value encoding
//!
//! Field values travel as fixed-width big-endian byte strings. A field of
//! `bit_width` bits stores `ceil(bit_width / 8)` bytes and its value lives in
//! the low-order `bit_width` bits. This module converts text and integers into
//! that representation.

use crate::{Error, MacAddr, Result};
use bytes::Bytes;
use std::net::{Ipv4Addr, Ipv6Addr};

/// Number of bytes needed to store a field of `bit_width` bits.
pub const fn byte_width(bit_width: usize) -> usize {
    (bit_width + 7) / 8
}

/// Converts a decimal numeral to exactly `byte_width` big-endian bytes.
///
/// Values wider than `byte_width` bytes keep their low-order bytes
/// (the result is the value modulo 2^(8 * byte_width)).
///
/// # Examples
///
/// ```
/// use framecraft_core::value::parse_bytes;
///
/// assert_eq!(&parse_bytes("1234", 2).unwrap()[..], &[0x04, 0xd2]);
/// assert_eq!(&parse_bytes("65537", 2).unwrap()[..], &[0x00, 0x01]);
/// ```
pub fn parse_bytes(text: &str, byte_width: usize) -> Result<Bytes> {
    if text.is_empty() {
        return Err(Error::invalid_value("", text, "empty numeral"));
    }

    let mut out = vec![0u8; byte_width];
    for c in text.chars() {
        let digit = c
            .to_digit(10)
            .ok_or_else(|| Error::invalid_value("", text, "not a decimal numeral"))?;

        // out = out * 10 + digit, carries past the top byte are dropped
        let mut carry = digit;
        for byte in out.iter_mut().rev() {
            let v = (*byte as u32) * 10 + carry;
            *byte = v as u8;
            carry = v >> 8;
        }
    }

    Ok(Bytes::from(out))
}

/// Encodes an integer into `byte_width` big-endian bytes, truncating to the
/// low-order bytes when the value does not fit.
pub fn encode_uint(value: u64, byte_width: usize) -> Bytes {
    let be = value.to_be_bytes();
    let mut out = vec![0u8; byte_width];
    let n = byte_width.min(be.len());
    out[byte_width - n..].copy_from_slice(&be[be.len() - n..]);
    Bytes::from(out)
}

/// Reads up to the last eight bytes of a big-endian value as an integer.
pub fn decode_uint(data: &[u8]) -> u64 {
    let start = data.len().saturating_sub(8);
    data[start..]
        .iter()
        .fold(0u64, |acc, &b| (acc << 8) | b as u64)
}

/// Clears the bits above `bit_width` in a right-aligned big-endian value.
pub fn mask_to_width(data: &mut [u8], bit_width: usize) {
    let total_bits = data.len() * 8;
    if bit_width >= total_bits {
        return;
    }

    let excess = total_bits - bit_width;
    for (i, byte) in data.iter_mut().enumerate() {
        let byte_start = i * 8;
        if byte_start + 8 <= excess {
            *byte = 0;
        } else if byte_start < excess {
            *byte &= 0xff >> (excess - byte_start);
        } else {
            break;
        }
    }
}

/// Parses the text form of a field value for a field of `bit_width` bits.
///
/// Accepted notations:
/// - decimal numerals of any length
/// - `0x` prefixed hex
/// - dotted IPv4 addresses for 4-byte fields
/// - IPv6 addresses for 16-byte fields
/// - colon-separated MAC addresses for 6-byte fields
///
/// Numeric values are truncated to the field width.
pub fn parse_value(field: &str, text: &str, bit_width: usize) -> Result<Bytes> {
    let width = byte_width(bit_width);

    let mut bytes = if let Some(digits) = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        parse_hex(field, text, digits, width)?
    } else if width == 16 && text.contains(':') {
        text.parse::<Ipv6Addr>()
            .map_err(|_| Error::invalid_value(field, text, "invalid IPv6 address"))?
            .octets()
            .to_vec()
    } else if text.contains('.') {
        let addr: Ipv4Addr = text
            .parse()
            .map_err(|_| Error::invalid_value(field, text, "invalid IPv4 address"))?;
        expect_width(field, text, width, 4)?;
        addr.octets().to_vec()
    } else if text.contains(':') {
        match width {
            6 => text
                .parse::<MacAddr>()
                .map_err(|_| Error::invalid_value(field, text, "invalid MAC address"))?
                .octets()
                .to_vec(),
            _ => {
                return Err(Error::invalid_value(
                    field,
                    text,
                    format!("address notation does not fit a {}-bit field", bit_width),
                ))
            }
        }
    } else {
        parse_bytes(text, width)
            .map_err(|_| Error::invalid_value(field, text, "not a decimal numeral"))?
            .to_vec()
    };

    mask_to_width(&mut bytes, bit_width);
    Ok(Bytes::from(bytes))
}

fn parse_hex(field: &str, text: &str, digits: &str, width: usize) -> Result<Vec<u8>> {
    if digits.is_empty() {
        return Err(Error::invalid_value(field, text, "empty hex literal"));
    }

    let padded = if digits.len() % 2 == 1 {
        format!("0{}", digits)
    } else {
        digits.to_string()
    };
    let raw = hex::decode(padded).map_err(|e| Error::invalid_value(field, text, e.to_string()))?;

    let mut out = vec![0u8; width];
    let n = raw.len().min(width);
    out[width - n..].copy_from_slice(&raw[raw.len() - n..]);
    Ok(out)
}

fn expect_width(field: &str, text: &str, width: usize, needed: usize) -> Result<()> {
    if width != needed {
        return Err(Error::invalid_value(
            field,
            text,
            format!("needs a {}-byte field, field has {} bytes", needed, width),
        ));
    }
    Ok(())
}
