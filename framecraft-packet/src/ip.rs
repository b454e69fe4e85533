//! IPv4 and IPv6 header layouts
//!
//! Besides the wire headers this module declares the pseudo-headers used by
//! transport checksums. Pseudo-headers only ever exist inside a checksum
//! computation and are never registered or put on the wire.

use crate::template::{HeaderDef, HeaderTemplate, Parser};
use framecraft_core::Result;

/// IPv4 header (RFC 791), without options
///
/// `len`, `proto` and `chksum` have no fill handler and must be set by the
/// caller. The remaining fields default to 0 or their usual values.
pub fn ipv4_template() -> Result<HeaderTemplate> {
    let mut t = HeaderDef::new("ipv4")
        .help("Internet Protocol version 4 (len, proto and chksum are not computed)")
        .field("ver", 4, "Version, 4 for IPv4")
        .field("ihl", 4, "Internet header length in 32-bit words")
        .field("dscp", 6, "Differentiated services code point")
        .field("ecn", 2, "Explicit congestion notification")
        .field("len", 16, "Total length of header and data")
        .field("id", 16, "Identification")
        .field("flags", 3, "Flags: reserved, don't fragment, more fragments")
        .field("offset", 13, "Fragment offset in 8-byte units")
        .field("ttl", 8, "Time to live")
        .field("proto", 8, "Protocol of the payload, e.g. 17 for UDP")
        .field("chksum", 16, "Header checksum")
        .field("sip", 32, "Source IP address")
        .field("dip", 32, "Destination IP address")
        .parse_with(Parser::Fields)
        .define_offsets()?;

    t.set_default("ver", "4")?;
    t.set_default("ihl", "5")?;
    for field in ["dscp", "ecn", "id", "flags", "offset"] {
        t.set_default(field, "0")?;
    }
    t.set_default("ttl", "64")?;
    Ok(t)
}

/// IPv6 fixed header (RFC 8200)
///
/// `len` and `next` must be set by the caller.
pub fn ipv6_template() -> Result<HeaderTemplate> {
    let mut t = HeaderDef::new("ipv6")
        .help("Internet Protocol version 6 (len and next are not computed)")
        .field("ver", 4, "Version, 6 for IPv6")
        .field("tclass", 8, "Traffic class")
        .field("flow", 20, "Flow label")
        .field("len", 16, "Payload length")
        .field("next", 8, "Next header, e.g. 17 for UDP")
        .field("hlim", 8, "Hop limit")
        .field("sip", 128, "Source IP address")
        .field("dip", 128, "Destination IP address")
        .parse_with(Parser::Fields)
        .define_offsets()?;

    t.set_default("ver", "6")?;
    t.set_default("tclass", "0")?;
    t.set_default("flow", "0")?;
    t.set_default("hlim", "64")?;
    Ok(t)
}

/// IPv4 pseudo-header covered by UDP and TCP checksums
pub fn ipv4_pseudo_template() -> Result<HeaderTemplate> {
    let mut t = HeaderDef::new("ipv4-pseudo")
        .field("sip", 32, "")
        .field("dip", 32, "")
        .field("zero", 8, "")
        .field("proto", 8, "")
        .field("len", 16, "")
        .define_offsets()?;
    t.set_default("zero", "0")?;
    Ok(t)
}

/// IPv6 pseudo-header covered by UDP and TCP checksums
pub fn ipv6_pseudo_template() -> Result<HeaderTemplate> {
    let mut t = HeaderDef::new("ipv6-pseudo")
        .field("sip", 128, "")
        .field("dip", 128, "")
        .field("len", 32, "")
        .field("zero", 24, "")
        .field("proto", 8, "")
        .define_offsets()?;
    t.set_default("zero", "0")?;
    Ok(t)
}
