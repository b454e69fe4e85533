//! Ethernet II and ARP header layouts

use crate::template::{HeaderDef, HeaderTemplate, Parser};
use framecraft_core::Result;

/// Ethernet II header
pub fn eth_template() -> Result<HeaderTemplate> {
    HeaderDef::new("eth")
        .help("Ethernet II")
        .field("dmac", 48, "Destination MAC address, e.g. ff:ff:ff:ff:ff:ff")
        .field("smac", 48, "Source MAC address")
        .field("et", 16, "EtherType, e.g. 0x800 for IPv4")
        .parse_with(Parser::Fields)
        .define_offsets()
}

/// ARP for Ethernet and IPv4 (RFC 826)
pub fn arp_template() -> Result<HeaderTemplate> {
    let mut t = HeaderDef::new("arp")
        .help("Address Resolution Protocol")
        .field("htype", 16, "Hardware type, 1 for Ethernet")
        .field("ptype", 16, "Protocol type, 0x800 for IPv4")
        .field("hlen", 8, "Hardware address length")
        .field("plen", 8, "Protocol address length")
        .field("oper", 16, "Operation, 1 for request, 2 for reply")
        .field("sha", 48, "Sender hardware address")
        .field("spa", 32, "Sender protocol address")
        .field("tha", 48, "Target hardware address")
        .field("tpa", 32, "Target protocol address")
        .parse_with(Parser::Fields)
        .define_offsets()?;

    t.set_default("htype", "1")?;
    t.set_default("ptype", "0x800")?;
    t.set_default("hlen", "6")?;
    t.set_default("plen", "4")?;
    Ok(t)
}
