//! UDP header layout

use crate::fill::FillHandler;
use crate::template::{HeaderDef, HeaderTemplate, Parser};
use framecraft_core::{ip_protocols, Result};

/// UDP header (RFC 768)
///
/// `len` and `chksum` are filled from the frame when left unset.
pub fn udp_template(fill: FillHandler) -> Result<HeaderTemplate> {
    HeaderDef::new("udp")
        .help("User Datagram Protocol")
        .proto(ip_protocols::UDP)
        .field("sport", 16, "Source Port Number, e.g. 22 for SSH")
        .field("dport", 16, "Destination Port Number, e.g. 22 for SSH")
        .field("len", 16, "Length of UDP header and data")
        .field("chksum", 16, "Checksum")
        .fill_with(fill)
        .parse_with(Parser::Fields)
        .define_offsets()
}
