//! TCP header layout

use crate::fill::FillHandler;
use crate::template::{HeaderDef, HeaderTemplate, Parser};
use framecraft_core::{ip_protocols, Result};

/// TCP header (RFC 793), without options
///
/// `doff` defaults to 5, the 20-byte minimum header. `chksum` is filled from
/// the frame when left unset.
pub fn tcp_template(fill: FillHandler) -> Result<HeaderTemplate> {
    let mut t = HeaderDef::new("tcp")
        .help("Transmission Control Protocol")
        .proto(ip_protocols::TCP)
        .field("sport", 16, "Source Port Number, e.g. 22 for SSH")
        .field("dport", 16, "Destination Port Number, e.g. 22 for SSH")
        .field("seqn", 32, "Sequence number")
        .field("ackn", 32, "Acknowledgement number")
        .field("doff", 4, "Data offset, size of TCP header in 32-bit words")
        .field("resv", 6, "Reserved, must be zero")
        .field("urg", 1, "Urgent Pointer field significant")
        .field("ack", 1, "Acknowledgment field significant")
        .field("psh", 1, "Push Function")
        .field("rst", 1, "Reset the connection")
        .field("syn", 1, "Synchronize sequence numbers")
        .field("fin", 1, "No more data from sender")
        .field("win", 16, "Window")
        .field("chksum", 16, "Checksum")
        .field("urgp", 16, "Urgent Pointer")
        .fill_with(fill)
        .parse_with(Parser::Fields)
        .define_offsets()?;

    t.set_default("doff", "5")?;
    Ok(t)
}
