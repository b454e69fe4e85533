//! Header templates, frames and serialization for framecraft
//!
//! A header is described once as an ordered list of bit-width fields and
//! shared as a [`HeaderTemplate`]. Frames are stacks of header instances that
//! are filled with computed defaults and then serialized bit by bit into a
//! contiguous buffer. The crate includes:
//!
//! - **Ethernet II** and **ARP** headers
//! - **IPv4** and **IPv6** headers, plus the pseudo-headers used by transport
//!   checksums
//! - **UDP** and **TCP** headers whose `len` and `chksum` fill themselves
//!
//! # Architecture
//!
//! - [`template`] - Field layouts and offset computation
//! - [`header`] - Header instances and per-header serialization
//! - [`frame`] - Ordered stacks of headers
//! - [`fill`] - Default-fill dispatch and the transport length/checksum fill
//! - [`codec`] - MSB-first bit-level reads and writes
//! - [`buffer`] - Fixed-size byte buffers
//! - [`checksum`] - Internet checksum (RFC 1071)
//! - [`registry`] - Lookup of templates by name or slot
//! - [`builder`] - Fluent API for frame construction
//!
//! # Quick Start
//!
//! ```rust
//! use framecraft_packet::{FrameBuilder, TemplateRegistry};
//!
//! let registry = TemplateRegistry::with_builtin().unwrap();
//! let mut frame = FrameBuilder::new(&registry)
//!     .header("ipv4")
//!     .field("sip", "10.0.0.1")
//!     .field("dip", "10.0.0.2")
//!     .header("udp")
//!     .field("sport", "1234")
//!     .field("dport", "53")
//!     .payload(vec![0u8; 8])
//!     .build()
//!     .unwrap();
//!
//! frame.fill_defaults().unwrap();
//! let udp = frame.get(1).unwrap();
//! assert_eq!(udp.uint("len"), Some(16));
//! assert!(udp.is_set("chksum"));
//! ```
//!
//! # Defining a header
//!
//! ```rust
//! use std::sync::Arc;
//! use framecraft_packet::template::HeaderDef;
//!
//! let template = HeaderDef::new("vlan")
//!     .field("pcp", 3, "Priority code point")
//!     .field("dei", 1, "Drop eligible indicator")
//!     .field("vid", 12, "VLAN identifier")
//!     .field("et", 16, "EtherType")
//!     .define_offsets()
//!     .unwrap();
//! assert_eq!(template.size(), 4);
//!
//! let mut tag = Arc::new(template).instantiate();
//! tag.set("pcp", "5").unwrap();
//! tag.set("dei", "0").unwrap();
//! tag.set("vid", "100").unwrap();
//! tag.set("et", "0x0800").unwrap();
//! assert_eq!(&tag.to_bytes().unwrap()[..], &[0xa0, 0x64, 0x08, 0x00]);
//! ```

pub mod buffer;
pub mod builder;
pub mod checksum;
pub mod codec;
pub mod ethernet;
pub mod fill;
pub mod frame;
pub mod header;
pub mod ip;
pub mod registry;
pub mod tcp;
pub mod template;
pub mod udp;


// Re-export commonly used types for convenience
pub use buffer::Buffer;
pub use builder::FrameBuilder;
pub use checksum::internet_checksum;
pub use fill::{fill_defaults, FillHandler, Patch, TransportFill};
pub use frame::Frame;
pub use framecraft_core::{Error, Result};
pub use header::{FieldRef, Header};
pub use registry::{TemplateInfo, TemplateRegistry};
pub use template::{Field, HeaderDef, HeaderTemplate, Parser};
