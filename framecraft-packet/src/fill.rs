//! Default-value resolution
//!
//! Before a frame is serialized, every header gets a chance to compute its
//! unset fields from the rest of the stack. Handlers only read the frame:
//! they return a [`Patch`] that the dispatcher applies to their own header,
//! so a handler can never modify a neighbour.

use crate::buffer::Buffer;
use crate::frame::Frame;
use crate::header::{Header, Unset};
use crate::ip::{ipv4_pseudo_template, ipv6_pseudo_template};
use crate::template::HeaderTemplate;
use bytes::Bytes;
use framecraft_core::{encode_uint, Error, Result};
use std::sync::Arc;
use tracing::{debug, warn};

/// Field assignments produced by a fill handler
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    assignments: Vec<(String, Bytes)>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set<S: Into<String>>(&mut self, field: S, value: Bytes) {
        self.assignments.push((field.into(), value));
    }

    pub fn get(&self, field: &str) -> Option<&Bytes> {
        self.assignments
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Write every assignment into `header`
    pub fn apply_to(self, header: &mut Header) -> Result<()> {
        for (field, value) in self.assignments {
            header.set_bytes(&field, value)?;
        }
        Ok(())
    }
}

/// Default-fill capability attached to a header template
#[derive(Debug, Clone)]
pub enum FillHandler {
    /// UDP/TCP length and pseudo-header checksum
    Transport(TransportFill),
}

impl FillHandler {
    /// Compute the assignments for the header at `index`
    pub fn compute(&self, frame: &Frame, index: usize) -> Result<Patch> {
        match self {
            FillHandler::Transport(t) => t.compute(frame, index),
        }
    }
}

/// Run the fill handler of every header, innermost first.
///
/// An outer transport checksum covers the headers it carries, so inner
/// checksums must already be in place when it is computed. A failing handler
/// does not stop the walk: the remaining headers are still filled and the
/// first error is returned at the end.
pub fn fill_defaults(frame: &mut Frame) -> Result<()> {
    let mut first_error = None;

    for index in (0..frame.len()).rev() {
        let Some(header) = frame.get(index) else {
            continue;
        };
        let Some(handler) = header.template().fill_handler().cloned() else {
            continue;
        };

        let name = header.name().to_string();
        let result = handler.compute(frame, index).and_then(|patch| {
            debug!(header = %name, index, assignments = patch.len(), "Applying default fill");
            match frame.get_mut(index) {
                Some(h) => patch.apply_to(h),
                None => Ok(()),
            }
        });

        if let Err(e) = result {
            warn!(header = %name, index, error = %e, "Default fill failed");
            first_error.get_or_insert(e);
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Length and checksum fill shared by UDP and TCP.
///
/// Owns the pseudo-header templates it builds checksums with.
#[derive(Debug, Clone)]
pub struct TransportFill {
    ipv4_pseudo: Arc<HeaderTemplate>,
    ipv6_pseudo: Arc<HeaderTemplate>,
}

impl TransportFill {
    pub fn new() -> Result<Self> {
        Ok(TransportFill {
            ipv4_pseudo: Arc::new(ipv4_pseudo_template()?),
            ipv6_pseudo: Arc::new(ipv6_pseudo_template()?),
        })
    }

    /// Pseudo-header template for an encapsulating network header
    pub fn pseudo_template(&self, network: &str) -> Option<&Arc<HeaderTemplate>> {
        match network {
            "ipv4" => Some(&self.ipv4_pseudo),
            "ipv6" => Some(&self.ipv6_pseudo),
            _ => None,
        }
    }

    /// Compute `len` (when the header has one) and `chksum` for the header
    /// at `index`. Fields that are already set are left alone.
    pub fn compute(&self, frame: &Frame, index: usize) -> Result<Patch> {
        let mut patch = Patch::new();
        let header = frame
            .get(index)
            .ok_or_else(|| Error::NotFound(format!("header at index {}", index)))?;

        // Header plus everything it carries
        let udp_len = frame.remaining_size(index);

        // Only UDP has a length field
        let mut this = header.clone();
        if let Some(len) = header.find_field("len") {
            if len.value.is_none() {
                let value = encode_uint(udp_len as u64, len.field.byte_width());
                this.set_bytes("len", value.clone())?;
                patch.set("len", value);
            }
        }

        let Some(chksum) = header.find_field("chksum") else {
            return Ok(patch);
        };
        if chksum.value.is_some() {
            return Ok(patch);
        }
        let Some(network) = frame.predecessor(index) else {
            return Ok(patch);
        };
        let Some(template) = self.pseudo_template(network.name()) else {
            warn!(
                header = %header.name(),
                encapsulation = %network.name(),
                "No pseudo-header for encapsulation, checksum left unset"
            );
            return Ok(patch);
        };

        let pseudo = build_pseudo_header(template, network, header.proto(), udp_len)?;

        let mut buf = Buffer::alloc(pseudo.size() + udp_len);
        pseudo.serialize_into(0, &mut buf)?;
        let mut offset = pseudo.size();
        this.write_image(offset, &mut buf, Unset::Zero)?;
        offset += this.size();
        for following in frame.headers().iter().skip(index + 1) {
            following.write_image(offset, &mut buf, Unset::Zero)?;
            offset += following.size();
        }

        let sum = crate::checksum::internet_checksum(0, buf.data());
        debug!(
            header = %header.name(),
            pseudo = %pseudo.name(),
            covered = buf.size(),
            checksum = %format!("{:#06x}", sum),
            "Computed transport checksum"
        );
        patch.set("chksum", encode_uint(sum as u64, chksum.field.byte_width()));

        Ok(patch)
    }
}

fn build_pseudo_header(
    template: &Arc<HeaderTemplate>,
    network: &Header,
    proto: u8,
    udp_len: usize,
) -> Result<Header> {
    let mut pseudo = template.instantiate();

    for addr in ["sip", "dip"] {
        let value = network
            .value(addr)
            .cloned()
            .ok_or_else(|| Error::missing_field(network.name(), addr))?;
        pseudo.set_bytes(addr, value)?;
    }

    pseudo.set_uint("proto", proto as u64)?;
    pseudo.set_uint("len", udp_len as u64)?;
    Ok(pseudo)
}
