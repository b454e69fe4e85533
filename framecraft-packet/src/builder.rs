//! Frame builder with a fluent API
//!
//! This module provides a high-level builder for assembling a [`Frame`] from
//! the templates of a [`TemplateRegistry`], one header at a time.

use crate::frame::Frame;
use crate::header::Header;
use crate::registry::TemplateRegistry;
use bytes::Bytes;
use framecraft_core::{Error, Result};

/// Fluent builder for frames
///
/// Errors (unknown protocol, unknown field, bad value) are held back until
/// [`FrameBuilder::build`] so calls can be chained.
///
/// # Examples
///
/// ```
/// use framecraft_packet::{FrameBuilder, TemplateRegistry};
///
/// let registry = TemplateRegistry::with_builtin().unwrap();
/// let mut frame = FrameBuilder::new(&registry)
///     .header("ipv4")
///     .field("sip", "10.0.0.1")
///     .field("dip", "10.0.0.2")
///     .header("udp")
///     .field("sport", "1234")
///     .field("dport", "53")
///     .payload(vec![0u8; 8])
///     .build()
///     .unwrap();
///
/// frame.fill_defaults().unwrap();
/// assert_eq!(frame.get(1).unwrap().uint("len"), Some(16));
/// ```
pub struct FrameBuilder<'a> {
    registry: &'a TemplateRegistry,
    frame: Frame,
    error: Option<Error>,
}

impl<'a> FrameBuilder<'a> {
    /// Create a new builder over `registry`
    pub fn new(registry: &'a TemplateRegistry) -> Self {
        FrameBuilder {
            registry,
            frame: Frame::new(),
            error: None,
        }
    }

    fn record(&mut self, result: Result<()>) {
        if let Err(e) = result {
            self.error.get_or_insert(e);
        }
    }

    /// Append a fresh instance of the named template
    pub fn header(mut self, name: &str) -> Self {
        match self.registry.instantiate(name) {
            Ok(header) => self.frame.push(header),
            Err(e) => self.record(Err(e)),
        }
        self
    }

    /// Append an already built header
    pub fn push(mut self, header: Header) -> Self {
        self.frame.push(header);
        self
    }

    /// Set a field of the last header from its text form
    ///
    /// Must be called after `header()`.
    pub fn field(mut self, name: &str, value: &str) -> Self {
        let last = self.frame.len().checked_sub(1);
        let result = match last.and_then(|i| self.frame.get_mut(i)) {
            Some(header) => header.set(name, value),
            None => Err(Error::NotFound(format!(
                "header for field '{}'",
                name
            ))),
        };
        self.record(result);
        self
    }

    /// Append a raw payload
    pub fn payload<B: Into<Bytes>>(mut self, data: B) -> Self {
        self.frame.push(Header::payload(data));
        self
    }

    /// Finish the frame, returning the first error recorded while building
    pub fn build(self) -> Result<Frame> {
        match self.error {
            Some(e) => Err(e),
            None => Ok(self.frame),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_frame() {
        let registry = TemplateRegistry::with_builtin().unwrap();
        let frame = FrameBuilder::new(&registry)
            .header("eth")
            .field("dmac", "ff:ff:ff:ff:ff:ff")
            .header("ipv4")
            .payload(vec![1, 2])
            .build()
            .unwrap();

        let names: Vec<&str> = frame.iter().map(Header::name).collect();
        assert_eq!(names, vec!["eth", "ipv4", "data"]);
        assert_eq!(frame.size(), 14 + 20 + 2);
    }

    #[test]
    fn test_unknown_protocol_reported_at_build() {
        let registry = TemplateRegistry::with_builtin().unwrap();
        let result = FrameBuilder::new(&registry)
            .header("sctp")
            .header("udp")
            .build();
        assert!(matches!(result, Err(Error::UnknownProtocol(_))));
    }

    #[test]
    fn test_field_before_header() {
        let registry = TemplateRegistry::with_builtin().unwrap();
        let result = FrameBuilder::new(&registry).field("sport", "1").build();
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_bad_value_reported() {
        let registry = TemplateRegistry::with_builtin().unwrap();
        let result = FrameBuilder::new(&registry)
            .header("udp")
            .field("sport", "port")
            .build();
        assert!(matches!(result, Err(Error::InvalidValue { .. })));
    }
}
