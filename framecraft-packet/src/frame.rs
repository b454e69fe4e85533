//! Frame stacks
//!
//! A [`Frame`] is the ordered list of headers making up one packet,
//! outermost first. Headers only know their own position; anything that
//! spans headers (remaining length, the encapsulating header) is computed by
//! walking the stack.

use crate::buffer::Buffer;
use crate::fill;
use crate::header::Header;
use bytes::Bytes;
use framecraft_core::Result;
use tracing::debug;

/// Ordered stack of header instances forming one packet
#[derive(Debug, Clone, Default)]
pub struct Frame {
    stack: Vec<Header>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header at the inner end of the stack
    pub fn push(&mut self, header: Header) {
        self.stack.push(header);
    }

    pub fn with_header(mut self, header: Header) -> Self {
        self.push(header);
        self
    }

    /// Number of headers in the stack
    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Header> {
        self.stack.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Header> {
        self.stack.get_mut(index)
    }

    pub fn headers(&self) -> &[Header] {
        &self.stack
    }

    pub fn iter(&self) -> impl Iterator<Item = &Header> {
        self.stack.iter()
    }

    /// First header with the given protocol name
    pub fn find(&self, name: &str) -> Option<(usize, &Header)> {
        self.stack.iter().enumerate().find(|(_, h)| h.name() == name)
    }

    /// Bytes from the header at `from_index` through the end of the stack
    pub fn remaining_size(&self, from_index: usize) -> usize {
        self.stack.iter().skip(from_index).map(Header::size).sum()
    }

    /// The encapsulating header of `index`, if any
    pub fn predecessor(&self, index: usize) -> Option<&Header> {
        index.checked_sub(1).and_then(|i| self.stack.get(i))
    }

    /// Total frame size in bytes
    pub fn size(&self) -> usize {
        self.remaining_size(0)
    }

    /// Run every header's default-fill handler in stack order.
    ///
    /// See [`fill::fill_defaults`].
    pub fn fill_defaults(&mut self) -> Result<()> {
        fill::fill_defaults(self)
    }

    /// Serialize all headers back to back.
    ///
    /// Fails on the first header with an unset field.
    pub fn to_bytes(&self) -> Result<Bytes> {
        let mut buf = Buffer::alloc(self.size());
        let mut offset = 0;
        for header in &self.stack {
            header.serialize_into(offset, &mut buf)?;
            offset += header.size();
        }

        debug!(headers = self.len(), size = buf.size(), "Serialized frame");
        Ok(buf.freeze())
    }
}

impl<'a> IntoIterator for &'a Frame {
    type Item = &'a Header;
    type IntoIter = std::slice::Iter<'a, Header>;

    fn into_iter(self) -> Self::IntoIter {
        self.stack.iter()
    }
}

impl FromIterator<Header> for Frame {
    fn from_iter<I: IntoIterator<Item = Header>>(iter: I) -> Self {
        Frame {
            stack: iter.into_iter().collect(),
        }
    }
}
