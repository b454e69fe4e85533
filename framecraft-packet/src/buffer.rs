//! Fixed-size byte buffer used for one serialization or checksum pass

use crate::codec;
use bytes::{Bytes, BytesMut};
use framecraft_core::Result;

/// Owned, zero-initialised byte storage of a fixed length.
///
/// The buffer never grows: field writes outside `0..size` fail. Storage is
/// released when the buffer is dropped.
#[derive(Debug, Clone)]
pub struct Buffer {
    data: BytesMut,
}

impl Buffer {
    /// Allocate a zeroed buffer of `size` bytes
    pub fn alloc(size: usize) -> Self {
        Buffer {
            data: BytesMut::zeroed(size),
        }
    }

    /// Buffer length in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Place a field value at an absolute bit offset
    pub fn write_bits(&mut self, bit_offset: usize, bit_width: usize, value: &[u8]) -> Result<()> {
        codec::write_bits(&mut self.data, bit_offset, bit_width, value)
    }

    /// Read a field value from an absolute bit offset
    pub fn read_bits(&self, bit_offset: usize, bit_width: usize) -> Result<Vec<u8>> {
        codec::read_bits(&self.data, bit_offset, bit_width)
    }

    /// Convert into immutable bytes
    pub fn freeze(self) -> Bytes {
        self.data.freeze()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.data.to_vec()
    }
}
