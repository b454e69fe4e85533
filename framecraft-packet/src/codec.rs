//! Bit-level field placement
//!
//! Fields are packed MSB-first and may start or end anywhere inside a byte.
//! A field value is the right-aligned big-endian byte string produced by
//! [`framecraft_core::value`]; only its low-order `bit_width` bits are placed.

use framecraft_core::{byte_width, Error, Result};
use tracing::trace;

fn check_bounds(len: usize, bit_offset: usize, bit_width: usize) -> Result<()> {
    let end = byte_width(bit_offset + bit_width);
    if end > len {
        return Err(Error::BufferBounds {
            offset: bit_offset / 8,
            len: byte_width(bit_width),
            size: len,
        });
    }
    Ok(())
}

/// Writes the low-order `bit_width` bits of `value` into `dst` starting at
/// `bit_offset` (counted from the MSB of `dst[0]`). Bits of `dst` outside the
/// field are left untouched.
pub fn write_bits(dst: &mut [u8], bit_offset: usize, bit_width: usize, value: &[u8]) -> Result<()> {
    check_bounds(dst.len(), bit_offset, bit_width)?;
    if value.len() != byte_width(bit_width) {
        return Err(Error::invalid_value(
            "",
            format!("{:02x?}", value),
            format!("expected {} bytes for {} bits", byte_width(bit_width), bit_width),
        ));
    }

    // Byte aligned fields are a straight copy
    if bit_offset % 8 == 0 && bit_width % 8 == 0 {
        let start = bit_offset / 8;
        dst[start..start + value.len()].copy_from_slice(value);
        return Ok(());
    }

    trace!(bit_offset, bit_width, "placing unaligned field");
    let last = value.len() - 1;
    for i in 0..bit_width {
        let src_bit = bit_width - 1 - i;
        let set = value[last - src_bit / 8] & (1 << (src_bit % 8)) != 0;

        let pos = bit_offset + i;
        let mask = 0x80u8 >> (pos % 8);
        if set {
            dst[pos / 8] |= mask;
        } else {
            dst[pos / 8] &= !mask;
        }
    }

    Ok(())
}

/// Extracts `bit_width` bits starting at `bit_offset` from `src` into a
/// right-aligned big-endian byte string of `ceil(bit_width / 8)` bytes.
pub fn read_bits(src: &[u8], bit_offset: usize, bit_width: usize) -> Result<Vec<u8>> {
    check_bounds(src.len(), bit_offset, bit_width)?;

    if bit_offset % 8 == 0 && bit_width % 8 == 0 {
        let start = bit_offset / 8;
        return Ok(src[start..start + bit_width / 8].to_vec());
    }

    let mut out = vec![0u8; byte_width(bit_width)];
    let last = out.len() - 1;
    for i in 0..bit_width {
        let pos = bit_offset + i;
        if src[pos / 8] & (0x80 >> (pos % 8)) != 0 {
            let dst_bit = bit_width - 1 - i;
            out[last - dst_bit / 8] |= 1 << (dst_bit % 8);
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_aligned() {
        let mut buf = [0u8; 4];
        write_bits(&mut buf, 8, 16, &[0xab, 0xcd]).unwrap();
        assert_eq!(buf, [0x00, 0xab, 0xcd, 0x00]);
    }

    #[test]
    fn test_write_nibbles() {
        let mut buf = [0u8; 1];
        write_bits(&mut buf, 0, 4, &[0x04]).unwrap();
        write_bits(&mut buf, 4, 4, &[0x05]).unwrap();
        assert_eq!(buf, [0x45]);
    }

    #[test]
    fn test_write_straddles_byte_boundary() {
        // TCP layout: doff(4) resv(6) then six 1-bit flags
        let mut buf = [0u8; 2];
        write_bits(&mut buf, 0, 4, &[0x05]).unwrap();
        write_bits(&mut buf, 4, 6, &[0x00]).unwrap();
        write_bits(&mut buf, 14, 1, &[0x01]).unwrap(); // syn
        write_bits(&mut buf, 11, 1, &[0x01]).unwrap(); // ack
        assert_eq!(buf, [0x50, 0x12]);
    }

    #[test]
    fn test_write_clears_previous_bits() {
        let mut buf = [0xffu8; 2];
        write_bits(&mut buf, 3, 10, &[0x00, 0x00]).unwrap();
        assert_eq!(buf, [0xe0, 0x07]);
    }

    #[test]
    fn test_write_13_bit_field() {
        // IPv4 flags(3) + fragment offset(13)
        let mut buf = [0u8; 2];
        write_bits(&mut buf, 0, 3, &[0x02]).unwrap();
        write_bits(&mut buf, 3, 13, &[0x01, 0x23]).unwrap();
        assert_eq!(buf, [0x41, 0x23]);
    }

    #[test]
    fn test_write_out_of_bounds() {
        let mut buf = [0u8; 2];
        let err = write_bits(&mut buf, 12, 8, &[0xff]).unwrap_err();
        assert!(matches!(err, Error::BufferBounds { size: 2, .. }));
    }

    #[test]
    fn test_write_rejects_wrong_value_width() {
        let mut buf = [0u8; 4];
        assert!(write_bits(&mut buf, 0, 16, &[0x01]).is_err());
    }

    #[test]
    fn test_read_back_unaligned() {
        let buf = [0x41, 0x23];
        assert_eq!(read_bits(&buf, 0, 3).unwrap(), vec![0x02]);
        assert_eq!(read_bits(&buf, 3, 13).unwrap(), vec![0x01, 0x23]);
        assert_eq!(read_bits(&buf, 0, 16).unwrap(), vec![0x41, 0x23]);
    }

    #[test]
    fn test_read_out_of_bounds() {
        assert!(read_bits(&[0u8; 1], 4, 8).is_err());
    }
}
