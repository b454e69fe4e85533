//! Header instances
//!
//! A [`Header`] is an owned clone of a [`HeaderTemplate`] carrying one
//! optional value per field. Layout and metadata stay shared with the
//! template; only the values belong to the instance.

use crate::buffer::Buffer;
use crate::template::{Field, HeaderTemplate, Parser};
use bytes::Bytes;
use framecraft_core::value::{decode_uint, mask_to_width};
use framecraft_core::{encode_uint, parse_value, Error, Result};
use std::sync::Arc;
use tracing::trace;

/// What to do with an unset field when writing a header image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Unset {
    /// Fail with a missing field value error
    Reject,
    /// Leave the field's bits zero
    Zero,
}

/// A field of an instance together with its current value
#[derive(Debug, Clone, Copy)]
pub struct FieldRef<'a> {
    pub field: &'a Field,
    pub value: Option<&'a Bytes>,
}

/// Mutable header instance
#[derive(Debug, Clone)]
pub struct Header {
    template: Arc<HeaderTemplate>,
    values: Vec<Option<Bytes>>,
}

impl Header {
    /// Clone a template into a new instance, starting from its defaults
    pub fn from_template(template: Arc<HeaderTemplate>) -> Self {
        let values = template.defaults().to_vec();
        Header { template, values }
    }

    /// Raw payload header holding `data` verbatim
    ///
    /// # Examples
    ///
    /// ```
    /// use framecraft_packet::Header;
    ///
    /// let payload = Header::payload(vec![1, 2, 3, 4]);
    /// assert_eq!(payload.name(), "data");
    /// assert_eq!(payload.size(), 4);
    /// ```
    pub fn payload<B: Into<Bytes>>(data: B) -> Self {
        let data = data.into();
        let template = Arc::new(HeaderTemplate::payload(data.len()));
        let values = if data.is_empty() {
            Vec::new()
        } else {
            vec![Some(data)]
        };
        Header { template, values }
    }

    pub fn template(&self) -> &Arc<HeaderTemplate> {
        &self.template
    }

    pub fn name(&self) -> &str {
        self.template.name()
    }

    /// Protocol number of this header's type
    pub fn proto(&self) -> u8 {
        self.template.proto()
    }

    /// Header size in bytes
    pub fn size(&self) -> usize {
        self.template.size()
    }

    /// Look up a field and its value by exact name
    pub fn find_field(&self, name: &str) -> Option<FieldRef<'_>> {
        let index = self.template.field_index(name)?;
        Some(FieldRef {
            field: &self.template.fields()[index],
            value: self.values[index].as_ref(),
        })
    }

    /// Iterate over all fields in wire order
    pub fn fields(&self) -> impl Iterator<Item = FieldRef<'_>> {
        self.template
            .fields()
            .iter()
            .zip(self.values.iter())
            .map(|(field, value)| FieldRef {
                field,
                value: value.as_ref(),
            })
    }

    /// Current value of a field, `None` if the field is unset or absent
    pub fn value(&self, name: &str) -> Option<&Bytes> {
        self.find_field(name).and_then(|f| f.value)
    }

    /// Current value as an integer (low 64 bits)
    pub fn uint(&self, name: &str) -> Option<u64> {
        self.value(name).map(|v| decode_uint(v))
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.value(name).is_some()
    }

    fn index_of(&self, name: &str) -> Result<usize> {
        self.template
            .field_index(name)
            .ok_or_else(|| Error::unknown_field(self.name(), name))
    }

    /// Set a field from its text form (decimal, hex or address notation)
    pub fn set(&mut self, name: &str, text: &str) -> Result<()> {
        let index = self.index_of(name)?;
        let value = parse_value(name, text, self.template.fields()[index].bit_width())?;
        self.values[index] = Some(value);
        Ok(())
    }

    /// Set a field from a big-endian byte value.
    ///
    /// The value must have exactly the field's byte width; bits above the
    /// field's bit width are dropped.
    pub fn set_bytes(&mut self, name: &str, value: Bytes) -> Result<()> {
        let index = self.index_of(name)?;
        let field = &self.template.fields()[index];
        if value.len() != field.byte_width() {
            return Err(Error::invalid_value(
                name,
                format!("{:02x?}", &value[..]),
                format!("expected {} bytes", field.byte_width()),
            ));
        }

        let value = if field.bit_width() % 8 == 0 {
            value
        } else {
            let mut masked = value.to_vec();
            mask_to_width(&mut masked, field.bit_width());
            Bytes::from(masked)
        };
        self.values[index] = Some(value);
        Ok(())
    }

    /// Set a field from an integer, truncated to the field width
    pub fn set_uint(&mut self, name: &str, value: u64) -> Result<()> {
        let index = self.index_of(name)?;
        let width = self.template.fields()[index].byte_width();
        self.set_bytes(name, encode_uint(value, width))
    }

    /// Return a field to the unset state
    pub fn clear(&mut self, name: &str) -> Result<()> {
        let index = self.index_of(name)?;
        self.values[index] = None;
        Ok(())
    }

    /// Write every field into `buf` starting at `byte_offset`.
    ///
    /// # Errors
    ///
    /// [`Error::MissingFieldValue`] if a field is unset, and
    /// [`Error::BufferBounds`] if the header does not fit the buffer.
    pub fn serialize_into(&self, byte_offset: usize, buf: &mut Buffer) -> Result<()> {
        self.write_image(byte_offset, buf, Unset::Reject)
    }

    pub(crate) fn write_image(
        &self,
        byte_offset: usize,
        buf: &mut Buffer,
        unset: Unset,
    ) -> Result<()> {
        let base = byte_offset * 8;
        for f in self.fields() {
            match f.value {
                Some(value) => {
                    trace!(header = %self.name(), field = f.field.name(), "writing field");
                    buf.write_bits(base + f.field.bit_offset(), f.field.bit_width(), value)?;
                }
                None if unset == Unset::Zero => {}
                None => return Err(Error::missing_field(self.name(), f.field.name())),
            }
        }
        Ok(())
    }

    /// Serialize this header alone
    pub fn to_bytes(&self) -> Result<Bytes> {
        let mut buf = Buffer::alloc(self.size());
        self.serialize_into(0, &mut buf)?;
        Ok(buf.freeze())
    }

    /// Decode the start of `data` with the layout of `template`.
    ///
    /// Every field of the returned instance is set. Bytes past the template
    /// size are ignored.
    pub fn parse(template: &Arc<HeaderTemplate>, data: &[u8]) -> Result<Header> {
        match template.parser() {
            Some(Parser::Fields) => Self::parse_fields(template, data),
            None => Err(Error::NotFound(format!(
                "decoder for header '{}'",
                template.name()
            ))),
        }
    }

    fn parse_fields(template: &Arc<HeaderTemplate>, data: &[u8]) -> Result<Header> {
        if data.len() < template.size() {
            return Err(Error::Truncated {
                header: template.name().to_string(),
                needed: template.size(),
                available: data.len(),
            });
        }

        let image = &data[..template.size()];
        let values = template
            .fields()
            .iter()
            .map(|f| {
                crate::codec::read_bits(image, f.bit_offset(), f.bit_width())
                    .map(|v| Some(Bytes::from(v)))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Header {
            template: Arc::clone(template),
            values,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::HeaderDef;

    fn tcp_like() -> Arc<HeaderTemplate> {
        let mut t = HeaderDef::new("tcp")
            .proto(6)
            .field("sport", 16, "")
            .field("dport", 16, "")
            .field("doff", 4, "")
            .field("resv", 6, "")
            .field("syn", 1, "")
            .field("fin", 1, "")
            .field("win", 4, "")
            .parse_with(Parser::Fields)
            .define_offsets()
            .unwrap();
        t.set_default("doff", "5").unwrap();
        Arc::new(t)
    }

    fn populated() -> Header {
        let mut h = tcp_like().instantiate();
        h.set("sport", "1234").unwrap();
        h.set("dport", "0x50").unwrap();
        h.set("resv", "0").unwrap();
        h.set("syn", "1").unwrap();
        h.set("fin", "0").unwrap();
        h.set("win", "9").unwrap();
        h
    }

    #[test]
    fn test_instance_starts_from_defaults() {
        let h = tcp_like().instantiate();
        assert_eq!(h.uint("doff"), Some(5));
        assert!(!h.is_set("sport"));
    }

    #[test]
    fn test_instances_are_independent() {
        let t = tcp_like();
        let mut a = t.instantiate();
        let b = t.instantiate();
        a.set("doff", "15").unwrap();
        assert_eq!(a.uint("doff"), Some(15));
        assert_eq!(b.uint("doff"), Some(5));
        assert_eq!(t.default_value("doff").map(|v| v[0]), Some(5));
    }

    #[test]
    fn test_serialize_packs_sub_byte_fields() {
        let bytes = populated().to_bytes().unwrap();
        assert_eq!(&bytes[..], &[0x04, 0xd2, 0x00, 0x50, 0x50, 0x29]);
    }

    #[test]
    fn test_serialize_missing_field() {
        let h = tcp_like().instantiate();
        match h.to_bytes() {
            Err(Error::MissingFieldValue { header, field }) => {
                assert_eq!(header, "tcp");
                assert_eq!(field, "sport");
            }
            other => panic!("expected missing field, got {:?}", other),
        }
    }

    #[test]
    fn test_write_image_zero_fills_unset() {
        let h = tcp_like().instantiate();
        let mut buf = Buffer::alloc(6);
        h.write_image(0, &mut buf, Unset::Zero).unwrap();
        assert_eq!(buf.data(), &[0, 0, 0, 0, 0x50, 0]);
    }

    #[test]
    fn test_serialize_at_offset() {
        let h = populated();
        let mut buf = Buffer::alloc(8);
        h.serialize_into(2, &mut buf).unwrap();
        assert_eq!(&buf.data()[..2], &[0, 0]);
        assert_eq!(&buf.data()[2..], &[0x04, 0xd2, 0x00, 0x50, 0x50, 0x29]);
        assert!(h.serialize_into(3, &mut buf).is_err());
    }

    #[test]
    fn test_set_truncates_to_width() {
        let mut h = tcp_like().instantiate();
        h.set_uint("win", 0xff).unwrap();
        assert_eq!(h.uint("win"), Some(0x0f));
        h.set_uint("sport", 0x1_0001).unwrap();
        assert_eq!(h.uint("sport"), Some(1));
    }

    #[test]
    fn test_set_unknown_field() {
        let mut h = tcp_like().instantiate();
        assert!(matches!(h.set("len", "1"), Err(Error::UnknownField { .. })));
        assert!(h.find_field("len").is_none());
    }

    #[test]
    fn test_set_bytes_wrong_width() {
        let mut h = tcp_like().instantiate();
        assert!(h.set_bytes("sport", Bytes::from_static(&[1])).is_err());
    }

    #[test]
    fn test_clear() {
        let mut h = tcp_like().instantiate();
        h.clear("doff").unwrap();
        assert!(!h.is_set("doff"));
    }

    #[test]
    fn test_parse_round_trip() {
        let original = populated();
        let bytes = original.to_bytes().unwrap();
        let parsed = Header::parse(original.template(), &bytes).unwrap();
        for (a, b) in original.fields().zip(parsed.fields()) {
            assert_eq!(a.value, b.value, "field {}", a.field.name());
        }
    }

    #[test]
    fn test_parse_truncated() {
        let err = Header::parse(&tcp_like(), &[0u8; 5]).unwrap_err();
        assert!(matches!(err, Error::Truncated { needed: 6, available: 5, .. }));
    }

    #[test]
    fn test_parse_without_decoder() {
        let t = Arc::new(HeaderDef::new("raw").field("x", 8, "").define_offsets().unwrap());
        assert!(Header::parse(&t, &[0]).is_err());
    }

    #[test]
    fn test_payload_header() {
        let p = Header::payload(vec![0xde, 0xad]);
        assert_eq!(&p.to_bytes().unwrap()[..], &[0xde, 0xad]);
        assert_eq!(Header::payload(Vec::new()).size(), 0);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_serialize_parse_round_trip(
                sport in any::<u16>(),
                dport in any::<u16>(),
                doff in 0u64..16,
                resv in 0u64..64,
                syn in 0u64..2,
                fin in 0u64..2,
                win in 0u64..16,
            ) {
                let mut h = tcp_like().instantiate();
                h.set_uint("sport", sport as u64).unwrap();
                h.set_uint("dport", dport as u64).unwrap();
                h.set_uint("doff", doff).unwrap();
                h.set_uint("resv", resv).unwrap();
                h.set_uint("syn", syn).unwrap();
                h.set_uint("fin", fin).unwrap();
                h.set_uint("win", win).unwrap();

                let bytes = h.to_bytes().unwrap();
                let parsed = Header::parse(h.template(), &bytes).unwrap();

                prop_assert_eq!(parsed.uint("sport"), Some(sport as u64));
                prop_assert_eq!(parsed.uint("dport"), Some(dport as u64));
                prop_assert_eq!(parsed.uint("doff"), Some(doff));
                prop_assert_eq!(parsed.uint("resv"), Some(resv));
                prop_assert_eq!(parsed.uint("syn"), Some(syn));
                prop_assert_eq!(parsed.uint("fin"), Some(fin));
                prop_assert_eq!(parsed.uint("win"), Some(win));
                prop_assert_eq!(parsed.to_bytes().unwrap(), bytes);
            }
        }
    }
}
