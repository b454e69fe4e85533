//! Header templates
//!
//! A header is declared as an ordered list of named bit fields with a
//! [`HeaderDef`]. Calling [`HeaderDef::define_offsets`] validates the layout,
//! assigns every field its bit offset and yields an immutable
//! [`HeaderTemplate`]. Templates are shared behind `Arc` and cloned into
//! [`Header`] instances whenever a frame needs one.

use crate::fill::FillHandler;
use crate::header::Header;
use bytes::Bytes;
use framecraft_core::{byte_width, parse_value, Error, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Field declaration, before offsets are known
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: String,
    pub help: String,
    pub bit_width: usize,
}

/// A field with its position inside the header image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    name: String,
    help: String,
    bit_width: usize,
    bit_offset: usize,
}

impl Field {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    /// Width of the field in bits
    pub fn bit_width(&self) -> usize {
        self.bit_width
    }

    /// Offset of the first bit from the start of the header
    pub fn bit_offset(&self) -> usize {
        self.bit_offset
    }

    /// Offset of the byte holding the first bit
    pub fn byte_offset(&self) -> usize {
        self.bit_offset / 8
    }

    /// Size of the stored value in bytes
    pub fn byte_width(&self) -> usize {
        byte_width(self.bit_width)
    }
}

/// Decode capability of a template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parser {
    /// Extract every field at its offset
    Fields,
}

/// Header declaration with no offsets yet
///
/// # Examples
///
/// ```
/// use framecraft_packet::template::HeaderDef;
///
/// let template = HeaderDef::new("vlan")
///     .help("802.1Q tag")
///     .field("pcp", 3, "Priority code point")
///     .field("dei", 1, "Drop eligible indicator")
///     .field("vid", 12, "VLAN identifier")
///     .field("et", 16, "EtherType")
///     .define_offsets()
///     .unwrap();
///
/// assert_eq!(template.size(), 4);
/// assert_eq!(template.field("vid").unwrap().bit_offset(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct HeaderDef {
    name: String,
    help: String,
    proto: u8,
    fields: Vec<FieldDef>,
    fill: Option<FillHandler>,
    parser: Option<Parser>,
}

impl HeaderDef {
    pub fn new<S: Into<String>>(name: S) -> Self {
        HeaderDef {
            name: name.into(),
            help: String::new(),
            proto: 0,
            fields: Vec::new(),
            fill: None,
            parser: None,
        }
    }

    pub fn help<S: Into<String>>(mut self, help: S) -> Self {
        self.help = help.into();
        self
    }

    /// Protocol number announced by the enclosing network-layer header
    pub fn proto(mut self, proto: u8) -> Self {
        self.proto = proto;
        self
    }

    /// Append a field
    pub fn field<N, H>(mut self, name: N, bit_width: usize, help: H) -> Self
    where
        N: Into<String>,
        H: Into<String>,
    {
        self.fields.push(FieldDef {
            name: name.into(),
            help: help.into(),
            bit_width,
        });
        self
    }

    /// Attach a default-fill handler
    pub fn fill_with(mut self, handler: FillHandler) -> Self {
        self.fill = Some(handler);
        self
    }

    /// Attach a decode capability
    pub fn parse_with(mut self, parser: Parser) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Assign running bit offsets to the fields and compute the header size.
    ///
    /// # Errors
    ///
    /// Fails with [`Error::InvalidLayout`] if a field has zero width, a field
    /// name repeats, or the total width is not a whole number of bytes.
    pub fn define_offsets(self) -> Result<HeaderTemplate> {
        let mut seen = HashSet::new();
        let mut offset = 0;
        let mut fields = Vec::with_capacity(self.fields.len());

        for def in self.fields {
            if def.bit_width == 0 {
                return Err(Error::invalid_layout(
                    &self.name,
                    format!("field '{}' has zero width", def.name),
                ));
            }
            if !seen.insert(def.name.clone()) {
                return Err(Error::invalid_layout(
                    &self.name,
                    format!("duplicate field '{}'", def.name),
                ));
            }

            fields.push(Field {
                name: def.name,
                help: def.help,
                bit_width: def.bit_width,
                bit_offset: offset,
            });
            offset += def.bit_width;
        }

        if offset % 8 != 0 {
            return Err(Error::invalid_layout(
                &self.name,
                format!("total width of {} bits is not a whole number of bytes", offset),
            ));
        }

        debug!(
            header = %self.name,
            size = offset / 8,
            fields = fields.len(),
            "Defined header offsets"
        );

        let defaults = vec![None; fields.len()];
        Ok(HeaderTemplate {
            name: self.name,
            help: self.help,
            proto: self.proto,
            fields,
            defaults,
            size: offset / 8,
            fill: self.fill,
            parser: self.parser,
        })
    }
}

/// Immutable header prototype with defined field offsets
#[derive(Debug, Clone)]
pub struct HeaderTemplate {
    name: String,
    help: String,
    proto: u8,
    fields: Vec<Field>,
    defaults: Vec<Option<Bytes>>,
    size: usize,
    fill: Option<FillHandler>,
    parser: Option<Parser>,
}

impl HeaderTemplate {
    /// Template for a raw payload of `len` bytes, a single `data` field
    pub(crate) fn payload(len: usize) -> Self {
        let fields = if len == 0 {
            Vec::new()
        } else {
            vec![Field {
                name: "data".to_string(),
                help: "Raw payload bytes".to_string(),
                bit_width: len * 8,
                bit_offset: 0,
            }]
        };

        HeaderTemplate {
            name: "data".to_string(),
            help: "Payload data".to_string(),
            proto: 0,
            defaults: vec![None; fields.len()],
            fields,
            size: len,
            fill: None,
            parser: Some(Parser::Fields),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    /// Protocol number (e.g. 17 for UDP)
    pub fn proto(&self) -> u8 {
        self.proto
    }

    /// Header size in bytes
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Look up a field by exact name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Default value a fresh instance starts with
    pub fn default_value(&self, name: &str) -> Option<&Bytes> {
        self.field_index(name)
            .and_then(|i| self.defaults[i].as_ref())
    }

    pub fn fill_handler(&self) -> Option<&FillHandler> {
        self.fill.as_ref()
    }

    pub fn parser(&self) -> Option<Parser> {
        self.parser
    }

    /// Set the value every future instance starts with.
    ///
    /// Templates are immutable once shared, so this is only reachable while
    /// the template is still exclusively owned.
    pub fn set_default(&mut self, field: &str, text: &str) -> Result<()> {
        let index = self
            .field_index(field)
            .ok_or_else(|| Error::unknown_field(&self.name, field))?;
        let value = parse_value(field, text, self.fields[index].bit_width)?;

        debug!(header = %self.name, field = field, value = text, "Set template default");
        self.defaults[index] = Some(value);
        Ok(())
    }

    pub(crate) fn defaults(&self) -> &[Option<Bytes>] {
        &self.defaults
    }

    /// Clone a fresh, independently owned instance
    pub fn instantiate(self: &Arc<Self>) -> Header {
        Header::from_template(Arc::clone(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn udp_like() -> HeaderDef {
        HeaderDef::new("udp")
            .proto(17)
            .field("sport", 16, "Source port")
            .field("dport", 16, "Destination port")
            .field("len", 16, "Length")
            .field("chksum", 16, "Checksum")
    }

    #[test]
    fn test_define_offsets_assigns_running_offsets() {
        let t = udp_like().define_offsets().unwrap();
        assert_eq!(t.size(), 8);
        let offsets: Vec<usize> = t.fields().iter().map(|f| f.bit_offset()).collect();
        assert_eq!(offsets, vec![0, 16, 32, 48]);
        assert_eq!(t.field("chksum").unwrap().byte_offset(), 6);
        assert_eq!(t.proto(), 17);
    }

    #[test]
    fn test_size_is_total_bits_over_eight() {
        let t = HeaderDef::new("mixed")
            .field("a", 4, "")
            .field("b", 6, "")
            .field("c", 1, "")
            .field("d", 5, "")
            .field("e", 32, "")
            .define_offsets()
            .unwrap();
        let total: usize = t.fields().iter().map(|f| f.bit_width()).sum();
        assert_eq!(total % 8, 0);
        assert_eq!(t.size(), total / 8);
        assert_eq!(t.field("d").unwrap().bit_offset(), 11);
    }

    #[test]
    fn test_rejects_partial_byte_layout() {
        let err = HeaderDef::new("bad")
            .field("a", 32, "")
            .field("b", 1, "")
            .define_offsets()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidLayout { .. }));
    }

    #[test]
    fn test_rejects_zero_width_and_duplicates() {
        assert!(HeaderDef::new("z").field("a", 0, "").define_offsets().is_err());
        assert!(HeaderDef::new("d")
            .field("a", 8, "")
            .field("a", 8, "")
            .define_offsets()
            .is_err());
    }

    #[test]
    fn test_find_field_absent_is_none() {
        let t = udp_like().define_offsets().unwrap();
        assert!(t.field("doff").is_none());
        assert!(t.field("sport").is_some());
    }

    #[test]
    fn test_set_default_applies_to_instances() {
        let mut t = udp_like().define_offsets().unwrap();
        t.set_default("dport", "53").unwrap();
        let t = Arc::new(t);

        let a = t.instantiate();
        let b = t.instantiate();
        assert_eq!(a.uint("dport"), Some(53));
        assert_eq!(b.uint("dport"), Some(53));
        assert!(!a.is_set("sport"));
    }

    #[test]
    fn test_set_default_unknown_field() {
        let mut t = udp_like().define_offsets().unwrap();
        assert!(matches!(
            t.set_default("nope", "1"),
            Err(Error::UnknownField { .. })
        ));
    }

    #[test]
    fn test_payload_template() {
        let t = HeaderTemplate::payload(8);
        assert_eq!(t.size(), 8);
        assert_eq!(t.field("data").unwrap().bit_width(), 64);
        assert!(HeaderTemplate::payload(0).fields().is_empty());
    }
}
