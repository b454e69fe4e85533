//! Frame descriptions given as command-line tokens
//!
//! A protocol name starts a new header and the `<field> <value>` pairs after
//! it set that header's fields. `data <hex>` appends a raw payload and
//! `zero <n>` appends `n` zero bytes.
//!
//! ```text
//! framecraft hex ipv4 sip 10.0.0.1 dip 10.0.0.2 len 36 proto 17 chksum 0 \
//!     udp sport 1234 dport 53 zero 8
//! ```
//!
//! IPv4 `len`, `proto` and `chksum` are not computed and must be given.

use framecraft_core::{Error, Result};
use bytes::Bytes;
use framecraft_packet::{Frame, FrameBuilder, TemplateRegistry};
use tracing::debug;

/// Build a frame from its token description
pub fn parse_frame<S: AsRef<str>>(registry: &TemplateRegistry, tokens: &[S]) -> Result<Frame> {
    let mut builder = FrameBuilder::new(registry);
    let mut has_header = false;
    let mut iter = tokens.iter().map(|t| t.as_ref());

    while let Some(token) = iter.next() {
        if registry.contains(token) {
            builder = builder.header(token);
            has_header = true;
            continue;
        }

        match token {
            "data" => {
                let text = next_value(&mut iter, token)?;
                let data = hex::decode(text.trim_start_matches("0x"))
                    .map_err(|e| Error::invalid_value(token, text, e.to_string()))?;
                builder = builder.payload(data);
                has_header = true;
            }
            "zero" => {
                let text = next_value(&mut iter, token)?;
                let len: usize = text
                    .parse()
                    .map_err(|_| Error::invalid_value(token, text, "expected a byte count"))?;
                builder = builder.payload(vec![0u8; len]);
                has_header = true;
            }
            field if has_header => {
                let value = next_value(&mut iter, field)?;
                builder = builder.field(field, value);
            }
            other => return Err(Error::UnknownProtocol(other.to_string())),
        }
    }

    let frame = builder.build()?;
    debug!(headers = frame.len(), size = frame.size(), "Parsed frame description");
    Ok(frame)
}

/// Parse, default-fill and serialize a frame description
pub fn build_frame<S: AsRef<str>>(registry: &TemplateRegistry, tokens: &[S]) -> Result<Bytes> {
    let mut frame = parse_frame(registry, tokens)?;
    frame.fill_defaults()?;
    frame.to_bytes()
}

fn next_value<'a>(iter: &mut impl Iterator<Item = &'a str>, field: &str) -> Result<&'a str> {
    iter.next()
        .ok_or_else(|| Error::invalid_value(field, "", "missing value"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TemplateRegistry {
        TemplateRegistry::with_builtin().unwrap()
    }

    #[test]
    fn test_parse_udp_frame() {
        let registry = registry();
        let tokens = [
            "ipv4", "sip", "10.0.0.1", "dip", "10.0.0.2", "udp", "sport", "1234", "dport", "53",
            "zero", "8",
        ];
        let mut frame = parse_frame(&registry, &tokens).unwrap();
        assert_eq!(frame.len(), 3);
        assert_eq!(frame.size(), 20 + 8 + 8);

        frame.fill_defaults().unwrap();
        assert_eq!(frame.get(1).unwrap().uint("len"), Some(16));
        assert_eq!(frame.get(1).unwrap().uint("chksum"), Some(0xe6c4));
    }

    #[test]
    fn test_build_udp_over_ipv4() {
        let registry = registry();
        let tokens = [
            "ipv4", "sip", "10.0.0.1", "dip", "10.0.0.2", "len", "36", "proto", "17", "chksum",
            "0", "udp", "sport", "1234", "dport", "53", "zero", "8",
        ];
        let bytes = build_frame(&registry, &tokens).unwrap();
        assert_eq!(bytes.len(), 36);
        assert_eq!(
            hex::encode(&bytes[..28]),
            "450000240000000040110000 0a000001 0a000002 04d200350010e6c4".replace(' ', "")
        );
        assert_eq!(&bytes[28..], &[0u8; 8]);
    }

    #[test]
    fn test_build_reports_missing_ipv4_fields() {
        let registry = registry();
        let tokens = ["ipv4", "sip", "10.0.0.1", "dip", "10.0.0.2", "udp", "sport", "1"];
        assert!(matches!(
            build_frame(&registry, &tokens),
            Err(Error::MissingFieldValue { field, .. }) if field == "len"
        ));
    }

    #[test]
    fn test_parse_hex_payload() {
        let registry = registry();
        let frame = parse_frame(&registry, &["data", "0xdeadbeef"]).unwrap();
        assert_eq!(&frame.to_bytes().unwrap()[..], &[0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn test_unknown_leading_token() {
        let registry = registry();
        assert!(matches!(
            parse_frame(&registry, &["sctp", "sport", "1"]),
            Err(Error::UnknownProtocol(p)) if p == "sctp"
        ));
    }

    #[test]
    fn test_unknown_field() {
        let registry = registry();
        assert!(matches!(
            parse_frame(&registry, &["udp", "ttl", "1"]),
            Err(Error::UnknownField { .. })
        ));
    }

    #[test]
    fn test_missing_value() {
        let registry = registry();
        assert!(matches!(
            parse_frame(&registry, &["udp", "sport"]),
            Err(Error::InvalidValue { .. })
        ));
        assert!(matches!(
            parse_frame(&registry, &["data", "zz"]),
            Err(Error::InvalidValue { .. })
        ));
    }
}
