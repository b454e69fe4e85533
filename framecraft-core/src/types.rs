//! Common types used throughout framecraft

use std::fmt;
use std::str::FromStr;

/// MAC Address (6 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddr(pub [u8; 6]);

impl MacAddr {
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for MacAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            self.0[0], self.0[1], self.0[2], self.0[3], self.0[4], self.0[5]
        )
    }
}

impl FromStr for MacAddr {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 6 {
            return Err(crate::Error::invalid_value(
                "mac",
                s,
                "expected six colon-separated octets",
            ));
        }

        let mut bytes = [0u8; 6];
        for (i, part) in parts.iter().enumerate() {
            bytes[i] = u8::from_str_radix(part, 16)
                .map_err(|_| crate::Error::invalid_value("mac", s, "invalid hex octet"))?;
        }

        Ok(MacAddr(bytes))
    }
}

/// Registry slot of a header template
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TemplateId(pub u8);

impl TemplateId {
    pub const ETH: Self = Self(0);
    pub const ARP: Self = Self(1);
    pub const IPV4: Self = Self(2);
    pub const IPV6: Self = Self(3);
    pub const UDP: Self = Self(4);
    pub const TCP: Self = Self(5);
}

/// IANA protocol numbers carried by network-layer headers
pub mod ip_protocols {
    pub const TCP: u8 = 6;
    pub const UDP: u8 = 17;
}
