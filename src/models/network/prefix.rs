use bytes::BufMut;
use ipnet::Ipv4Net;
use std::fmt::{Debug, Display, Formatter};
use std::net::Ipv4Addr;
use std::str::FromStr;

/// An IPv4 network prefix as carried in the withdrawn routes and NLRI fields of an UPDATE.
///
/// The address is always kept masked to the prefix length: bits past the prefix length are
/// dropped when a prefix is constructed or decoded, and are never written on the wire.
///
/// Wire format:
/// ```text
/// +---------------------------+
/// |   Length (1 octet)        |
/// +---------------------------+
/// |   Prefix (variable)       |
/// +---------------------------+
/// ```
/// where the prefix field is `ceil(length / 8)` octets long.
#[derive(PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct NetworkPrefix {
    pub prefix: Ipv4Net,
}

// Attempt to reduce the size of the debug output
impl Debug for NetworkPrefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.prefix)
    }
}

impl FromStr for NetworkPrefix {
    type Err = ipnet::AddrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(NetworkPrefix::new(Ipv4Net::from_str(s)?))
    }
}

impl From<Ipv4Net> for NetworkPrefix {
    fn from(prefix: Ipv4Net) -> Self {
        NetworkPrefix::new(prefix)
    }
}

impl NetworkPrefix {
    pub fn new(prefix: Ipv4Net) -> NetworkPrefix {
        NetworkPrefix {
            prefix: prefix.trunc(),
        }
    }

    pub fn addr(&self) -> Ipv4Addr {
        self.prefix.addr()
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix.prefix_len()
    }

    /// Number of octets the prefix takes on the wire, including the length octet.
    pub fn encoded_len(&self) -> usize {
        1 + (self.prefix_len() as usize).div_ceil(8)
    }

    /// Writes the prefix in its minimal wire form.
    ///
    /// # Example
    ///
    /// ```rust
    /// use std::str::FromStr;
    /// use bytes::BytesMut;
    /// use bgpkit_codec::models::NetworkPrefix;
    ///
    /// let prefix = NetworkPrefix::from_str("192.168.0.0/24").unwrap();
    /// let mut buf = BytesMut::new();
    /// prefix.encode_to(&mut buf);
    ///
    /// assert_eq!(buf.as_ref(), &[24, 192, 168, 0]);
    /// ```
    pub fn encode_to<B: BufMut>(&self, buf: &mut B) {
        let bit_len = self.prefix_len();
        let byte_len = (bit_len as usize).div_ceil(8);
        buf.put_u8(bit_len);
        // trunc() keeps host bits at zero even if the field was set directly
        let octets = self.prefix.trunc().addr().octets();
        buf.put_slice(&octets[..byte_len]);
    }
}

impl Display for NetworkPrefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;

    #[test]
    fn test_fromstr_masks_host_bits() {
        let prefix = NetworkPrefix::from_str("10.0.1.0/23").unwrap();
        assert_eq!(prefix.to_string(), "10.0.0.0/23");
        assert_eq!(prefix.prefix_len(), 23);
    }

    #[test]
    fn test_encode() {
        let mut buf = BytesMut::new();
        NetworkPrefix::from_str("180.128.0.0/15")
            .unwrap()
            .encode_to(&mut buf);
        assert_eq!(buf.as_ref(), &[15, 180, 128]);

        let mut buf = BytesMut::new();
        NetworkPrefix::from_str("0.0.0.0/0").unwrap().encode_to(&mut buf);
        assert_eq!(buf.as_ref(), &[0]);

        let mut buf = BytesMut::new();
        NetworkPrefix::from_str("192.0.2.1/32")
            .unwrap()
            .encode_to(&mut buf);
        assert_eq!(buf.as_ref(), &[32, 192, 0, 2, 1]);
    }

    #[test]
    fn test_encode_ignores_unmasked_field() {
        // set the field directly, bypassing new()
        let prefix = NetworkPrefix {
            prefix: Ipv4Net::new(Ipv4Addr::new(10, 0, 1, 255), 23).unwrap(),
        };
        let mut buf = BytesMut::new();
        prefix.encode_to(&mut buf);
        assert_eq!(buf.as_ref(), &[23, 10, 0, 0]);
    }

    #[test]
    fn test_encoded_len() {
        assert_eq!(
            NetworkPrefix::from_str("10.0.0.0/8").unwrap().encoded_len(),
            2
        );
        assert_eq!(
            NetworkPrefix::from_str("10.0.0.0/9").unwrap().encoded_len(),
            3
        );
    }
}
