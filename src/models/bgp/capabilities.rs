//! BGP capabilities advertised in the OPEN message, RFC 5492.
use crate::error::ParserError;
use crate::models::{Asn, AsnLength, MessageHeaderError};
use crate::parser::ReadUtils;
use bytes::{BufMut, Bytes, BytesMut};
use num_enum::{FromPrimitive, IntoPrimitive};

#[allow(non_camel_case_types)]
#[derive(Debug, FromPrimitive, IntoPrimitive, PartialEq, Eq, Hash, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum BgpCapabilityType {
    MULTIPROTOCOL_EXTENSIONS_FOR_BGP_4 = 1,
    ROUTE_REFRESH_CAPABILITY_FOR_BGP_4 = 2,
    OUTBOUND_ROUTE_FILTERING_CAPABILITY = 3,
    EXTENDED_NEXT_HOP_ENCODING = 5,
    BGP_EXTENDED_MESSAGE = 6,
    BGPSEC_CAPABILITY = 7,
    MULTIPLE_LABELS_CAPABILITY = 8,
    BGP_ROLE = 9,
    GRACEFUL_RESTART_CAPABILITY = 64,
    SUPPORT_FOR_4_OCTET_AS_NUMBER_CAPABILITY = 65,
    SUPPORT_FOR_DYNAMIC_CAPABILITY = 67,
    MULTISESSION_BGP_CAPABILITY = 68,
    ADD_PATH_CAPABILITY = 69,
    ENHANCED_ROUTE_REFRESH_CAPABILITY = 70,
    LONG_LIVED_GRACEFUL_RESTART_CAPABILITY = 71,
    ROUTING_POLICY_DISTRIBUTION = 72,
    FQDN_CAPABILITY = 73,

    /// Catch-all type for any deprecated, unassigned, or reserved codes
    #[num_enum(catch_all)]
    Unknown(u8),
}

/// One capability TLV. The value is kept opaque.
///
/// ```text
/// +------------------------------+
/// | Capability Code (1 octet)    |
/// +------------------------------+
/// | Capability Length (1 octet)  |
/// +------------------------------+
/// | Capability Value (variable)  |
/// ~                              ~
/// +------------------------------+
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Capability {
    pub code: u8,
    pub value: Vec<u8>,
}

impl Capability {
    pub fn new<T: Into<u8>>(code: T, value: Vec<u8>) -> Self {
        Capability {
            code: code.into(),
            value,
        }
    }

    /// Capability 65, announcing support for 4-octet AS numbers together with the speaker's AS.
    pub fn four_octet_as(asn: Asn) -> Self {
        Capability::new(
            BgpCapabilityType::SUPPORT_FOR_4_OCTET_AS_NUMBER_CAPABILITY,
            asn.asn.to_be_bytes().to_vec(),
        )
    }

    pub fn capability_type(&self) -> BgpCapabilityType {
        BgpCapabilityType::from(self.code)
    }

    /// Parses a list of capability TLVs, as found in the value of a capabilities optional
    /// parameter.
    pub fn parse_list(mut data: Bytes) -> Result<Vec<Capability>, ParserError> {
        let mut capabilities = vec![];
        while !data.is_empty() {
            let code = data.read_u8()?;
            let len = data.read_u8()?;
            let value = data.read_n_bytes(len as usize)?;
            capabilities.push(Capability { code, value });
        }
        Ok(capabilities)
    }

    pub fn encode_to(&self, buf: &mut BytesMut) -> Result<(), ParserError> {
        let len = u8::try_from(self.value.len()).map_err(|_| {
            ParserError::new(
                MessageHeaderError::BAD_MESSAGE_LENGTH,
                vec![],
                format!(
                    "capability {} value of {} bytes does not fit a 1-octet length",
                    self.code,
                    self.value.len()
                ),
            )
        })?;
        buf.put_u8(self.code);
        buf.put_u8(len);
        buf.put_slice(&self.value);
        Ok(())
    }

    /// The AS number carried by a 4-octet AS number capability.
    pub fn as_four_octet_asn(&self) -> Option<Asn> {
        if self.capability_type() != BgpCapabilityType::SUPPORT_FOR_4_OCTET_AS_NUMBER_CAPABILITY {
            return None;
        }
        let mut data = Bytes::copy_from_slice(&self.value);
        if data.len() != 4 {
            return None;
        }
        data.read_asn(AsnLength::Bits32).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsing_capability() {
        // reserved, deprecated and unassigned codes are all kept as Unknown
        let unknown_ranges = [0..=0, 4..=4, 10..=63, 74..=127, 132..=238, 255..=255];
        for code in <[_; 6]>::into_iter(unknown_ranges).flatten() {
            let ty = BgpCapabilityType::from(code);
            assert_eq!(ty, BgpCapabilityType::Unknown(code));
            assert_eq!(u8::from(ty), code);
        }

        assert_eq!(
            BgpCapabilityType::from(2),
            BgpCapabilityType::ROUTE_REFRESH_CAPABILITY_FOR_BGP_4
        );
        assert_eq!(
            BgpCapabilityType::from(65),
            BgpCapabilityType::SUPPORT_FOR_4_OCTET_AS_NUMBER_CAPABILITY
        );
    }

    #[test]
    fn test_parse_list() {
        // route refresh (empty value) followed by 4-octet AS 4200000001
        let data = Bytes::from_static(&[0x02, 0x00, 0x41, 0x04, 0xFA, 0x56, 0xEA, 0x01]);
        let caps = Capability::parse_list(data).unwrap();
        assert_eq!(caps.len(), 2);
        assert_eq!(
            caps[0].capability_type(),
            BgpCapabilityType::ROUTE_REFRESH_CAPABILITY_FOR_BGP_4
        );
        assert!(caps[0].value.is_empty());
        assert_eq!(caps[1].as_four_octet_asn(), Some(Asn::new_32bit(4200000001)));
        assert_eq!(caps[0].as_four_octet_asn(), None);
    }

    #[test]
    fn test_parse_list_truncated() {
        let data = Bytes::from_static(&[0x41, 0x04, 0x00, 0x01]);
        assert!(matches!(
            Capability::parse_list(data),
            Err(ParserError::NotEnoughBytes { .. })
        ));
    }

    #[test]
    fn test_encode() {
        let mut buf = BytesMut::new();
        Capability::four_octet_as(Asn::new_32bit(65536))
            .encode_to(&mut buf)
            .unwrap();
        assert_eq!(buf.as_ref(), &[0x41, 0x04, 0x00, 0x01, 0x00, 0x00]);

        let mut buf = BytesMut::new();
        assert!(Capability::new(73u8, vec![0; 256])
            .encode_to(&mut buf)
            .is_err());
    }

    #[test]
    #[cfg(feature = "serde")]
    fn test_serde() {
        let ty = BgpCapabilityType::MULTIPROTOCOL_EXTENSIONS_FOR_BGP_4;
        let serialized = serde_json::to_string(&ty).unwrap();
        let deserialized: BgpCapabilityType = serde_json::from_str(&serialized).unwrap();
        assert_eq!(ty, deserialized);
    }
}
