use crate::models::*;
use crate::parser::ReadUtils;
use crate::ParserError;
use bytes::Bytes;
use std::net::Ipv4Addr;

/// Parse the NEXT_HOP attribute.
///
/// The value must be exactly one IPv4 address; any other length makes the attribute list
/// malformed. Addresses that can never be a next hop (unspecified, broadcast, multicast) are
/// rejected as `INVALID_NEXT_HOP_ATTRIBUTE`.
pub fn parse_next_hop(mut input: Bytes) -> Result<AttributeValue, ParserError> {
    if input.len() != 4 {
        return Err(ParserError::new(
            UpdateError::MALFORMED_ATTRIBUTE_LIST,
            vec![],
            format!("NEXT_HOP must be 4 bytes, got {}", input.len()),
        ));
    }
    let addr = input.read_ipv4_address()?;
    if !is_valid_next_hop(&addr) {
        return Err(ParserError::new(
            UpdateError::INVALID_NEXT_HOP_ATTRIBUTE,
            vec![],
            format!("invalid next hop address {}", addr),
        ));
    }
    Ok(AttributeValue::NextHop(addr))
}

fn is_valid_next_hop(addr: &Ipv4Addr) -> bool {
    !(addr.is_unspecified() || addr.is_broadcast() || addr.is_multicast())
}

pub fn encode_next_hop(addr: &Ipv4Addr) -> Bytes {
    Bytes::from(addr.octets().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_next_hop() {
        assert_eq!(
            parse_next_hop(Bytes::from_static(&[10, 0, 0, 1])).unwrap(),
            AttributeValue::NextHop(Ipv4Addr::new(10, 0, 0, 1))
        );
    }

    #[test]
    fn test_parse_next_hop_wrong_length() {
        let cases: [&[u8]; 3] = [&[10, 0, 0], &[10, 0, 0, 1, 0], &[]];
        for data in cases {
            let err = parse_next_hop(Bytes::copy_from_slice(data)).unwrap_err();
            assert_eq!(
                err.bgp_error(),
                BgpError::UpdateError(UpdateError::MALFORMED_ATTRIBUTE_LIST)
            );
        }
    }

    #[test]
    fn test_parse_next_hop_invalid_address() {
        for data in [[0u8, 0, 0, 0], [255, 255, 255, 255], [224, 0, 0, 5]] {
            let err = parse_next_hop(Bytes::copy_from_slice(&data)).unwrap_err();
            assert_eq!(
                err.bgp_error(),
                BgpError::UpdateError(UpdateError::INVALID_NEXT_HOP_ATTRIBUTE)
            );
        }
    }

    #[test]
    fn test_encode_next_hop() {
        assert_eq!(
            encode_next_hop(&Ipv4Addr::new(192, 0, 2, 1)),
            Bytes::from_static(&[192, 0, 2, 1])
        );
    }
}
