use crate::models::*;
use crate::parser::{write_asn, ReadUtils};
use crate::ParserError;
use bytes::{BufMut, Bytes, BytesMut};
use std::net::Ipv4Addr;

/// Parse the AGGREGATOR attribute: the AS number of the aggregating speaker, in the session's AS
/// width, followed by its BGP identifier.
pub fn parse_aggregator(
    mut input: Bytes,
    asn_len: AsnLength,
) -> Result<AttributeValue, ParserError> {
    input.expect_remaining_eq(asn_len.octets() + 4, "AGGREGATOR")?;
    let asn = input.read_asn(asn_len)?;
    let id = input.read_ipv4_address()?;
    Ok(AttributeValue::Aggregator { asn, id })
}

pub fn encode_aggregator(
    asn: &Asn,
    id: &Ipv4Addr,
    asn_len: AsnLength,
) -> Result<Bytes, ParserError> {
    if asn_len == AsnLength::Bits16 && !asn.fits_16bit() {
        return Err(ParserError::new(
            UpdateError::OPTIONAL_ATTRIBUTE_ERROR,
            vec![],
            format!("aggregator AS {} does not fit in 2 octets", asn),
        ));
    }
    let mut bytes = BytesMut::with_capacity(asn_len.octets() + 4);
    write_asn(asn, asn_len, &mut bytes);
    bytes.put_slice(&id.octets());
    Ok(bytes.freeze())
}
