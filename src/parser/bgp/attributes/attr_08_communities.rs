use crate::models::*;
use crate::parser::ReadUtils;
use crate::ParserError;
use bytes::{Buf, BufMut, Bytes, BytesMut};

pub fn parse_regular_communities(mut input: Bytes) -> Result<AttributeValue, ParserError> {
    if input.len() % 4 != 0 {
        return Err(ParserError::new(
            UpdateError::OPTIONAL_ATTRIBUTE_ERROR,
            vec![],
            format!("COMMUNITIES length {} is not a multiple of 4", input.len()),
        ));
    }

    let mut communities = Vec::with_capacity(input.len() / 4);
    while input.remaining() > 0 {
        communities.push(Community::from(input.read_u32()?));
    }

    Ok(AttributeValue::Communities(communities))
}

pub fn encode_regular_communities(communities: &[Community]) -> Result<Bytes, ParserError> {
    let mut bytes = BytesMut::with_capacity(communities.len() * 4);
    for community in communities {
        bytes.put_u32(u32::try_from(*community)?);
    }
    Ok(bytes.freeze())
}
