use crate::models::*;
use crate::parser::ReadUtils;
use crate::ParserError;
use bytes::Bytes;

pub fn parse_origin(mut input: Bytes) -> Result<AttributeValue, ParserError> {
    input.expect_remaining_eq(1, "ORIGIN")?;
    let origin = input.read_u8()?;
    match Origin::try_from(origin) {
        Ok(v) => Ok(AttributeValue::Origin(v)),
        Err(_) => Err(ParserError::new(
            UpdateError::INVALID_ORIGIN_ATTRIBUTE,
            vec![],
            format!("invalid origin value {}", origin),
        )),
    }
}

pub fn encode_origin(origin: &Origin) -> Bytes {
    Bytes::from(vec![u8::from(*origin)])
}
