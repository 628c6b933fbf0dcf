use crate::models::*;
use crate::parser::ReadUtils;
use crate::ParserError;
use bytes::Bytes;

pub fn parse_med(mut input: Bytes) -> Result<AttributeValue, ParserError> {
    input.expect_remaining_eq(4, "MULTI_EXIT_DISCRIMINATOR")?;
    Ok(AttributeValue::MultiExitDiscriminator(input.read_u32()?))
}

pub fn encode_med(med: u32) -> Bytes {
    Bytes::from(med.to_be_bytes().to_vec())
}
