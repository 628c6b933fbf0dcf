use crate::models::*;
use crate::parser::ReadUtils;
use crate::ParserError;
use bytes::Bytes;

pub fn parse_atomic_aggregate(input: Bytes) -> Result<AttributeValue, ParserError> {
    input.expect_remaining_eq(0, "ATOMIC_AGGREGATE")?;
    Ok(AttributeValue::AtomicAggregate)
}
