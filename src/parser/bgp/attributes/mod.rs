//! Path attribute codec: the TLV list carried in UPDATE messages.
mod attr_01_origin;
mod attr_02_as_path;
mod attr_03_next_hop;
mod attr_04_med;
mod attr_05_local_pref;
mod attr_06_atomic_aggregate;
mod attr_07_aggregator;
mod attr_08_communities;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use log::{debug, warn};

use crate::error::ParserError;
use crate::models::*;
use crate::parser::ReadUtils;

use attr_01_origin::{encode_origin, parse_origin};
use attr_02_as_path::{encode_as_path, parse_as_path};
use attr_03_next_hop::{encode_next_hop, parse_next_hop};
use attr_04_med::{encode_med, parse_med};
use attr_05_local_pref::{encode_local_pref, parse_local_pref};
use attr_06_atomic_aggregate::parse_atomic_aggregate;
use attr_07_aggregator::{encode_aggregator, parse_aggregator};
use attr_08_communities::{encode_regular_communities, parse_regular_communities};

/// Parse BGP attributes.
///
/// `data` contains the entirety of the attributes bytes, therefore its size is the total byte
/// length of the attributes section of the message. Each attribute is checked against RFC 4271
/// section 6.3 and the first violation is returned:
///
/// - a truncated attribute header or a length running past the section: `MALFORMED_ATTRIBUTE_LIST`
/// - a repeated attribute type: `MALFORMED_ATTRIBUTE_LIST`
/// - Optional/Transitive bits not matching the type, or Partial set on a well-known attribute:
///   `ATTRIBUTE_FLAGS_ERROR`
/// - an unrecognized attribute without the Optional bit: `UNRECOGNIZED_WELL_KNOWN_ATTRIBUTE`
/// - value errors as reported by the per-type parsers
///
/// Unrecognized optional attributes are kept as [AttributeValue::Unknown].
pub fn parse_attributes(mut data: Bytes, asn_len: AsnLength) -> Result<Attributes, ParserError> {
    let mut attributes = Attributes::new();

    while data.remaining() > 0 {
        let attr_start = data.clone();
        let (flag, type_code, length) = read_attribute_header(&mut data).map_err(|e| {
            warn!("truncated path attribute: {}", e);
            e.within(UpdateError::MALFORMED_ATTRIBUTE_LIST)
        })?;

        let header_len = attr_start.len() - data.len();
        // the whole attribute, used as NOTIFICATION data
        let attr_bytes = attr_start.slice(..header_len + length);
        let attr_data = data.split_to(length);
        let attr_type = AttrType::from(type_code);

        debug!(
            "reading attribute: type -- {:?}, length -- {}",
            &attr_type, length
        );

        if attributes.has_attr(attr_type) {
            warn!("duplicate attribute type {:?}", attr_type);
            return Err(ParserError::new(
                UpdateError::MALFORMED_ATTRIBUTE_LIST,
                vec![],
                format!("attribute type {} appears more than once", type_code),
            ));
        }

        validate_attribute_flags(attr_type, flag, &attr_bytes)?;

        let value = match attr_type {
            AttrType::ORIGIN => parse_origin(attr_data),
            AttrType::AS_PATH => parse_as_path(attr_data, asn_len),
            AttrType::NEXT_HOP => parse_next_hop(attr_data),
            AttrType::MULTI_EXIT_DISCRIMINATOR => parse_med(attr_data),
            AttrType::LOCAL_PREFERENCE => parse_local_pref(attr_data),
            AttrType::ATOMIC_AGGREGATE => parse_atomic_aggregate(attr_data),
            AttrType::AGGREGATOR => parse_aggregator(attr_data, asn_len),
            AttrType::COMMUNITIES => parse_regular_communities(attr_data),
            AttrType::Unknown(code) => {
                if !flag.contains(AttrFlags::OPTIONAL) {
                    Err(ParserError::new(
                        UpdateError::UNRECOGNIZED_WELL_KNOWN_ATTRIBUTE,
                        vec![],
                        format!("unrecognized well-known attribute type {}", code),
                    ))
                } else {
                    debug!("keeping unrecognized optional attribute type {}", code);
                    Ok(AttributeValue::Unknown(AttrRaw {
                        attr_type: code,
                        bytes: attr_data.to_vec(),
                    }))
                }
            }
        }
        .map_err(|e| {
            warn!("invalid {:?} attribute: {}", attr_type, e);
            with_attribute_data(e, &attr_bytes)
        })?;

        attributes.push(Attribute { value, flag });
    }

    Ok(attributes)
}

/// Reads flags, type and length, and checks the value is fully present.
fn read_attribute_header(data: &mut Bytes) -> Result<(AttrFlags, u8, usize), ParserError> {
    let flag = AttrFlags::from_bits_retain(data.read_u8()?);
    let type_code = data.read_u8()?;
    let length = match flag.contains(AttrFlags::EXTENDED) {
        false => data.read_u8()? as usize,
        true => data.read_u16()? as usize,
    };
    data.has_n_remaining(length)?;
    Ok((flag, type_code, length))
}

/// Optional and Transitive bits must match the attribute category, and well-known attributes must
/// not be marked Partial. Unrecognized types are not checked here.
fn validate_attribute_flags(
    attr_type: AttrType,
    flag: AttrFlags,
    attr_bytes: &Bytes,
) -> Result<(), ParserError> {
    let Some(expected) = attr_type.expected_flags() else {
        return Ok(());
    };

    let category_bits = flag & (AttrFlags::OPTIONAL | AttrFlags::TRANSITIVE);
    if category_bits != expected
        || (attr_type.is_well_known() && flag.contains(AttrFlags::PARTIAL))
    {
        warn!(
            "attribute {:?} has flags {:?}, expected {:?}",
            attr_type, flag, expected
        );
        return Err(ParserError::new(
            UpdateError::ATTRIBUTE_FLAGS_ERROR,
            attr_bytes.to_vec(),
            format!("invalid flags {:#04x} for {:?}", flag.bits(), attr_type),
        ));
    }
    Ok(())
}

/// Errors that carry the erroneous attribute as NOTIFICATION data (RFC 4271 section 6.3).
fn with_attribute_data(e: ParserError, attr_bytes: &Bytes) -> ParserError {
    match e {
        ParserError::Bgp {
            error:
                error @ BgpError::UpdateError(
                    UpdateError::UNRECOGNIZED_WELL_KNOWN_ATTRIBUTE
                    | UpdateError::ATTRIBUTE_LENGTH_ERROR
                    | UpdateError::INVALID_ORIGIN_ATTRIBUTE
                    | UpdateError::INVALID_NEXT_HOP_ATTRIBUTE
                    | UpdateError::OPTIONAL_ATTRIBUTE_ERROR,
                ),
            data,
            reason,
        } if data.is_empty() => ParserError::Bgp {
            error,
            data: attr_bytes.to_vec(),
            reason,
        },
        e => e,
    }
}

impl Attribute {
    /// Encode the attribute as a TLV.
    ///
    /// The extended length form is used when the Extended bit is set in `flag` or when the value
    /// does not fit a 1-octet length. An [AttributeValue::Unknown] may only carry a type code
    /// this crate does not decode.
    pub fn encode(&self, asn_len: AsnLength) -> Result<Bytes, ParserError> {
        let value = match &self.value {
            AttributeValue::Origin(v) => encode_origin(v),
            AttributeValue::AsPath(v) => encode_as_path(v, asn_len)?,
            AttributeValue::NextHop(v) => encode_next_hop(v),
            AttributeValue::MultiExitDiscriminator(v) => encode_med(*v),
            AttributeValue::LocalPreference(v) => encode_local_pref(*v),
            AttributeValue::AtomicAggregate => Bytes::new(),
            AttributeValue::Aggregator { asn, id } => encode_aggregator(asn, id, asn_len)?,
            AttributeValue::Communities(v) => encode_regular_communities(v)?,
            AttributeValue::Unknown(raw) => {
                // a raw value under a recognized code would decode as that attribute
                if !matches!(AttrType::from(raw.attr_type), AttrType::Unknown(_)) {
                    return Err(ParserError::new(
                        UpdateError::MALFORMED_ATTRIBUTE_LIST,
                        vec![],
                        format!(
                            "raw value for recognized attribute {:?}",
                            AttrType::from(raw.attr_type)
                        ),
                    ));
                }
                Bytes::from(raw.bytes.clone())
            }
        };

        let mut flag = self.flag;
        if value.len() > u8::MAX as usize {
            flag |= AttrFlags::EXTENDED;
        }
        let length = u16::try_from(value.len()).map_err(|_| {
            ParserError::new(
                MessageHeaderError::BAD_MESSAGE_LENGTH,
                vec![],
                format!("attribute value of {} bytes is too long", value.len()),
            )
        })?;

        let mut bytes = BytesMut::with_capacity(value.len() + 4);
        bytes.put_u8(flag.bits());
        bytes.put_u8(self.attr_type().into());
        if flag.contains(AttrFlags::EXTENDED) {
            bytes.put_u16(length);
        } else {
            bytes.put_u8(length as u8);
        }
        bytes.put_slice(&value);
        Ok(bytes.freeze())
    }
}

/// Encode a whole attribute list, in order.
pub fn encode_attributes(
    attributes: &Attributes,
    asn_len: AsnLength,
) -> Result<Bytes, ParserError> {
    let mut bytes = BytesMut::new();
    for attribute in attributes {
        bytes.put_slice(&attribute.encode(asn_len)?);
    }
    Ok(bytes.freeze())
}
