use crate::models::*;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::net::Ipv4Addr;

use crate::error::ParserError;
use crate::parser::{
    encode_attributes, encode_nlri_prefixes, parse_attributes, parse_nlri_list, ReadUtils,
};
use log::{debug, warn};

/// Smallest valid total length of each message type.
const fn min_message_length(msg_type: BgpMessageType) -> usize {
    match msg_type {
        BgpMessageType::OPEN => 29,
        BgpMessageType::UPDATE => 23,
        BgpMessageType::NOTIFICATION => 21,
        BgpMessageType::KEEPALIVE => 19,
    }
}

fn bad_message_length(length: u16, reason: String) -> ParserError {
    ParserError::new(
        MessageHeaderError::BAD_MESSAGE_LENGTH,
        length.to_be_bytes().to_vec(),
        reason,
    )
}

fn check_message_length(length: u16) -> Result<(), ParserError> {
    if !(BGP_HEADER_LEN..=BGP_MAX_MESSAGE_LEN).contains(&(length as usize)) {
        return Err(bad_message_length(
            length,
            format!("invalid BGP message length {}", length),
        ));
    }
    Ok(())
}

/// Total length of the message at the front of `data`.
///
/// Returns `Ok(None)` while fewer than 19 bytes (one header) are available, so a transport can
/// keep buffering. Once the header is available the length field is validated, and the caller
/// should wait for that many bytes before calling [parse_bgp_message].
pub fn bgp_message_length(data: &[u8]) -> Result<Option<usize>, ParserError> {
    let Some(header) = data.get(..BGP_HEADER_LEN) else {
        return Ok(None);
    };
    let length = u16::from_be_bytes([header[16], header[17]]);
    check_message_length(length)?;
    Ok(Some(length as usize))
}

/// BGP message
///
/// Format:
/// ```text
/// 0                   1                   2                   3
/// 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                                                               |
/// +                                                               +
/// |                                                               |
/// +                                                               +
/// |                           Marker                              |
/// +                                                               +
/// |                                                               |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |          Length               |      Type     |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// Parses exactly one message from the front of `data`. On success `data` is advanced past the
/// message; on error it is left untouched. A buffer holding less than the full message yields an
/// unclassified [ParserError::NotEnoughBytes].
pub fn parse_bgp_message(data: &mut Bytes, ctx: &BgpContext) -> Result<BgpMessage, ParserError> {
    let mut input = data.clone();
    input.has_n_remaining(BGP_HEADER_LEN)?;

    let marker = input.split_to(16);
    if ctx.check_marker && marker[..] != BGP_MARKER[..] {
        warn!("BGP message marker is not all ones");
        return Err(ParserError::new(
            MessageHeaderError::CONNECTION_NOT_SYNCHRONIZED,
            vec![],
            "BGP message marker is not all ones",
        ));
    }

    /*
    This 2-octet unsigned integer indicates the total length of the
    message, including the header in octets.  Thus, it allows one
    to locate the (Marker field of the) next message in the TCP
    stream.  The value of the Length field MUST always be at least
    19 and no greater than 4096, and MAY be further constrained,
    depending on the message type.  "padding" of extra data after
    the message is not allowed.  Therefore, the Length field MUST
    have the smallest value required, given the rest of the
    message.
    */
    let length = input.get_u16();
    check_message_length(length)?;

    let type_code = input.get_u8();
    let msg_type = BgpMessageType::try_from(type_code).map_err(|_| {
        warn!("unknown BGP message type {}", type_code);
        ParserError::new(
            MessageHeaderError::BAD_MESSAGE_TYPE,
            vec![type_code],
            format!("unknown BGP message type {}", type_code),
        )
    })?;

    let min_length = min_message_length(msg_type);
    let too_short = (length as usize) < min_length;
    if too_short || (msg_type == BgpMessageType::KEEPALIVE && length as usize != min_length) {
        return Err(bad_message_length(
            length,
            format!("invalid length {} for {:?} message", length, msg_type),
        ));
    }

    let body_length = length as usize - BGP_HEADER_LEN;
    input.has_n_remaining(body_length)?;
    let body = input.split_to(body_length);
    debug!("parsing {:?} message, {} bytes", msg_type, length);

    let msg = match msg_type {
        BgpMessageType::OPEN => BgpMessage::Open(parse_bgp_open_message(body)?),
        BgpMessageType::UPDATE => {
            BgpMessage::Update(parse_bgp_update_message(body, ctx.asn_len)?)
        }
        BgpMessageType::NOTIFICATION => {
            BgpMessage::Notification(parse_bgp_notification_message(body)?)
        }
        BgpMessageType::KEEPALIVE => BgpMessage::KeepAlive(BgpKeepAliveMessage {}),
    };

    data.advance(length as usize);
    Ok(msg)
}

/// Parse BGP NOTIFICATION message.
///
/// The error code and subcode are parsed into [BgpError]; unassigned codes are kept as
/// `Unknown` variants rather than failing.
pub fn parse_bgp_notification_message(
    mut input: Bytes,
) -> Result<BgpNotificationMessage, ParserError> {
    input
        .has_n_remaining(2)
        .map_err(|e| e.within(MessageHeaderError::BAD_MESSAGE_LENGTH))?;
    let error_code = input.get_u8();
    let error_subcode = input.get_u8();

    Ok(BgpNotificationMessage {
        error: BgpError::new(error_code, error_subcode),
        data: input.to_vec(),
    })
}

impl BgpNotificationMessage {
    pub fn encode(&self) -> Bytes {
        let (error_code, error_subcode) = self.error.codes();
        let mut buf = BytesMut::with_capacity(2 + self.data.len());
        buf.put_u8(error_code);
        buf.put_u8(error_subcode);
        buf.put_slice(&self.data);
        buf.freeze()
    }
}

/// Parse BGP OPEN message.
///
/// Optional parameters are kept as opaque `(type, value)` pairs, in both the RFC 4271 form and
/// the RFC 9072 extended form. The fixed fields are checked with [BgpOpenMessage::validate].
pub fn parse_bgp_open_message(mut input: Bytes) -> Result<BgpOpenMessage, ParserError> {
    input
        .has_n_remaining(10)
        .map_err(|e| e.within(MessageHeaderError::BAD_MESSAGE_LENGTH))?;
    let version = input.get_u8();
    let asn = Asn::new_16bit(input.get_u16());
    let hold_time = input.get_u16();
    let bgp_identifier = input.read_ipv4_address()?;
    let opt_params_len = input.get_u8();

    let (extended_length, opt_params) =
        parse_opt_params(input, opt_params_len).map_err(|e| e.within(OpenError::UNSPECIFIC))?;

    let msg = BgpOpenMessage {
        version,
        asn,
        hold_time,
        bgp_identifier,
        extended_length,
        opt_params,
    };
    msg.validate()?;
    Ok(msg)
}

/// RFC 9072: an Opt Parm Len of 255 followed by a parameter type of 255 announces the extended
/// encoding, with a 2-octet total length and 2-octet parameter lengths.
fn parse_opt_params(
    mut input: Bytes,
    opt_params_len: u8,
) -> Result<(bool, Vec<OptParam>), ParserError> {
    let extended_length = opt_params_len == 255 && input.first() == Some(&255);
    let params_len = if extended_length {
        input.advance(1);
        input.read_u16()? as usize
    } else {
        opt_params_len as usize
    };

    if input.remaining() != params_len {
        warn!(
            "BGP open message optional parameters length {} does not match the actual length {}",
            params_len,
            input.remaining()
        );
        return Err(ParserError::new(
            OpenError::UNSPECIFIC,
            vec![],
            format!(
                "optional parameters length {} does not match {} remaining bytes",
                params_len,
                input.remaining()
            ),
        ));
    }

    let mut params: Vec<OptParam> = vec![];
    while input.remaining() > 0 {
        let param_type = input.read_u8()?;
        let param_len = match extended_length {
            true => input.read_u16()? as usize,
            false => input.read_u8()? as usize,
        };
        // https://www.iana.org/assignments/bgp-parameters/bgp-parameters.xhtml#bgp-parameters-11
        let value = input.read_n_bytes(param_len)?;
        params.push(OptParam { param_type, value });
    }

    Ok((extended_length, params))
}

fn is_valid_bgp_identifier(addr: &Ipv4Addr) -> bool {
    !(addr.is_unspecified() || addr.is_broadcast() || addr.is_multicast())
}

impl BgpOpenMessage {
    /// Checks the fixed fields of the message against RFC 4271 section 6.2.
    pub fn validate(&self) -> Result<(), ParserError> {
        if self.version != BGP_VERSION {
            return Err(ParserError::new(
                OpenError::UNSUPPORTED_VERSION_NUMBER,
                (BGP_VERSION as u16).to_be_bytes().to_vec(),
                format!("unsupported BGP version {}", self.version),
            ));
        }
        if self.asn.asn == 0 {
            return Err(ParserError::new(
                OpenError::BAD_PEER_AS,
                vec![],
                "peer AS 0",
            ));
        }
        if matches!(self.hold_time, 1 | 2) {
            return Err(ParserError::new(
                OpenError::UNACCEPTABLE_HOLD_TIME,
                vec![],
                format!("hold time {} must be 0 or at least 3", self.hold_time),
            ));
        }
        if !is_valid_bgp_identifier(&self.bgp_identifier) {
            return Err(ParserError::new(
                OpenError::BAD_BGP_IDENTIFIER,
                vec![],
                format!("invalid BGP identifier {}", self.bgp_identifier),
            ));
        }
        Ok(())
    }

    /// Rejects optional parameters other than capabilities.
    ///
    /// Not applied when decoding: which parameters are acceptable is up to the session.
    pub fn validate_optional_parameters(&self) -> Result<(), ParserError> {
        match self.opt_params.iter().find(|p| !p.is_capabilities()) {
            Some(param) => Err(ParserError::new(
                OpenError::UNSUPPORTED_OPTIONAL_PARAMETER,
                vec![],
                format!("unsupported optional parameter type {}", param.param_type),
            )),
            None => Ok(()),
        }
    }

    /// Encode the message body.
    ///
    /// The AS field is always 2 octets. On a session with 4-octet AS numbers a larger AS is
    /// written as `AS_TRANS`; otherwise it is an error.
    pub fn encode(&self, ctx: &BgpContext) -> Result<Bytes, ParserError> {
        let my_as = match (self.asn.fits_16bit(), ctx.asn_len) {
            (true, _) => self.asn.asn as u16,
            (false, AsnLength::Bits32) => AS_TRANS as u16,
            (false, AsnLength::Bits16) => {
                return Err(ParserError::new(
                    OpenError::BAD_PEER_AS,
                    vec![],
                    format!("AS {} does not fit in the 2-octet OPEN field", self.asn),
                ))
            }
        };

        let mut params = BytesMut::new();
        for param in &self.opt_params {
            params.put_u8(param.param_type);
            let len = param.value.len();
            match self.extended_length {
                true => params.put_u16(u16::try_from(len).map_err(|_| param_too_long(len))?),
                false => params.put_u8(u8::try_from(len).map_err(|_| param_too_long(len))?),
            }
            params.put_slice(&param.value);
        }

        let mut buf = BytesMut::with_capacity(10 + 3 + params.len());
        buf.put_u8(self.version);
        buf.put_u16(my_as);
        buf.put_u16(self.hold_time);
        buf.put_slice(&self.bgp_identifier.octets());
        if self.extended_length {
            let len = params.len();
            buf.put_u8(255);
            buf.put_u8(255);
            buf.put_u16(u16::try_from(len).map_err(|_| param_too_long(len))?);
        } else {
            let len = params.len();
            buf.put_u8(u8::try_from(len).map_err(|_| param_too_long(len))?);
        }
        buf.put_slice(&params);
        Ok(buf.freeze())
    }
}

fn param_too_long(len: usize) -> ParserError {
    ParserError::new(
        MessageHeaderError::BAD_MESSAGE_LENGTH,
        vec![],
        format!("optional parameters of {} bytes do not fit the length field", len),
    )
}

/// read bgp update message.
///
/// RFC: https://tools.ietf.org/html/rfc4271#section-4.3
///
/// Length fields running past the body make the attribute list malformed; prefixes that cannot
/// be read from the withdrawn routes or NLRI fields are an invalid network field.
pub fn parse_bgp_update_message(
    mut input: Bytes,
    asn_len: AsnLength,
) -> Result<BgpUpdateMessage, ParserError> {
    let (withdrawn_bytes, attr_data) = split_update_sections(&mut input)
        .map_err(|e| e.within(UpdateError::MALFORMED_ATTRIBUTE_LIST))?;

    // AFI for routes out side attributes are IPv4 ONLY.
    let withdrawn_prefixes = parse_nlri_list(withdrawn_bytes)
        .map_err(|e| e.reclassify(UpdateError::INVALID_NETWORK_FIELD))?;

    let attributes = parse_attributes(attr_data, asn_len)?;

    // the remaining bytes are announced prefixes.
    let announced_prefixes =
        parse_nlri_list(input).map_err(|e| e.reclassify(UpdateError::INVALID_NETWORK_FIELD))?;

    if !announced_prefixes.is_empty() {
        validate_well_known_mandatory_attributes(&attributes)?;
    }

    Ok(BgpUpdateMessage {
        withdrawn_prefixes,
        attributes,
        announced_prefixes,
    })
}

/// Splits off the withdrawn routes and path attributes sections, leaving the NLRI in `input`.
fn split_update_sections(input: &mut Bytes) -> Result<(Bytes, Bytes), ParserError> {
    let withdrawn_bytes_length = input.read_u16()? as usize;
    input.has_n_remaining(withdrawn_bytes_length)?;
    let withdrawn_bytes = input.split_to(withdrawn_bytes_length);

    let attribute_length = input.read_u16()? as usize;
    input.has_n_remaining(attribute_length)?;
    let attr_data = input.split_to(attribute_length);
    Ok((withdrawn_bytes, attr_data))
}

/// RFC 4271 section 5: well-known mandatory attributes MUST be included in every UPDATE message
/// that contains NLRI.
fn validate_well_known_mandatory_attributes(attributes: &Attributes) -> Result<(), ParserError> {
    for attr_type in [AttrType::ORIGIN, AttrType::AS_PATH, AttrType::NEXT_HOP] {
        if !attributes.has_attr(attr_type) {
            warn!("UPDATE with NLRI is missing {:?}", attr_type);
            return Err(ParserError::new(
                UpdateError::MISSING_WELL_KNOWN_ATTRIBUTE,
                vec![attr_type.into()],
                format!("missing well-known attribute {:?}", attr_type),
            ));
        }
    }
    Ok(())
}

impl BgpUpdateMessage {
    pub fn encode(&self, asn_len: AsnLength) -> Result<Bytes, ParserError> {
        let withdrawn_bytes = encode_nlri_prefixes(&self.withdrawn_prefixes);
        let attr_bytes = encode_attributes(&self.attributes, asn_len)?;
        let announced_bytes = encode_nlri_prefixes(&self.announced_prefixes);

        let section_length = |len: usize| {
            u16::try_from(len).map_err(|_| {
                ParserError::new(
                    MessageHeaderError::BAD_MESSAGE_LENGTH,
                    vec![],
                    format!("UPDATE section of {} bytes is too long", len),
                )
            })
        };

        let mut bytes = BytesMut::with_capacity(
            4 + withdrawn_bytes.len() + attr_bytes.len() + announced_bytes.len(),
        );
        // withdrawn prefixes
        bytes.put_u16(section_length(withdrawn_bytes.len())?);
        bytes.put_slice(&withdrawn_bytes);
        // attributes
        bytes.put_u16(section_length(attr_bytes.len())?);
        bytes.put_slice(&attr_bytes);
        // announced prefixes
        bytes.put_slice(&announced_bytes);
        Ok(bytes.freeze())
    }
}

impl BgpMessage {
    /// Parse one complete message. Bytes after the message are an error.
    pub fn from_bytes(data: &[u8], ctx: &BgpContext) -> Result<BgpMessage, ParserError> {
        let mut bytes = Bytes::copy_from_slice(data);
        let msg = parse_bgp_message(&mut bytes, ctx)
            .map_err(|e| e.within(MessageHeaderError::BAD_MESSAGE_LENGTH))?;
        if !bytes.is_empty() {
            return Err(ParserError::new(
                MessageHeaderError::BAD_MESSAGE_LENGTH,
                data.get(16..18).map(<[u8]>::to_vec).unwrap_or_default(),
                format!("{} bytes after the end of the message", bytes.len()),
            ));
        }
        Ok(msg)
    }

    /// Encode the message with its header.
    pub fn encode(&self, ctx: &BgpContext) -> Result<Bytes, ParserError> {
        let msg_bytes = match self {
            BgpMessage::Open(msg) => msg.encode(ctx)?,
            BgpMessage::Update(msg) => msg.encode(ctx.asn_len)?,
            BgpMessage::Notification(msg) => msg.encode(),
            BgpMessage::KeepAlive(_) => Bytes::new(),
        };

        // msg total bytes length = msg bytes + 16 bytes marker + 2 bytes length + 1 byte type
        let length = msg_bytes.len() + BGP_HEADER_LEN;
        if length > BGP_MAX_MESSAGE_LEN {
            return Err(ParserError::new(
                MessageHeaderError::BAD_MESSAGE_LENGTH,
                vec![],
                format!("message of {} bytes exceeds {}", length, BGP_MAX_MESSAGE_LEN),
            ));
        }

        let mut bytes = BytesMut::with_capacity(length);
        bytes.put_slice(&BGP_MARKER);
        bytes.put_u16(length as u16);
        bytes.put_u8(self.msg_type().into());
        bytes.put_slice(&msg_bytes);
        Ok(bytes.freeze())
    }
}
