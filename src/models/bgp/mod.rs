//! BGP messages and relevant structs.

pub mod attributes;
pub mod capabilities;
pub mod community;
pub mod error;

pub use attributes::*;
pub use capabilities::*;
pub use community::*;
pub use error::*;

use crate::error::ParserError;
use crate::models::network::*;
use bytes::{Bytes, BytesMut};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use std::net::Ipv4Addr;

/// The only BGP version this codec speaks.
pub const BGP_VERSION: u8 = 4;
pub const BGP_MARKER: [u8; 16] = [0xFF; 16];
pub const BGP_HEADER_LEN: usize = 19;
pub const BGP_MAX_MESSAGE_LEN: usize = 4096;

/// Session parameters negotiated between two speakers that change how messages are read and
/// written.
///
/// The context is supplied by the caller on every call. The codec keeps no session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BgpContext {
    /// Width of AS numbers in AS_PATH and AGGREGATOR.
    pub asn_len: AsnLength,
    /// Reject messages whose marker is not all ones.
    pub check_marker: bool,
}

impl Default for BgpContext {
    fn default() -> Self {
        BgpContext {
            asn_len: AsnLength::Bits16,
            check_marker: true,
        }
    }
}

impl BgpContext {
    pub fn new(asn_len: AsnLength) -> Self {
        BgpContext {
            asn_len,
            ..Default::default()
        }
    }

    /// Context of a session that negotiated 4-octet AS numbers.
    pub fn four_octet_as() -> Self {
        BgpContext::new(AsnLength::Bits32)
    }
}

#[allow(non_camel_case_types)]
#[derive(Debug, TryFromPrimitive, IntoPrimitive, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum BgpMessageType {
    OPEN = 1,
    UPDATE = 2,
    NOTIFICATION = 3,
    KEEPALIVE = 4,
}

// https://tools.ietf.org/html/rfc4271#section-4
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BgpMessage {
    Open(BgpOpenMessage),
    Update(BgpUpdateMessage),
    Notification(BgpNotificationMessage),
    KeepAlive(BgpKeepAliveMessage),
}

impl BgpMessage {
    pub fn msg_type(&self) -> BgpMessageType {
        match self {
            BgpMessage::Open(_) => BgpMessageType::OPEN,
            BgpMessage::Update(_) => BgpMessageType::UPDATE,
            BgpMessage::Notification(_) => BgpMessageType::NOTIFICATION,
            BgpMessage::KeepAlive(_) => BgpMessageType::KEEPALIVE,
        }
    }
}

impl From<BgpOpenMessage> for BgpMessage {
    fn from(value: BgpOpenMessage) -> Self {
        BgpMessage::Open(value)
    }
}

impl From<BgpUpdateMessage> for BgpMessage {
    fn from(value: BgpUpdateMessage) -> Self {
        BgpMessage::Update(value)
    }
}

impl From<BgpNotificationMessage> for BgpMessage {
    fn from(value: BgpNotificationMessage) -> Self {
        BgpMessage::Notification(value)
    }
}

impl From<BgpKeepAliveMessage> for BgpMessage {
    fn from(value: BgpKeepAliveMessage) -> Self {
        BgpMessage::KeepAlive(value)
    }
}

/// BGP Open Message
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
///  +-+-+-+-+-+-+-+-+
///  |    Version    |
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  |     My Autonomous System      |
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  |           Hold Time           |
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  |                         BGP Identifier                        |
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  | Opt Parm Len  |
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
///  |                                                               |
///  |             Optional Parameters (variable)                    |
///  |                                                               |
///  +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// The "My Autonomous System" field is always two octets. A speaker whose AS does not fit puts
/// `AS_TRANS` there and carries the real AS in a 4-octet AS capability.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BgpOpenMessage {
    pub version: u8,
    pub asn: Asn,
    pub hold_time: u16,
    pub bgp_identifier: Ipv4Addr,
    /// Optional parameters use the RFC 9072 extended encoding with 2-octet lengths.
    pub extended_length: bool,
    pub opt_params: Vec<OptParam>,
}

impl BgpOpenMessage {
    /// A version 4 OPEN with no optional parameters.
    pub fn new(asn: Asn, hold_time: u16, bgp_identifier: Ipv4Addr) -> Self {
        BgpOpenMessage {
            version: BGP_VERSION,
            asn,
            hold_time,
            bgp_identifier,
            extended_length: false,
            opt_params: vec![],
        }
    }

    /// All capabilities advertised across the capabilities parameters of this message.
    pub fn capabilities(&self) -> Result<Vec<Capability>, ParserError> {
        let mut capabilities = vec![];
        for param in &self.opt_params {
            capabilities.extend(param.capabilities()?);
        }
        Ok(capabilities)
    }

    /// The speaker's AS from its 4-octet AS number capability, if it advertised one.
    ///
    /// Its presence tells the caller the peer supports 4-octet AS numbers.
    pub fn four_octet_asn(&self) -> Option<Asn> {
        self.capabilities()
            .ok()?
            .iter()
            .find_map(Capability::as_four_octet_asn)
    }
}

/// Optional parameter of an OPEN message, kept as an opaque `(type, value)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptParam {
    pub param_type: u8,
    pub value: Vec<u8>,
}

impl OptParam {
    /// Parameter type carrying capabilities, RFC 5492.
    pub const CAPABILITIES: u8 = 2;

    pub fn is_capabilities(&self) -> bool {
        self.param_type == OptParam::CAPABILITIES
    }

    /// Capabilities carried by this parameter. Empty for other parameter types.
    pub fn capabilities(&self) -> Result<Vec<Capability>, ParserError> {
        if !self.is_capabilities() {
            return Ok(vec![]);
        }
        Capability::parse_list(Bytes::copy_from_slice(&self.value))
            .map_err(|e| e.within(OpenError::UNSPECIFIC))
    }

    /// Builds a capabilities parameter.
    pub fn from_capabilities(capabilities: &[Capability]) -> Result<OptParam, ParserError> {
        let mut buf = BytesMut::new();
        for capability in capabilities {
            capability.encode_to(&mut buf)?;
        }
        Ok(OptParam {
            param_type: OptParam::CAPABILITIES,
            value: buf.to_vec(),
        })
    }
}

/// BGP Update Message
///
/// ```text
/// +-----------------------------------------------------+
/// |   Withdrawn Routes Length (2 octets)                |
/// +-----------------------------------------------------+
/// |   Withdrawn Routes (variable)                       |
/// +-----------------------------------------------------+
/// |   Total Path Attribute Length (2 octets)            |
/// +-----------------------------------------------------+
/// |   Path Attributes (variable)                        |
/// +-----------------------------------------------------+
/// |   Network Layer Reachability Information (variable) |
/// +-----------------------------------------------------+
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BgpUpdateMessage {
    pub withdrawn_prefixes: Vec<NetworkPrefix>,
    pub attributes: Attributes,
    pub announced_prefixes: Vec<NetworkPrefix>,
}

impl BgpUpdateMessage {
    /// An UPDATE with nothing in it, used as the IPv4 unicast End-of-RIB marker (RFC 4724).
    pub fn is_end_of_rib(&self) -> bool {
        self.withdrawn_prefixes.is_empty()
            && self.attributes.is_empty()
            && self.announced_prefixes.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BgpNotificationMessage {
    pub error: BgpError,
    pub data: Vec<u8>,
}

impl BgpNotificationMessage {
    /// The error is normalized through its codes, so a message built here equals the one decoded
    /// from its own encoding.
    pub fn new<E: Into<BgpError>>(error: E, data: Vec<u8>) -> Self {
        let (code, subcode) = error.into().codes();
        BgpNotificationMessage {
            error: BgpError::new(code, subcode),
            data,
        }
    }

    /// A Cease NOTIFICATION without data.
    pub fn cease(subcode: CeaseSubcode) -> Self {
        BgpNotificationMessage::new(subcode, vec![])
    }

    pub fn error_code(&self) -> u8 {
        self.error.error_code()
    }

    pub fn error_subcode(&self) -> u8 {
        self.error.error_subcode()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BgpKeepAliveMessage {}
