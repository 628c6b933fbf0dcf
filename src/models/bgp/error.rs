//! BGP NOTIFICATION error codes and subcodes as assigned by IANA.
//!
//! The full list of IANA error code assignments for BGP can be viewed at here:
//! <https://www.iana.org/assignments/bgp-parameters/bgp-parameters.xhtml#bgp-parameters-3>.
//!
//! [BgpError] is the classification every codec failure carries: it converts to and from the
//! `(error code, error subcode)` pair of a NOTIFICATION message without loss, including codes
//! that are not assigned yet.
use log::debug;
use num_enum::{FromPrimitive, IntoPrimitive};
use std::fmt::{Display, Formatter};

#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum BgpErrorCode {
    Reserved = 0,
    MessageHeaderError = 1,
    OpenError = 2,
    UpdateError = 3,
    HoldTimerExpired = 4,
    FiniteStateMachineError = 5,
    Cease = 6,
    RouteRefreshError = 7,
    #[num_enum(catch_all)]
    Unknown(u8),
}

/// A NOTIFICATION error code together with its subcode.
///
/// <https://www.iana.org/assignments/bgp-parameters/bgp-parameters.xhtml#bgp-parameters-4>
#[derive(Debug, PartialEq, Eq, Hash, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BgpError {
    /// Includes subcode. Currently, no subcodes have been assigned.
    Reserved(u8),
    MessageHeaderError(MessageHeaderError),
    OpenError(OpenError),
    UpdateError(UpdateError),
    /// Includes subcode. Currently, no subcodes have been assigned.
    HoldTimerExpired(u8),
    FiniteStateMachineError(FiniteStateMachineError),
    Cease(CeaseSubcode),
    RouteRefreshError(RouteRefreshError),
    /// An unassigned error code. [BgpError::new] only produces this for codes outside 0..=7.
    Unknown(u8, u8),
}

impl BgpError {
    pub fn new(code: u8, subcode: u8) -> Self {
        match BgpErrorCode::from(code) {
            BgpErrorCode::Reserved => BgpError::Reserved(subcode),
            BgpErrorCode::MessageHeaderError => {
                BgpError::MessageHeaderError(MessageHeaderError::from(subcode))
            }
            BgpErrorCode::OpenError => BgpError::OpenError(OpenError::from(subcode)),
            BgpErrorCode::UpdateError => BgpError::UpdateError(UpdateError::from(subcode)),
            BgpErrorCode::HoldTimerExpired => BgpError::HoldTimerExpired(subcode),
            BgpErrorCode::FiniteStateMachineError => {
                BgpError::FiniteStateMachineError(FiniteStateMachineError::from(subcode))
            }
            BgpErrorCode::Cease => BgpError::Cease(CeaseSubcode::from(subcode)),
            BgpErrorCode::RouteRefreshError => {
                BgpError::RouteRefreshError(RouteRefreshError::from(subcode))
            }
            BgpErrorCode::Unknown(_) => {
                debug!(
                    "unassigned BGP notification error code: {}, subcode: {}",
                    code, subcode
                );
                BgpError::Unknown(code, subcode)
            }
        }
    }

    /// The `(error code, error subcode)` pair as written in a NOTIFICATION message.
    pub fn codes(&self) -> (u8, u8) {
        match *self {
            BgpError::Reserved(sub) => (BgpErrorCode::Reserved.into(), sub),
            BgpError::MessageHeaderError(sub) => {
                (BgpErrorCode::MessageHeaderError.into(), sub.into())
            }
            BgpError::OpenError(sub) => (BgpErrorCode::OpenError.into(), sub.into()),
            BgpError::UpdateError(sub) => (BgpErrorCode::UpdateError.into(), sub.into()),
            BgpError::HoldTimerExpired(sub) => (BgpErrorCode::HoldTimerExpired.into(), sub),
            BgpError::FiniteStateMachineError(sub) => {
                (BgpErrorCode::FiniteStateMachineError.into(), sub.into())
            }
            BgpError::Cease(sub) => (BgpErrorCode::Cease.into(), sub.into()),
            BgpError::RouteRefreshError(sub) => {
                (BgpErrorCode::RouteRefreshError.into(), sub.into())
            }
            BgpError::Unknown(code, sub) => (code, sub),
        }
    }

    pub fn error_code(&self) -> u8 {
        self.codes().0
    }

    pub fn error_subcode(&self) -> u8 {
        self.codes().1
    }
}

impl From<MessageHeaderError> for BgpError {
    fn from(value: MessageHeaderError) -> Self {
        BgpError::MessageHeaderError(value)
    }
}

impl From<OpenError> for BgpError {
    fn from(value: OpenError) -> Self {
        BgpError::OpenError(value)
    }
}

impl From<UpdateError> for BgpError {
    fn from(value: UpdateError) -> Self {
        BgpError::UpdateError(value)
    }
}

impl From<FiniteStateMachineError> for BgpError {
    fn from(value: FiniteStateMachineError) -> Self {
        BgpError::FiniteStateMachineError(value)
    }
}

impl From<CeaseSubcode> for BgpError {
    fn from(value: CeaseSubcode) -> Self {
        BgpError::Cease(value)
    }
}

impl Display for BgpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            BgpError::Reserved(sub) => write!(f, "reserved error code (subcode {})", sub),
            BgpError::MessageHeaderError(sub) => write!(f, "message header error: {:?}", sub),
            BgpError::OpenError(sub) => write!(f, "OPEN message error: {:?}", sub),
            BgpError::UpdateError(sub) => write!(f, "UPDATE message error: {:?}", sub),
            BgpError::HoldTimerExpired(_) => write!(f, "hold timer expired"),
            BgpError::FiniteStateMachineError(sub) => {
                write!(f, "finite state machine error: {:?}", sub)
            }
            BgpError::Cease(sub) => write!(f, "cease: {:?}", sub),
            BgpError::RouteRefreshError(sub) => write!(f, "ROUTE-REFRESH error: {:?}", sub),
            BgpError::Unknown(code, sub) => {
                write!(f, "unknown error code {} (subcode {})", code, sub)
            }
        }
    }
}

/// Message Header Error subcodes
///
/// <https://www.iana.org/assignments/bgp-parameters/bgp-parameters.xhtml#bgp-parameters-5>
#[allow(non_camel_case_types)]
#[derive(Debug, FromPrimitive, IntoPrimitive, PartialEq, Eq, Hash, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MessageHeaderError {
    UNSPECIFIC = 0,
    CONNECTION_NOT_SYNCHRONIZED = 1,
    BAD_MESSAGE_LENGTH = 2,
    BAD_MESSAGE_TYPE = 3,
    // 4 - 255: unassigned
    #[num_enum(catch_all)]
    Unknown(u8),
}

/// OPEN Message Error subcodes
///
/// <https://www.iana.org/assignments/bgp-parameters/bgp-parameters.xhtml#bgp-parameters-6>
#[allow(non_camel_case_types)]
#[derive(Debug, FromPrimitive, IntoPrimitive, PartialEq, Eq, Hash, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum OpenError {
    UNSPECIFIC = 0,
    UNSUPPORTED_VERSION_NUMBER = 1,
    BAD_PEER_AS = 2,
    BAD_BGP_IDENTIFIER = 3,
    UNSUPPORTED_OPTIONAL_PARAMETER = 4,
    // 5 -- deprecated (authentication failure)
    UNACCEPTABLE_HOLD_TIME = 6,
    UNSUPPORTED_CAPABILITY = 7,
    // 8 - 10 -- deprecated
    ROLE_MISMATCH = 11,
    #[num_enum(catch_all)]
    Unknown(u8),
}

/// UPDATE Message Error subcodes
///
/// <https://www.iana.org/assignments/bgp-parameters/bgp-parameters.xhtml#bgp-parameters-7>
#[allow(non_camel_case_types)]
#[derive(Debug, FromPrimitive, IntoPrimitive, PartialEq, Eq, Hash, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum UpdateError {
    UNSPECIFIC = 0,
    MALFORMED_ATTRIBUTE_LIST = 1,
    UNRECOGNIZED_WELL_KNOWN_ATTRIBUTE = 2,
    MISSING_WELL_KNOWN_ATTRIBUTE = 3,
    ATTRIBUTE_FLAGS_ERROR = 4,
    ATTRIBUTE_LENGTH_ERROR = 5,
    INVALID_ORIGIN_ATTRIBUTE = 6,
    // 7 - deprecated (AS routing loop)
    INVALID_NEXT_HOP_ATTRIBUTE = 8,
    OPTIONAL_ATTRIBUTE_ERROR = 9,
    INVALID_NETWORK_FIELD = 10,
    MALFORMED_AS_PATH = 11,
    #[num_enum(catch_all)]
    Unknown(u8),
}

/// BGP Finite State Machine Error Subcodes
///
/// <https://www.iana.org/assignments/bgp-parameters/bgp-parameters.xhtml#bgp-finite-state-machine-error-subcodes>
#[allow(non_camel_case_types)]
#[derive(Debug, FromPrimitive, IntoPrimitive, PartialEq, Eq, Hash, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum FiniteStateMachineError {
    UNSPECIFIED = 0,
    RECEIVE_UNEXPECTED_MESSAGE_IN_OPENSENT_STATE = 1,
    RECEIVE_UNEXPECTED_MESSAGE_IN_OPENCONFIRM_STATE = 2,
    RECEIVE_UNEXPECTED_MESSAGE_IN_ESTABLISHED_STATE = 3,
    #[num_enum(catch_all)]
    Unknown(u8),
}

/// BGP Cease NOTIFICATION message subcodes
///
/// <https://www.iana.org/assignments/bgp-parameters/bgp-parameters.xhtml#bgp-parameters-8>
#[allow(non_camel_case_types)]
#[derive(Debug, FromPrimitive, IntoPrimitive, PartialEq, Eq, Hash, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum CeaseSubcode {
    RESERVED = 0,
    MAXIMUM_NUMBER_OF_PREFIXES_REACHED = 1,
    ADMINISTRATIVE_SHUTDOWN = 2,
    PEER_DE_CONFIGURED = 3,
    ADMINISTRATIVE_RESET = 4,
    CONNECTION_REJECTED = 5,
    OTHER_CONFIGURATION_CHANGE = 6,
    CONNECTION_COLLISION_RESOLUTION = 7,
    OUT_OF_RESOURCES = 8,
    HARD_RESET = 9,
    BFD_DOWN = 10,
    #[num_enum(catch_all)]
    Unknown(u8),
}

/// BGP ROUTE-REFRESH Message Error subcodes
///
/// <https://www.iana.org/assignments/bgp-parameters/bgp-parameters.xhtml#route-refresh-error-subcodes>
#[allow(non_camel_case_types)]
#[derive(Debug, FromPrimitive, IntoPrimitive, PartialEq, Eq, Hash, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum RouteRefreshError {
    RESERVED = 0,
    INVALID_MESSAGE_LENGTH = 1,
    #[num_enum(catch_all)]
    Unknown(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsing() {
        assert_eq!(BgpError::new(0, 0), BgpError::Reserved(0));
        assert_eq!(
            BgpError::new(1, 2),
            BgpError::MessageHeaderError(MessageHeaderError::BAD_MESSAGE_LENGTH)
        );
        assert_eq!(
            BgpError::new(1, 4),
            BgpError::MessageHeaderError(MessageHeaderError::Unknown(4)),
        );
        assert_eq!(
            BgpError::new(2, 6),
            BgpError::OpenError(OpenError::UNACCEPTABLE_HOLD_TIME)
        );
        // deprecated subcodes have no name
        for n in [5, 8, 9, 10] {
            assert_eq!(OpenError::from(n), OpenError::Unknown(n));
        }
        assert_eq!(
            BgpError::new(3, 11),
            BgpError::UpdateError(UpdateError::MALFORMED_AS_PATH)
        );
        assert_eq!(UpdateError::from(7), UpdateError::Unknown(7));
        // subcode should not matter here
        assert_eq!(BgpError::new(4, 1), BgpError::HoldTimerExpired(1));
        assert_eq!(
            BgpError::new(6, 2),
            BgpError::Cease(CeaseSubcode::ADMINISTRATIVE_SHUTDOWN)
        );
        assert_eq!(BgpError::new(8, 2), BgpError::Unknown(8, 2));
    }

    #[test]
    fn test_codes_inverse_of_new() {
        for code in 0..=9u8 {
            for subcode in [0u8, 1, 2, 3, 6, 11, 12, 200] {
                assert_eq!(BgpError::new(code, subcode).codes(), (code, subcode));
            }
        }
    }

    #[test]
    fn test_from_subcode() {
        let err: BgpError = UpdateError::INVALID_NETWORK_FIELD.into();
        assert_eq!(err.codes(), (3, 10));
        let err: BgpError = CeaseSubcode::HARD_RESET.into();
        assert_eq!(err.codes(), (6, 9));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            BgpError::from(MessageHeaderError::BAD_MESSAGE_TYPE).to_string(),
            "message header error: BAD_MESSAGE_TYPE"
        );
        assert_eq!(BgpError::new(4, 0).to_string(), "hold timer expired");
    }
}
