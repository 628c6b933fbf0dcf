/*!
error module defines the error type returned by every decode and encode call of bgpkit-codec.

Every failure is classified into the BGP NOTIFICATION taxonomy ([BgpError]), so a session layer
can turn any error into an outbound NOTIFICATION with [ParserError::to_notification] without
looking at codec internals.
*/
use crate::models::{BgpError, BgpNotificationMessage, MessageHeaderError};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParserError {
    /// The input ended before a field could be read.
    ///
    /// Callers higher up re-classify this with [ParserError::within] into the error matching the
    /// section being read. If it is never re-classified it maps to a message header error with
    /// subcode `BAD_MESSAGE_LENGTH`.
    ///
    /// ## Occurs during:
    ///  - Reading any fixed-width field, prefix or length-prefixed value
    #[error("not enough bytes: need {needed}, {remaining} remaining")]
    NotEnoughBytes { needed: usize, remaining: usize },
    /// A classified protocol violation.
    ///
    /// `data` is the diagnostic payload a NOTIFICATION reporting this error carries.
    #[error("{error}: {reason}")]
    Bgp {
        error: BgpError,
        data: Vec<u8>,
        reason: String,
    },
}

impl ParserError {
    pub fn new<E: Into<BgpError>>(error: E, data: Vec<u8>, reason: impl Into<String>) -> Self {
        ParserError::Bgp {
            error: error.into(),
            data,
            reason: reason.into(),
        }
    }

    /// Classifies a `NotEnoughBytes` error as `error`. Already classified errors are returned
    /// unchanged.
    pub fn within<E: Into<BgpError>>(self, error: E) -> Self {
        match self {
            ParserError::NotEnoughBytes { .. } => {
                let reason = self.to_string();
                ParserError::new(error, vec![], reason)
            }
            e => e,
        }
    }

    /// Replaces the classification of any error with `error`, dropping its diagnostic data.
    pub fn reclassify<E: Into<BgpError>>(self, error: E) -> Self {
        let reason = match self {
            ParserError::NotEnoughBytes { .. } => self.to_string(),
            ParserError::Bgp { reason, .. } => reason,
        };
        ParserError::new(error, vec![], reason)
    }

    /// The NOTIFICATION error code and subcode this error maps to.
    pub fn bgp_error(&self) -> BgpError {
        match self {
            ParserError::NotEnoughBytes { .. } => {
                BgpError::MessageHeaderError(MessageHeaderError::BAD_MESSAGE_LENGTH)
            }
            ParserError::Bgp { error, .. } => *error,
        }
    }

    /// Diagnostic data for the NOTIFICATION message, possibly empty.
    pub fn data(&self) -> &[u8] {
        match self {
            ParserError::NotEnoughBytes { .. } => &[],
            ParserError::Bgp { data, .. } => data.as_slice(),
        }
    }

    /// Builds the NOTIFICATION message reporting this error to the peer.
    pub fn to_notification(&self) -> BgpNotificationMessage {
        BgpNotificationMessage {
            error: self.bgp_error(),
            data: self.data().to_vec(),
        }
    }
}
