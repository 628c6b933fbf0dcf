use crate::error::ParserError;
use crate::models::{Asn, UpdateError};
use std::fmt::{Display, Formatter};

pub const COMMUNITY_NO_EXPORT: u32 = 0xFFFFFF01;
pub const COMMUNITY_NO_ADVERTISE: u32 = 0xFFFFFF02;
pub const COMMUNITY_NO_EXPORT_SUBCONFED: u32 = 0xFFFFFF03;

/// Regular community value as defined in [RFC1997](https://datatracker.ietf.org/doc/html/rfc1997).
#[derive(Debug, PartialEq, Copy, Clone, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Community {
    NoExport,
    NoAdvertise,
    NoExportSubConfed,
    Custom(Asn, u16),
}

impl From<u32> for Community {
    fn from(value: u32) -> Self {
        match value {
            COMMUNITY_NO_EXPORT => Community::NoExport,
            COMMUNITY_NO_ADVERTISE => Community::NoAdvertise,
            COMMUNITY_NO_EXPORT_SUBCONFED => Community::NoExportSubConfed,
            value => {
                let asn = ((value >> 16) & 0xffff) as u16;
                let data = (value & 0xffff) as u16;
                Community::Custom(Asn::new_16bit(asn), data)
            }
        }
    }
}

/// Fails when a custom community carries an AS wider than 2 octets, or when its value falls in
/// the well-known range and would decode as something else.
impl TryFrom<Community> for u32 {
    type Error = ParserError;

    fn try_from(value: Community) -> Result<Self, Self::Error> {
        let (asn, data) = match value {
            Community::NoExport => return Ok(COMMUNITY_NO_EXPORT),
            Community::NoAdvertise => return Ok(COMMUNITY_NO_ADVERTISE),
            Community::NoExportSubConfed => return Ok(COMMUNITY_NO_EXPORT_SUBCONFED),
            Community::Custom(asn, data) => (asn, data),
        };
        if !asn.fits_16bit() {
            return Err(ParserError::new(
                UpdateError::OPTIONAL_ATTRIBUTE_ERROR,
                vec![],
                format!("community {} has an AS wider than 2 octets", value),
            ));
        }
        let raw = (asn.to_u32() << 16) | data as u32;
        if !matches!(Community::from(raw), Community::Custom(..)) {
            return Err(ParserError::new(
                UpdateError::OPTIONAL_ATTRIBUTE_ERROR,
                vec![],
                format!("community {} collides with a well-known community", value),
            ));
        }
        Ok(raw)
    }
}

impl Display for Community {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Community::NoExport => write!(f, "no-export"),
            Community::NoAdvertise => write!(f, "no-advertise"),
            Community::NoExportSubConfed => write!(f, "no-export-sub-confed"),
            Community::Custom(asn, value) => write!(f, "{}:{}", asn, value),
        }
    }
}
