use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// AS number length on the wire: 2 or 4 octets.
///
/// The width is negotiated between the peers (4-octet AS support, RFC 6793) and is handed to the
/// codec by the caller. It is never guessed from the bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AsnLength {
    #[default]
    Bits16,
    Bits32,
}

impl AsnLength {
    /// Number of octets used by one AS number.
    pub const fn octets(&self) -> usize {
        match self {
            AsnLength::Bits16 => 2,
            AsnLength::Bits32 => 4,
        }
    }
}

/// ASN -- Autonomous System Number
///
/// Equality and hashing only consider the numeric value, so an ASN read as 2 octets equals the
/// same ASN read as 4 octets.
#[derive(Debug, Clone, Copy, Eq, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Asn {
    pub asn: u32,
    pub len: AsnLength,
}

/// `AS_TRANS`, the placeholder a 2-octet speaker sees instead of a 4-octet ASN.
///
/// <https://datatracker.ietf.org/doc/html/rfc6793#section-9>
pub const AS_TRANS: u32 = 23456;

impl Asn {
    /// Constructs a new 2-octet `Asn` with `AsnLength::Bits16`.
    pub const fn new_16bit(asn: u16) -> Self {
        Asn {
            asn: asn as u32,
            len: AsnLength::Bits16,
        }
    }

    /// Constructs a new 4-octet `Asn` with `AsnLength::Bits32`.
    pub const fn new_32bit(asn: u32) -> Self {
        Asn {
            asn,
            len: AsnLength::Bits32,
        }
    }

    /// Whether the value can be written in a 2-octet AS number field.
    pub const fn fits_16bit(&self) -> bool {
        self.asn <= u16::MAX as u32
    }

    pub const fn to_u32(&self) -> u32 {
        self.asn
    }
}

impl PartialEq for Asn {
    fn eq(&self, other: &Self) -> bool {
        self.asn == other.asn
    }
}

impl Hash for Asn {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.asn.hash(state);
    }
}

impl PartialEq<u32> for Asn {
    fn eq(&self, other: &u32) -> bool {
        self.asn == *other
    }
}

impl From<u32> for Asn {
    fn from(v: u32) -> Self {
        Asn::new_32bit(v)
    }
}

impl From<u16> for Asn {
    fn from(v: u16) -> Self {
        Asn::new_16bit(v)
    }
}

impl From<Asn> for u32 {
    fn from(value: Asn) -> Self {
        value.asn
    }
}

impl From<&Asn> for u32 {
    fn from(value: &Asn) -> Self {
        value.asn
    }
}

impl Display for Asn {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.asn)
    }
}
