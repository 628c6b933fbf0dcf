//! BGP path attribute structs
mod aspath;
mod origin;

use crate::models::*;
use bitflags::bitflags;
use num_enum::{FromPrimitive, IntoPrimitive};
use std::net::Ipv4Addr;
use std::slice::Iter;
use std::vec::IntoIter;

pub use aspath::*;
pub use origin::*;

bitflags! {
    /// The high-order bit (bit 0) of the Attribute Flags octet is the
    /// Optional bit.  It defines whether the attribute is optional (if
    /// set to 1) or well-known (if set to 0).
    ///
    /// The second high-order bit (bit 1) of the Attribute Flags octet
    /// is the Transitive bit.  It defines whether an optional
    /// attribute is transitive (if set to 1) or non-transitive (if set
    /// to 0).
    ///
    /// For well-known attributes, the Transitive bit MUST be set to 1.
    /// (See Section 5 for a discussion of transitive attributes.)
    ///
    /// The third high-order bit (bit 2) of the Attribute Flags octet
    /// is the Partial bit.  It defines whether the information
    /// contained in the optional transitive attribute is partial (if
    /// set to 1) or complete (if set to 0).  For well-known attributes
    /// and for optional non-transitive attributes, the Partial bit
    /// MUST be set to 0.
    ///
    /// The fourth high-order bit (bit 3) of the Attribute Flags octet
    /// is the Extended Length bit.  It defines whether the Attribute
    /// Length is one octet (if set to 0) or two octets (if set to 1).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct AttrFlags: u8 {
        const OPTIONAL   = 0b10000000;
        const TRANSITIVE = 0b01000000;
        const PARTIAL    = 0b00100000;
        const EXTENDED   = 0b00010000;
    }
}

/// Attribute types.
///
/// Types this codec interprets are named; every other code is kept as `Unknown` and its value is
/// carried as raw octets. The full list is at IANA:
/// <https://www.iana.org/assignments/bgp-parameters/bgp-parameters.xhtml#bgp-parameters-2>
#[allow(non_camel_case_types)]
#[derive(Debug, FromPrimitive, IntoPrimitive, PartialEq, Eq, Hash, Copy, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum AttrType {
    ORIGIN = 1,
    AS_PATH = 2,
    NEXT_HOP = 3,
    MULTI_EXIT_DISCRIMINATOR = 4,
    LOCAL_PREFERENCE = 5,
    ATOMIC_AGGREGATE = 6,
    AGGREGATOR = 7,
    /// <https://datatracker.ietf.org/doc/html/rfc1997>
    COMMUNITIES = 8,
    #[num_enum(catch_all)]
    Unknown(u8),
}

/// Attribute category per RFC 4271 section 5.
#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum AttrCategory {
    WellKnownMandatory,
    WellKnownDiscretionary,
    OptionalTransitive,
    OptionalNonTransitive,
}

impl AttrType {
    /// Category of a recognized attribute type, `None` for unknown codes.
    pub const fn category(&self) -> Option<AttrCategory> {
        match self {
            AttrType::ORIGIN | AttrType::AS_PATH | AttrType::NEXT_HOP => {
                Some(AttrCategory::WellKnownMandatory)
            }
            AttrType::LOCAL_PREFERENCE | AttrType::ATOMIC_AGGREGATE => {
                Some(AttrCategory::WellKnownDiscretionary)
            }
            AttrType::AGGREGATOR | AttrType::COMMUNITIES => Some(AttrCategory::OptionalTransitive),
            AttrType::MULTI_EXIT_DISCRIMINATOR => Some(AttrCategory::OptionalNonTransitive),
            AttrType::Unknown(_) => None,
        }
    }

    /// The Optional and Transitive bits a recognized attribute must carry.
    pub fn expected_flags(&self) -> Option<AttrFlags> {
        self.category().map(|category| match category {
            AttrCategory::WellKnownMandatory | AttrCategory::WellKnownDiscretionary => {
                AttrFlags::TRANSITIVE
            }
            AttrCategory::OptionalTransitive => AttrFlags::OPTIONAL | AttrFlags::TRANSITIVE,
            AttrCategory::OptionalNonTransitive => AttrFlags::OPTIONAL,
        })
    }

    pub const fn is_well_known(&self) -> bool {
        matches!(
            self.category(),
            Some(AttrCategory::WellKnownMandatory | AttrCategory::WellKnownDiscretionary)
        )
    }
}

/// BGP Attribute struct with attribute value and flag
///
/// The Extended Length bit only describes the width of the length field on the wire, so two
/// attributes that differ in nothing but that bit compare equal.
#[derive(Debug, Clone, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribute {
    pub value: AttributeValue,
    pub flag: AttrFlags,
}

impl PartialEq for Attribute {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
            && self.flag.difference(AttrFlags::EXTENDED)
                == other.flag.difference(AttrFlags::EXTENDED)
    }
}

impl Attribute {
    /// Creates an attribute with the flags its type requires.
    ///
    /// For unknown attributes the flags are optional-transitive; use a struct literal to choose
    /// others.
    pub fn new(value: AttributeValue) -> Attribute {
        let flag = value
            .attr_type()
            .expected_flags()
            .unwrap_or(AttrFlags::OPTIONAL | AttrFlags::TRANSITIVE);
        Attribute { value, flag }
    }

    pub fn attr_type(&self) -> AttrType {
        self.value.attr_type()
    }

    pub fn is_optional(&self) -> bool {
        self.flag.contains(AttrFlags::OPTIONAL)
    }

    pub fn is_transitive(&self) -> bool {
        self.flag.contains(AttrFlags::TRANSITIVE)
    }

    pub fn is_partial(&self) -> bool {
        self.flag.contains(AttrFlags::PARTIAL)
    }

    pub fn is_extended(&self) -> bool {
        self.flag.contains(AttrFlags::EXTENDED)
    }
}

impl From<AttributeValue> for Attribute {
    fn from(value: AttributeValue) -> Self {
        Attribute::new(value)
    }
}

/// The `AttributeValue` enum represents different kinds of Attribute values.
#[derive(Debug, PartialEq, Clone, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AttributeValue {
    Origin(Origin),
    AsPath(AsPath),
    NextHop(Ipv4Addr),
    MultiExitDiscriminator(u32),
    LocalPreference(u32),
    AtomicAggregate,
    Aggregator { asn: Asn, id: Ipv4Addr },
    Communities(Vec<Community>),
    /// Optional attribute this codec does not interpret, kept for re-advertisement.
    Unknown(AttrRaw),
}

impl AttributeValue {
    pub fn attr_type(&self) -> AttrType {
        match self {
            AttributeValue::Origin(_) => AttrType::ORIGIN,
            AttributeValue::AsPath(_) => AttrType::AS_PATH,
            AttributeValue::NextHop(_) => AttrType::NEXT_HOP,
            AttributeValue::MultiExitDiscriminator(_) => AttrType::MULTI_EXIT_DISCRIMINATOR,
            AttributeValue::LocalPreference(_) => AttrType::LOCAL_PREFERENCE,
            AttributeValue::AtomicAggregate => AttrType::ATOMIC_AGGREGATE,
            AttributeValue::Aggregator { .. } => AttrType::AGGREGATOR,
            AttributeValue::Communities(_) => AttrType::COMMUNITIES,
            AttributeValue::Unknown(raw) => AttrType::from(raw.attr_type),
        }
    }
}

/// Raw octets of an attribute the codec does not interpret.
#[derive(Debug, PartialEq, Clone, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttrRaw {
    pub attr_type: u8,
    pub bytes: Vec<u8>,
}

/// Ordered list of the path attributes of one UPDATE message.
#[derive(Debug, PartialEq, Clone, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Attributes {
    inner: Vec<Attribute>,
}

impl Attributes {
    pub fn new() -> Attributes {
        Attributes::default()
    }

    pub fn push(&mut self, attr: Attribute) {
        self.inner.push(attr);
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, Attribute> {
        self.inner.iter()
    }

    pub fn has_attr(&self, ty: AttrType) -> bool {
        self.get(ty).is_some()
    }

    /// First attribute of the given type.
    pub fn get(&self, ty: AttrType) -> Option<&Attribute> {
        self.inner.iter().find(|attr| attr.attr_type() == ty)
    }

    pub fn origin(&self) -> Option<Origin> {
        match self.get(AttrType::ORIGIN).map(|a| &a.value) {
            Some(AttributeValue::Origin(origin)) => Some(*origin),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&AsPath> {
        match self.get(AttrType::AS_PATH).map(|a| &a.value) {
            Some(AttributeValue::AsPath(path)) => Some(path),
            _ => None,
        }
    }

    pub fn next_hop(&self) -> Option<Ipv4Addr> {
        match self.get(AttrType::NEXT_HOP).map(|a| &a.value) {
            Some(AttributeValue::NextHop(addr)) => Some(*addr),
            _ => None,
        }
    }

    pub fn multi_exit_discriminator(&self) -> Option<u32> {
        match self.get(AttrType::MULTI_EXIT_DISCRIMINATOR).map(|a| &a.value) {
            Some(AttributeValue::MultiExitDiscriminator(med)) => Some(*med),
            _ => None,
        }
    }

    pub fn local_preference(&self) -> Option<u32> {
        match self.get(AttrType::LOCAL_PREFERENCE).map(|a| &a.value) {
            Some(AttributeValue::LocalPreference(pref)) => Some(*pref),
            _ => None,
        }
    }

    pub fn communities(&self) -> Option<&[Community]> {
        match self.get(AttrType::COMMUNITIES).map(|a| &a.value) {
            Some(AttributeValue::Communities(c)) => Some(c.as_slice()),
            _ => None,
        }
    }

    /// The attribute list as it should be passed on to another peer.
    ///
    /// Unrecognized non-transitive attributes are dropped and unrecognized transitive ones get
    /// the Partial bit set (RFC 4271 section 5).
    pub fn to_readvertise(&self) -> Attributes {
        self.inner
            .iter()
            .filter_map(|attr| match &attr.value {
                AttributeValue::Unknown(_) if !attr.is_transitive() => None,
                AttributeValue::Unknown(_) => Some(Attribute {
                    value: attr.value.clone(),
                    flag: attr.flag | AttrFlags::PARTIAL,
                }),
                _ => Some(attr.clone()),
            })
            .collect()
    }
}

impl From<Vec<Attribute>> for Attributes {
    fn from(inner: Vec<Attribute>) -> Self {
        Attributes { inner }
    }
}

impl FromIterator<Attribute> for Attributes {
    fn from_iter<T: IntoIterator<Item = Attribute>>(iter: T) -> Self {
        Attributes {
            inner: iter.into_iter().collect(),
        }
    }
}

impl FromIterator<AttributeValue> for Attributes {
    fn from_iter<T: IntoIterator<Item = AttributeValue>>(iter: T) -> Self {
        Attributes {
            inner: iter.into_iter().map(Attribute::new).collect(),
        }
    }
}

impl IntoIterator for Attributes {
    type Item = Attribute;
    type IntoIter = IntoIter<Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = &'a Attribute;
    type IntoIter = Iter<'a, Attribute>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attr_type_from() {
        assert_eq!(AttrType::from(2u8), AttrType::AS_PATH);
        assert_eq!(AttrType::from(99u8), AttrType::Unknown(99));
        assert_eq!(u8::from(AttrType::Unknown(99)), 99);
        assert_eq!(u8::from(AttrType::COMMUNITIES), 8);
    }

    #[test]
    fn test_default_flags() {
        let attr = Attribute::new(AttributeValue::Origin(Origin::IGP));
        assert_eq!(attr.flag, AttrFlags::TRANSITIVE);
        assert!(!attr.is_optional());

        let attr = Attribute::new(AttributeValue::MultiExitDiscriminator(10));
        assert_eq!(attr.flag, AttrFlags::OPTIONAL);

        let attr = Attribute::new(AttributeValue::Unknown(AttrRaw {
            attr_type: 32,
            bytes: vec![],
        }));
        assert_eq!(attr.flag, AttrFlags::OPTIONAL | AttrFlags::TRANSITIVE);
        assert_eq!(attr.attr_type(), AttrType::Unknown(32));
    }

    #[test]
    fn test_extended_length_bit_ignored_by_equality() {
        let attr = Attribute::new(AttributeValue::AsPath(AsPath::from_sequence([65001])));
        let mut extended = attr.clone();
        extended.flag |= AttrFlags::EXTENDED;
        assert_eq!(attr, extended);

        let mut partial = attr.clone();
        partial.flag |= AttrFlags::PARTIAL;
        assert_ne!(attr, partial);
    }

    #[test]
    fn test_getters() {
        let attrs: Attributes = vec![
            AttributeValue::Origin(Origin::EGP),
            AttributeValue::AsPath(AsPath::from_sequence([65001, 65002])),
            AttributeValue::NextHop(Ipv4Addr::new(192, 0, 2, 1)),
            AttributeValue::LocalPreference(100),
        ]
        .into_iter()
        .collect();

        assert_eq!(attrs.len(), 4);
        assert_eq!(attrs.origin(), Some(Origin::EGP));
        assert_eq!(attrs.next_hop(), Some(Ipv4Addr::new(192, 0, 2, 1)));
        assert_eq!(attrs.local_preference(), Some(100));
        assert_eq!(attrs.multi_exit_discriminator(), None);
        assert_eq!(attrs.as_path().map(|p| p.route_len()), Some(2));
        assert!(!attrs.has_attr(AttrType::COMMUNITIES));
    }

    #[test]
    fn test_to_readvertise() {
        let transitive = Attribute {
            value: AttributeValue::Unknown(AttrRaw {
                attr_type: 40,
                bytes: vec![1, 2],
            }),
            flag: AttrFlags::OPTIONAL | AttrFlags::TRANSITIVE,
        };
        let non_transitive = Attribute {
            value: AttributeValue::Unknown(AttrRaw {
                attr_type: 41,
                bytes: vec![3],
            }),
            flag: AttrFlags::OPTIONAL,
        };
        let attrs = Attributes::from(vec![
            Attribute::new(AttributeValue::Origin(Origin::IGP)),
            transitive,
            non_transitive,
        ]);

        let out = attrs.to_readvertise();
        assert_eq!(out.len(), 2);
        assert!(out.get(AttrType::Unknown(40)).unwrap().is_partial());
        assert!(!out.has_attr(AttrType::Unknown(41)));
        assert!(!out.get(AttrType::ORIGIN).unwrap().is_partial());
    }
}
