use crate::models::*;
use itertools::Itertools;
use std::fmt::{Display, Formatter};

/// Enum of AS path segment.
#[derive(Debug, PartialEq, Clone, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AsPathSegment {
    /// Unordered set of ASes a route in the UPDATE message has traversed
    AsSet(Vec<Asn>),
    /// Ordered set of ASes a route in the UPDATE message has traversed
    AsSequence(Vec<Asn>),
}

impl AsPathSegment {
    /// Shorthand for creating an `AsSequence` segment.
    pub fn sequence<S: AsRef<[u32]>>(seq: S) -> Self {
        AsPathSegment::AsSequence(seq.as_ref().iter().copied().map_into().collect())
    }

    /// Shorthand for creating an `AsSet` segment.
    pub fn set<S: AsRef<[u32]>>(seq: S) -> Self {
        AsPathSegment::AsSet(seq.as_ref().iter().copied().map_into().collect())
    }

    pub fn asns(&self) -> &[Asn] {
        match self {
            AsPathSegment::AsSet(v) | AsPathSegment::AsSequence(v) => v,
        }
    }

    /// Contribution of this segment to the path length used in route selection.
    ///
    /// An AS_SET counts as one regardless of its size.
    pub fn route_len(&self) -> usize {
        match self {
            AsPathSegment::AsSequence(v) => v.len(),
            AsPathSegment::AsSet(_) => 1,
        }
    }
}

impl Display for AsPathSegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            AsPathSegment::AsSequence(v) => write!(f, "{}", v.iter().join(" ")),
            AsPathSegment::AsSet(v) => write!(f, "{{{}}}", v.iter().join(",")),
        }
    }
}

#[derive(Debug, PartialEq, Clone, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AsPath {
    pub segments: Vec<AsPathSegment>,
}

impl AsPath {
    pub fn new() -> AsPath {
        AsPath::default()
    }

    pub fn from_segments(segments: Vec<AsPathSegment>) -> AsPath {
        AsPath { segments }
    }

    /// Shorthand for creating an AS path consisting of a single sequence.
    ///
    /// ```rust
    /// use bgpkit_codec::models::AsPath;
    ///
    /// let path = AsPath::from_sequence([65001, 65002]);
    /// assert_eq!(path.to_string(), "65001 65002");
    /// ```
    pub fn from_sequence<S: AsRef<[u32]>>(seq: S) -> Self {
        AsPath {
            segments: vec![AsPathSegment::sequence(seq)],
        }
    }

    pub fn append_segment(&mut self, segment: AsPathSegment) {
        self.segments.push(segment);
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn route_len(&self) -> usize {
        self.segments.iter().map(AsPathSegment::route_len).sum()
    }

    /// Whether any AS number in the path needs 4 octets.
    pub fn has_4byte_asn(&self) -> bool {
        self.segments
            .iter()
            .flat_map(AsPathSegment::asns)
            .any(|asn| !asn.fits_16bit())
    }

    /// The originating AS numbers: the last AS of a trailing sequence, or every member of a
    /// trailing set.
    pub fn get_origin(&self) -> Option<Vec<Asn>> {
        match self.segments.last()? {
            AsPathSegment::AsSequence(v) => v.last().map(|n| vec![*n]),
            AsPathSegment::AsSet(v) => Some(v.clone()),
        }
    }

    /// The path as plain numbers, `None` if it contains an AS_SET.
    pub fn to_u32_vec(&self) -> Option<Vec<u32>> {
        let mut path = vec![];
        for segment in &self.segments {
            match segment {
                AsPathSegment::AsSequence(v) => path.extend(v.iter().map(u32::from)),
                AsPathSegment::AsSet(_) => return None,
            }
        }
        Some(path)
    }
}

impl Display for AsPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.iter().join(" "))
    }
}
