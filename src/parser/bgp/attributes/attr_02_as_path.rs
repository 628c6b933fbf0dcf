use crate::models::*;
use crate::parser::{write_asns, ReadUtils};
use crate::ParserError;
use bytes::{Buf, BufMut, Bytes, BytesMut};

const AS_PATH_AS_SET: u8 = 1;
const AS_PATH_AS_SEQUENCE: u8 = 2;

/// Parse an AS_PATH attribute value.
///
/// AS numbers are read with the width negotiated for the session. Any structural problem, an
/// unknown segment type or a segment running past the value, is reported as `MALFORMED_AS_PATH`.
///
/// ```text
/// AS_PATH is a well-known mandatory attribute that is composed
/// of a sequence of AS path segments.  Each AS path segment is
/// represented by a triple <path segment type, path segment
/// length, path segment value>.
///
/// The path segment type is a 1-octet length field with the
/// following values defined:
///
/// Value      Segment Type
///
/// 1         AS_SET: unordered set of ASes a route in the
/// UPDATE message has traversed
///
/// 2         AS_SEQUENCE: ordered set of ASes a route in
/// the UPDATE message has traversed
///
/// The path segment length is a 1-octet length field,
/// containing the number of ASes (not the number of octets) in
/// the path segment value field.
/// ```
pub fn parse_as_path(mut input: Bytes, asn_len: AsnLength) -> Result<AttributeValue, ParserError> {
    let mut output = AsPath {
        segments: Vec::with_capacity(5),
    };
    while input.remaining() > 0 {
        let segment = parse_as_path_segment(&mut input, asn_len)
            .map_err(|e| e.within(UpdateError::MALFORMED_AS_PATH))?;
        output.append_segment(segment);
    }

    Ok(AttributeValue::AsPath(output))
}

fn parse_as_path_segment(
    input: &mut Bytes,
    asn_len: AsnLength,
) -> Result<AsPathSegment, ParserError> {
    let segment_type = input.read_u8()?;
    let count = input.read_u8()? as usize;
    let path = input.read_asns(asn_len, count)?;
    match segment_type {
        AS_PATH_AS_SET => Ok(AsPathSegment::AsSet(path)),
        AS_PATH_AS_SEQUENCE => Ok(AsPathSegment::AsSequence(path)),
        _ => Err(ParserError::new(
            UpdateError::MALFORMED_AS_PATH,
            vec![],
            format!("invalid AS path segment type: {}", segment_type),
        )),
    }
}

pub fn encode_as_path(path: &AsPath, asn_len: AsnLength) -> Result<Bytes, ParserError> {
    if asn_len == AsnLength::Bits16 && path.has_4byte_asn() {
        return Err(ParserError::new(
            UpdateError::MALFORMED_AS_PATH,
            vec![],
            "AS path contains 4-octet AS numbers but the session uses 2-octet AS numbers",
        ));
    }

    let mut output = BytesMut::with_capacity(1024);
    for segment in path.segments.iter() {
        let (segment_type, asns) = match segment {
            AsPathSegment::AsSet(asns) => (AS_PATH_AS_SET, asns),
            AsPathSegment::AsSequence(asns) => (AS_PATH_AS_SEQUENCE, asns),
        };
        let count = u8::try_from(asns.len()).map_err(|_| {
            ParserError::new(
                UpdateError::MALFORMED_AS_PATH,
                vec![],
                format!("AS path segment of {} AS numbers is too long", asns.len()),
            )
        })?;
        output.put_u8(segment_type);
        output.put_u8(count);
        write_asns(asns, asn_len, &mut output);
    }
    Ok(output.freeze())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn as_path(value: AttributeValue) -> AsPath {
        match value {
            AttributeValue::AsPath(path) => path,
            v => panic!("not an AS path: {:?}", v),
        }
    }

    #[test]
    fn test_parse_as_path() {
        let data = Bytes::from(vec![
            2, // sequence
            3, // 3 ASes in path
            0, 1, // AS1
            0, 2, // AS2
            0, 3, // AS3
        ]);
        let path = as_path(parse_as_path(data, AsnLength::Bits16).unwrap());
        assert_eq!(path, AsPath::from_sequence([1, 2, 3]));
        assert_eq!(path.to_u32_vec(), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_parse_as_path_segments() {
        // 32 bits sequence followed by a set
        let data = Bytes::from(vec![
            2, 1, // sequence of one
            0, 1, 0, 0, // AS65536
            1, 2, // set of two
            0, 0, 0, 7, // AS7
            0, 0, 0, 8, // AS8
        ]);
        let path = as_path(parse_as_path(data, AsnLength::Bits32).unwrap());
        assert_eq!(
            path.segments,
            vec![AsPathSegment::sequence([65536]), AsPathSegment::set([7, 8])]
        );
        assert_eq!(path.segments[0].asns()[0].len, AsnLength::Bits32);
    }

    #[test]
    fn test_width_comes_from_context() {
        // one 4-octet AS, or one 2-octet AS followed by a bogus segment
        let data = Bytes::from(vec![2, 1, 0, 1, 0, 2]);
        assert_eq!(
            as_path(parse_as_path(data.clone(), AsnLength::Bits32).unwrap()),
            AsPath::from_sequence([65538])
        );
        assert!(parse_as_path(data, AsnLength::Bits16).is_err());
    }

    #[test]
    fn test_parse_as_path_errors() {
        // unknown segment type (confederation sequence)
        let err = parse_as_path(Bytes::from(vec![3, 1, 0, 1]), AsnLength::Bits16).unwrap_err();
        assert_eq!(
            err.bgp_error(),
            BgpError::UpdateError(UpdateError::MALFORMED_AS_PATH)
        );

        // count says 3 ASes, only 2 present
        let err =
            parse_as_path(Bytes::from(vec![2, 3, 0, 1, 0, 2]), AsnLength::Bits16).unwrap_err();
        assert_eq!(
            err.bgp_error(),
            BgpError::UpdateError(UpdateError::MALFORMED_AS_PATH)
        );

        // dangling segment header
        let err = parse_as_path(Bytes::from(vec![2]), AsnLength::Bits16).unwrap_err();
        assert_eq!(
            err.bgp_error(),
            BgpError::UpdateError(UpdateError::MALFORMED_AS_PATH)
        );
    }

    #[test]
    fn test_empty_as_path() {
        let path = as_path(parse_as_path(Bytes::new(), AsnLength::Bits16).unwrap());
        assert!(path.is_empty());
        assert!(encode_as_path(&path, AsnLength::Bits16).unwrap().is_empty());
    }

    #[test]
    fn test_encode_as_path() {
        let path = AsPath::from_sequence([65001, 65002]);
        let bytes = encode_as_path(&path, AsnLength::Bits16).unwrap();
        assert_eq!(bytes, Bytes::from_static(&[2, 2, 0xFD, 0xE9, 0xFD, 0xEA]));
        assert_eq!(
            as_path(parse_as_path(bytes, AsnLength::Bits16).unwrap()),
            path
        );

        let path = AsPath::from_segments(vec![
            AsPathSegment::sequence([4200000001]),
            AsPathSegment::set([1, 2]),
        ]);
        let bytes = encode_as_path(&path, AsnLength::Bits32).unwrap();
        assert_eq!(bytes.len(), 2 + 4 + 2 + 8);
        assert_eq!(
            as_path(parse_as_path(bytes, AsnLength::Bits32).unwrap()),
            path
        );
    }

    #[test]
    fn test_encode_as_path_errors() {
        let path = AsPath::from_sequence([4200000001]);
        assert_eq!(
            encode_as_path(&path, AsnLength::Bits16)
                .unwrap_err()
                .bgp_error(),
            BgpError::UpdateError(UpdateError::MALFORMED_AS_PATH)
        );

        let long: Vec<u32> = (1..=256).collect();
        assert!(encode_as_path(&AsPath::from_sequence(long), AsnLength::Bits16).is_err());
    }
}
