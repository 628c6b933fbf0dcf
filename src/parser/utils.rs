/*!
Provides IO utility functions for reading fields of different length and converting them to
corresponding structs, and the matching write helpers.

Every read checks the remaining length first and returns [ParserError::NotEnoughBytes] instead
of panicking when the input is short.
*/
use crate::error::ParserError;
use crate::models::*;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use ipnet::Ipv4Net;
use std::net::Ipv4Addr;

impl ReadUtils for Bytes {}

pub trait ReadUtils: Buf {
    #[inline]
    fn has_n_remaining(&self, n: usize) -> Result<(), ParserError> {
        let remaining = self.remaining();
        if remaining < n {
            Err(ParserError::NotEnoughBytes {
                needed: n,
                remaining,
            })
        } else {
            Ok(())
        }
    }

    /// Checks that a fixed-size attribute value has exactly `n` bytes.
    fn expect_remaining_eq(&self, n: usize, name: &'static str) -> Result<(), ParserError> {
        let remaining = self.remaining();
        if remaining != n {
            return Err(ParserError::new(
                UpdateError::ATTRIBUTE_LENGTH_ERROR,
                vec![],
                format!("{} must be {} bytes, got {}", name, n, remaining),
            ));
        }
        Ok(())
    }

    #[inline]
    fn read_u8(&mut self) -> Result<u8, ParserError> {
        self.has_n_remaining(1)?;
        Ok(self.get_u8())
    }

    #[inline]
    fn read_u16(&mut self) -> Result<u16, ParserError> {
        self.has_n_remaining(2)?;
        Ok(self.get_u16())
    }

    #[inline]
    fn read_u32(&mut self) -> Result<u32, ParserError> {
        self.has_n_remaining(4)?;
        Ok(self.get_u32())
    }

    fn read_ipv4_address(&mut self) -> Result<Ipv4Addr, ParserError> {
        let addr = self.read_u32()?;
        Ok(Ipv4Addr::from(addr))
    }

    #[inline]
    fn read_asn(&mut self, as_length: AsnLength) -> Result<Asn, ParserError> {
        match as_length {
            AsnLength::Bits16 => self.read_u16().map(Asn::new_16bit),
            AsnLength::Bits32 => self.read_u32().map(Asn::new_32bit),
        }
    }

    fn read_asns(&mut self, as_length: AsnLength, count: usize) -> Result<Vec<Asn>, ParserError> {
        self.has_n_remaining(count * as_length.octets())?;
        let mut path = Vec::with_capacity(count);
        for _ in 0..count {
            path.push(self.read_asn(as_length)?);
        }
        Ok(path)
    }

    fn read_n_bytes(&mut self, n_bytes: usize) -> Result<Vec<u8>, ParserError> {
        self.has_n_remaining(n_bytes)?;
        Ok(self.copy_to_bytes(n_bytes).into())
    }

    /// Read one announced/withdrawn IPv4 prefix.
    ///
    /// The length in bits is 1 byte, followed by the minimal number of bytes covering it. Bits
    /// past the prefix length are dropped.
    fn read_nlri_prefix(&mut self) -> Result<NetworkPrefix, ParserError> {
        // Length in bits
        let bit_len = self.read_u8()?;
        if bit_len > 32 {
            return Err(ParserError::new(
                UpdateError::ATTRIBUTE_LENGTH_ERROR,
                vec![],
                format!("invalid IPv4 prefix length {}", bit_len),
            ));
        }

        // Convert to bytes
        let byte_len = (bit_len as usize).div_ceil(8);
        self.has_n_remaining(byte_len)?;
        let mut buff = [0u8; 4];
        self.copy_to_slice(&mut buff[..byte_len]);

        let prefix = Ipv4Net::new(Ipv4Addr::from(buff), bit_len).map_err(|_| {
            ParserError::new(
                UpdateError::ATTRIBUTE_LENGTH_ERROR,
                vec![],
                format!("invalid IPv4 prefix length {}", bit_len),
            )
        })?;
        Ok(NetworkPrefix::new(prefix))
    }
}

/// Reads prefixes until the input is exhausted.
pub fn parse_nlri_list(mut input: Bytes) -> Result<Vec<NetworkPrefix>, ParserError> {
    let mut prefixes = vec![];
    while input.has_remaining() {
        prefixes.push(input.read_nlri_prefix()?);
    }
    Ok(prefixes)
}

pub fn encode_nlri_prefixes(prefixes: &[NetworkPrefix]) -> Bytes {
    let mut bytes = BytesMut::with_capacity(prefixes.iter().map(|p| p.encoded_len()).sum());
    for prefix in prefixes {
        prefix.encode_to(&mut bytes);
    }
    bytes.freeze()
}

/// Writes an AS number with the given width.
///
/// The caller checks that a 4-octet value fits before asking for `Bits16`; the value is truncated
/// otherwise.
pub fn write_asn(asn: &Asn, asn_len: AsnLength, output: &mut BytesMut) {
    match asn_len {
        AsnLength::Bits16 => output.put_u16(asn.asn as u16),
        AsnLength::Bits32 => output.put_u32(asn.asn),
    }
}

pub fn write_asns(asns: &[Asn], asn_len: AsnLength, output: &mut BytesMut) {
    for asn in asns {
        write_asn(asn, asn_len, output);
    }
}
