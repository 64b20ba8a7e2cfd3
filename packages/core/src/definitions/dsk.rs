use crate::parse::{bytes::complete::take, Parsable, ParseResult, Parser};
use crate::serialize::{self, Serializable};
use bytes::{Bytes, BytesMut};
use std::fmt::{Debug, Display};
use std::str::FromStr;

/// A device-specific key: the public half of a device's S2 identity.
///
/// A full DSK is 16 bytes and is presented to users as eight dash-separated
/// five-digit decimal groups, each group being a big-endian 16-bit chunk:
/// `"50285-18819-09924-30691-15973-33711-04005-03623"`.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct Dsk(Vec<u8>);

pub const DSK_LENGTH: usize = 16;

impl Dsk {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The first 16-bit chunk, which inclusion prompts ask the user to verify
    pub fn pin(&self) -> Option<u16> {
        match self.0.as_slice() {
            [hi, lo, ..] => Some(u16::from_be_bytes([*hi, *lo])),
            _ => None,
        }
    }
}

impl Debug for Dsk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Dsk({})", self)
    }
}

impl Display for Dsk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let groups = self
            .0
            .chunks(2)
            .map(|chunk| match chunk {
                [hi, lo] => format!("{:05}", u16::from_be_bytes([*hi, *lo])),
                [single] => format!("{:05}", *single as u16),
                _ => unreachable!(),
            })
            .collect::<Vec<_>>();
        write!(f, "{}", groups.join("-"))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid DSK string: {0}")]
pub struct InvalidDsk(String);

impl FromStr for Dsk {
    type Err = InvalidDsk;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Self(Vec::new()));
        }

        let mut bytes = Vec::with_capacity(DSK_LENGTH);
        for group in s.split('-') {
            let chunk: u16 = group.parse().map_err(|_| InvalidDsk(s.to_string()))?;
            bytes.extend_from_slice(&chunk.to_be_bytes());
        }
        Ok(Self(bytes))
    }
}

impl From<Dsk> for Vec<u8> {
    fn from(val: Dsk) -> Self {
        val.0
    }
}

impl Dsk {
    /// Parses a DSK with the given byte length
    pub fn parse_with_length(i: &mut Bytes, len: usize) -> ParseResult<Self> {
        let bytes = take(len).parse(i)?;
        Ok(Self(bytes.to_vec()))
    }
}

impl Parsable for Dsk {
    fn parse(i: &mut Bytes) -> ParseResult<Self> {
        Self::parse_with_length(i, DSK_LENGTH)
    }
}

impl Serializable for Dsk {
    fn serialize(&self, output: &mut BytesMut) {
        use serialize::bytes::slice;
        slice(&self.0).serialize(output)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const DSK_STR: &str = "50285-18819-09924-30691-15973-33711-04005-03623";
    const DSK_BYTES: [u8; 16] = [
        0xc4, 0x6d, 0x49, 0x83, 0x26, 0xc4, 0x77, 0xe3, 0x3e, 0x65, 0x83, 0xaf, 0x0f, 0xa5, 0x0e,
        0x27,
    ];

    #[test]
    fn test_from_str() {
        let dsk: Dsk = DSK_STR.parse().unwrap();
        assert_eq!(dsk.as_slice(), &DSK_BYTES);
    }

    #[test]
    fn test_display() {
        let dsk = Dsk::new(DSK_BYTES.to_vec());
        assert_eq!(dsk.to_string(), DSK_STR);
    }

    #[test]
    fn test_empty() {
        let dsk: Dsk = "".parse().unwrap();
        assert!(dsk.is_empty());
        assert_eq!(dsk.to_string(), "");
    }

    #[test]
    fn test_pin() {
        let dsk = Dsk::new(DSK_BYTES.to_vec());
        assert_eq!(dsk.pin(), Some(50285));
    }
}
