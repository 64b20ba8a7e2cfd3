use crate::parse::{bytes::be_u8, combinators::map_res, Parsable, ParseError, Parser};
use crate::serialize::{self, Serializable};
use bytes::{Bytes, BytesMut};

// All values from 1 to BINARY_SET_MAX are interpreted as ON in SET commands
pub const BINARY_SET_MAX: u8 = 99;
pub const BINARY_UNKNOWN: u8 = 0xfe;
pub const BINARY_ON: u8 = 0xff;

/// Represents a binary value reported by a device
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(u8)]
pub enum BinaryReport {
    Off = 0,
    Unknown = BINARY_UNKNOWN,
    On = BINARY_ON,
}

impl TryFrom<u8> for BinaryReport {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Off),
            BINARY_UNKNOWN => Ok(Self::Unknown),
            BINARY_ON => Ok(Self::On),
            _ => Err(ParseError::recoverable("invalid binary report value")),
        }
    }
}

impl Parsable for BinaryReport {
    fn parse(i: &mut Bytes) -> crate::parse::ParseResult<Self> {
        map_res(be_u8, Self::try_from).parse(i)
    }
}

impl Serializable for BinaryReport {
    fn serialize(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        be_u8(*self as u8).serialize(output)
    }
}

impl From<Option<bool>> for BinaryReport {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => Self::On,
            Some(false) => Self::Off,
            None => Self::Unknown,
        }
    }
}

impl From<BinaryReport> for Option<bool> {
    fn from(value: BinaryReport) -> Self {
        match value {
            BinaryReport::On => Some(true),
            BinaryReport::Off => Some(false),
            BinaryReport::Unknown => None,
        }
    }
}

/// Represents a binary value sent to a device
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(u8)]
pub enum BinarySet {
    Off = 0,
    On = BINARY_ON,
}

impl TryFrom<u8> for BinarySet {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Off),
            1..=BINARY_SET_MAX | BINARY_ON => Ok(Self::On),
            _ => Err(ParseError::recoverable("invalid binary set value")),
        }
    }
}

impl Parsable for BinarySet {
    fn parse(i: &mut Bytes) -> crate::parse::ParseResult<Self> {
        map_res(be_u8, Self::try_from).parse(i)
    }
}

impl Serializable for BinarySet {
    fn serialize(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        be_u8(*self as u8).serialize(output)
    }
}

impl From<bool> for BinarySet {
    fn from(value: bool) -> Self {
        if value {
            Self::On
        } else {
            Self::Off
        }
    }
}

impl From<BinarySet> for bool {
    fn from(value: BinarySet) -> Self {
        matches!(value, BinarySet::On)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_binary_report() {
        assert_eq!(BinaryReport::try_from(0), Ok(BinaryReport::Off));
        assert!(BinaryReport::try_from(1).is_err());
        assert!(BinaryReport::try_from(99).is_err());
        assert_eq!(BinaryReport::try_from(0xfe), Ok(BinaryReport::Unknown));
        assert_eq!(BinaryReport::try_from(0xff), Ok(BinaryReport::On));
    }

    #[test]
    fn test_binary_set() {
        assert_eq!(BinarySet::try_from(0), Ok(BinarySet::Off));
        assert_eq!(BinarySet::try_from(1), Ok(BinarySet::On));
        assert_eq!(BinarySet::try_from(99), Ok(BinarySet::On));
        assert!(BinarySet::try_from(100).is_err());
        assert!(BinarySet::try_from(0xfe).is_err());
        assert_eq!(BinarySet::try_from(0xff), Ok(BinarySet::On));
    }
}
