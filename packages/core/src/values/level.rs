use crate::parse::{bytes::be_u8, combinators::map_res, Parsable, ParseError, Parser};
use crate::serialize::{self, Serializable};
use bytes::{Bytes, BytesMut};
use std::fmt::Display;

pub const LEVEL_MAX: u8 = 99;
pub const LEVEL_UNKNOWN: u8 = 0xfe;
pub const LEVEL_ON: u8 = 0xff;

/// Represents a level (dimmer percentage, 0-99) reported by a device
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LevelReport {
    Level(u8),
    Unknown,
}

impl TryFrom<u8> for LevelReport {
    type Error = ParseError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            LEVEL_UNKNOWN => Ok(Self::Unknown),
            LEVEL_ON => Ok(Self::Level(LEVEL_MAX)),
            0..=LEVEL_MAX => Ok(Self::Level(value)),
            _ => Err(ParseError::recoverable("invalid level report value")),
        }
    }
}

impl Display for LevelReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelReport::Level(level) => write!(f, "{}", level),
            LevelReport::Unknown => write!(f, "Unknown"),
        }
    }
}

impl Parsable for LevelReport {
    fn parse(i: &mut Bytes) -> crate::parse::ParseResult<Self> {
        map_res(be_u8, Self::try_from).parse(i)
    }
}

impl Serializable for LevelReport {
    fn serialize(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        let val = match self {
            Self::Level(level) => *level,
            Self::Unknown => LEVEL_UNKNOWN,
        };
        be_u8(val).serialize(output)
    }
}

/// Represents a level (0-99 or "restore previous") sent to a device
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LevelSet {
    Level(u8),
    /// Restore the previous non-zero level
    On,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("level {0} is outside the valid range 0..=99")]
pub struct InvalidLevel(pub u8);

impl LevelSet {
    /// Creates a level, validating the 0..=99 range
    pub fn new(level: u8) -> Result<Self, InvalidLevel> {
        match level {
            0..=LEVEL_MAX => Ok(Self::Level(level)),
            _ => Err(InvalidLevel(level)),
        }
    }
}

impl Parsable for LevelSet {
    fn parse(i: &mut Bytes) -> crate::parse::ParseResult<Self> {
        map_res(be_u8, |value| match value {
            0..=LEVEL_MAX => Ok(Self::Level(value)),
            LEVEL_ON => Ok(Self::On),
            _ => Err(ParseError::recoverable("invalid level set value")),
        })
        .parse(i)
    }
}

impl Serializable for LevelSet {
    fn serialize(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        let val = match self {
            Self::Level(level) => *level,
            Self::On => LEVEL_ON,
        };
        be_u8(val).serialize(output)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_level_report() {
        assert_eq!(LevelReport::try_from(0), Ok(LevelReport::Level(0)));
        assert_eq!(LevelReport::try_from(99), Ok(LevelReport::Level(99)));
        assert_eq!(LevelReport::try_from(0xff), Ok(LevelReport::Level(99)));
        assert_eq!(LevelReport::try_from(0xfe), Ok(LevelReport::Unknown));
        assert!(LevelReport::try_from(100).is_err());
    }

    #[test]
    fn test_level_set_range() {
        assert!(LevelSet::new(99).is_ok());
        assert!(LevelSet::new(100).is_err());
    }
}
