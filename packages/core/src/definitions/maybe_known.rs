use crate::parse::{bytes::be_u8, Parsable, ParseResult};
use crate::serialize::{self, Serializable};
use bytes::{Bytes, BytesMut};
use std::fmt::Display;

/// A wire byte that maps into a known symbol table, or is carried verbatim when
/// the table does not contain it. Decoding through this type never fails, which
/// keeps the codec total on arbitrary gateway input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaybeKnown<T> {
    Known(T),
    Unknown(u8),
}

/// Implemented by `repr(u8)` symbol tables so [MaybeKnown] values of them can
/// move through the codec. Use [impl_maybe_known_codec](crate::impl_maybe_known_codec)
/// instead of implementing this by hand.
pub trait ByteEnum: Sized + Copy {
    fn try_from_byte(b: u8) -> Option<Self>;
    fn to_byte(self) -> u8;
}

impl<T> MaybeKnown<T> {
    pub fn known(&self) -> Option<&T> {
        match self {
            Self::Known(t) => Some(t),
            Self::Unknown(_) => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}

impl<T: Display> Display for MaybeKnown<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Known(t) => write!(f, "{}", t),
            Self::Unknown(b) => write!(f, "Unknown ({:#04x})", b),
        }
    }
}

impl<T: ByteEnum> From<u8> for MaybeKnown<T> {
    fn from(b: u8) -> Self {
        T::try_from_byte(b)
            .map(Self::Known)
            .unwrap_or(Self::Unknown(b))
    }
}

impl<T: ByteEnum> From<MaybeKnown<T>> for u8 {
    fn from(val: MaybeKnown<T>) -> Self {
        match val {
            MaybeKnown::Known(t) => t.to_byte(),
            MaybeKnown::Unknown(b) => b,
        }
    }
}

impl<T: ByteEnum> Parsable for MaybeKnown<T> {
    fn parse(i: &mut Bytes) -> ParseResult<Self> {
        Ok(Self::from(be_u8(i)?))
    }
}

impl<T: ByteEnum> Serializable for MaybeKnown<T> {
    fn serialize(&self, output: &mut BytesMut) {
        serialize::bytes::be_u8(u8::from(*self)).serialize(output)
    }
}

/// Wires a `repr(u8)` enum with a `TryFrom<u8>` implementation into the
/// `MaybeKnown` codec.
#[macro_export]
macro_rules! impl_maybe_known_codec {
    ($t:ty) => {
        impl $crate::definitions::ByteEnum for $t {
            fn try_from_byte(b: u8) -> Option<Self> {
                <$t>::try_from(b).ok()
            }

            fn to_byte(self) -> u8 {
                self as u8
            }
        }

        impl From<$t> for $crate::definitions::MaybeKnown<$t> {
            fn from(t: $t) -> Self {
                Self::Known(t)
            }
        }
    };
}
