use super::{Needed, ParseError, ParseResult, Parser};
use bytes::{Buf, Bytes};

pub mod streaming {
    use super::*;

    pub fn take(count: impl Into<usize>) -> impl Parser<Bytes, Bytes> {
        let count: usize = count.into();
        move |input: &mut Bytes| {
            let needed = count.saturating_sub(input.len());
            if needed > 0 {
                Err(ParseError::Incomplete(Needed::Size(needed)))
            } else {
                let output = input.split_to(count);
                Ok(output)
            }
        }
    }

    pub fn literal(lit: u8) -> impl Parser<Bytes, u8> {
        move |input: &mut Bytes| {
            let b = take(1usize).parse(input)?.get_u8();
            if b == lit {
                Ok(lit)
            } else {
                Err(ParseError::recoverable(()))
            }
        }
    }
}

pub mod complete {
    use super::*;
    use crate::parse::combinators;

    fn map_incomplete<O>(res: ParseResult<O>) -> ParseResult<O> {
        match res {
            Err(ParseError::Incomplete(_)) => Err(ParseError::recoverable(())),
            _ => res,
        }
    }

    pub fn take(count: impl Into<usize>) -> impl Parser<Bytes, Bytes> {
        let parser = streaming::take(count);
        move |input: &mut Bytes| {
            let res = parser.parse(input);
            map_incomplete(res)
        }
    }

    pub fn literal(lit: u8) -> impl Parser<Bytes, u8> {
        let parser = streaming::literal(lit);
        move |input: &mut Bytes| {
            let res = parser.parse(input);
            map_incomplete(res)
        }
    }

    // Consumes the given number of bytes without producing any output
    pub fn skip(count: impl Into<usize>) -> impl Parser<Bytes, ()> {
        combinators::map(take(count), |_| ())
    }
}

pub fn rest(input: &mut Bytes) -> ParseResult<Bytes> {
    Ok(input.split_to(input.len()))
}

macro_rules! impl_int {
    ($un:ident, 1) => {
        paste::paste! {
            pub fn [<be_ $un>](input: &mut Bytes) -> ParseResult<$un> {
                if input.remaining() < 1 {
                    Err(ParseError::Incomplete(Needed::Size(1)))
                } else {
                    Ok(input.[<get_ $un>]())
                }
            }
        }
    };
    ($un:ident, $bytes:literal) => {
        paste::paste! {
            pub fn [<be_ $un>](input: &mut Bytes) -> ParseResult<$un> {
                if input.remaining() < $bytes {
                    Err(ParseError::Incomplete(Needed::Size($bytes)))
                } else {
                    Ok(input.[<get_ $un>]())
                }
            }

            pub fn [<le_ $un>](input: &mut Bytes) -> ParseResult<$un> {
                if input.remaining() < $bytes {
                    Err(ParseError::Incomplete(Needed::Size($bytes)))
                } else {
                    Ok(input.[<get_ $un _le>]())
                }
            }
        }
    };
}

impl_int!(u8, 1);
impl_int!(u16, 2);
impl_int!(u32, 4);
impl_int!(u64, 8);
impl_int!(i8, 1);
impl_int!(i16, 2);
impl_int!(i32, 4);
impl_int!(i64, 8);

/// Parses a 24-bit big-endian unsigned integer
pub fn be_u24(input: &mut Bytes) -> ParseResult<u32> {
    if input.remaining() < 3 {
        Err(ParseError::Incomplete(Needed::Size(3)))
    } else {
        Ok(input.get_uint(3) as u32)
    }
}

/// Parses a big-endian unsigned integer with the given width in bytes (1..=8)
pub fn be_uint(size: impl Into<usize>) -> impl Parser<Bytes, u64> {
    let size: usize = size.into();
    move |input: &mut Bytes| {
        if input.remaining() < size {
            Err(ParseError::Incomplete(Needed::Size(size)))
        } else {
            Ok(input.get_uint(size))
        }
    }
}

/// Parses a big-endian two's-complement signed integer with the given width in bytes (1..=8)
pub fn be_int(size: impl Into<usize>) -> impl Parser<Bytes, i64> {
    let size: usize = size.into();
    move |input: &mut Bytes| {
        if input.remaining() < size {
            Err(ParseError::Incomplete(Needed::Size(size)))
        } else {
            Ok(input.get_int(size))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hex_bytes;

    #[test]
    fn test_take_streaming() {
        let mut input = hex_bytes!("010203");
        assert_eq!(
            streaming::take(2usize).parse(&mut input),
            Ok(hex_bytes!("0102"))
        );
        assert_eq!(
            streaming::take(2usize).parse(&mut input),
            Err(ParseError::Incomplete(Needed::Size(1)))
        );
    }

    #[test]
    fn test_be_int_sizes() {
        let mut input = hex_bytes!("ff");
        assert_eq!(be_int(1usize).parse(&mut input), Ok(-1));

        let mut input = hex_bytes!("00c8");
        assert_eq!(be_int(2usize).parse(&mut input), Ok(200));

        let mut input = hex_bytes!("fffffc18");
        assert_eq!(be_int(4usize).parse(&mut input), Ok(-1000));
    }

    #[test]
    fn test_be_u24() {
        let mut input = hex_bytes!("015180");
        assert_eq!(be_u24(&mut input), Ok(86400));
    }
}
