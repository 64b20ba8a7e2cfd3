use super::{
    bytes::{be_u8, complete::take},
    combinators::map_parser,
    ParseResult, Parser, ToLength,
};
use bitvec::prelude::*;
use bytes::Bytes;

pub fn many_0<I, O, P>(parser: P) -> impl Parser<I, Vec<O>>
where
    I: Clone,
    P: Parser<I, O>,
{
    move |input: &mut I| {
        let mut output = Vec::new();
        while let Ok(o) = parser.parse_peek(input) {
            output.push(o);
        }
        Ok(output)
    }
}

pub fn length_data<N, P>(length_parser: P) -> impl Parser<Bytes, Bytes>
where
    P: Parser<Bytes, N>,
    N: ToLength,
{
    move |input: &mut Bytes| {
        let length = length_parser.parse(input)?.to_length();
        take(length).parse(input)
    }
}

pub fn length_value<O, N, P, PV>(length_parser: P, value_parser: PV) -> impl Parser<Bytes, O>
where
    P: Parser<Bytes, N>,
    N: ToLength,
    PV: Parser<Bytes, O>,
{
    map_parser(length_data(length_parser), value_parser)
}

macro_rules! impl_parser_for_tuple {
    ($($idx:literal),+) => {
        paste::paste! {
            impl<I, $([<P $idx>], [<O $idx>]),+> Parser<I, ($([<O $idx>]),+,)> for ($([<P $idx>]),+,)
            where
                I: Clone,
            $(
                [<P $idx>]: Parser<I, [<O $idx>]>,
            )+
            {
                fn parse(&self, input: &mut I) -> ParseResult<($([<O $idx>]),+,)> {
                    Ok((
                        $(
                            self.$idx.parse(input)?,
                        )+
                    ))
                }
            }
        }
    };
}

impl_parser_for_tuple!(0);
impl_parser_for_tuple!(0, 1);
impl_parser_for_tuple!(0, 1, 2);
impl_parser_for_tuple!(0, 1, 2, 3);
impl_parser_for_tuple!(0, 1, 2, 3, 4);
impl_parser_for_tuple!(0, 1, 2, 3, 4, 5);
impl_parser_for_tuple!(0, 1, 2, 3, 4, 5, 6);
impl_parser_for_tuple!(0, 1, 2, 3, 4, 5, 6, 7);
impl_parser_for_tuple!(0, 1, 2, 3, 4, 5, 6, 7, 8);
impl_parser_for_tuple!(0, 1, 2, 3, 4, 5, 6, 7, 8, 9);
impl_parser_for_tuple!(0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10);
impl_parser_for_tuple!(0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11);

/// Parses a bitmask into a `Vec<u8>`. The least significant bit of the first byte is
/// mapped to `bit0_value`. The first byte of the input is the bitmask length.
pub fn variable_length_bitmask_u8(i: &mut Bytes, bit0_value: u8) -> ParseResult<Vec<u8>> {
    let bitmask = length_data(be_u8).parse(i)?;

    let view = bitmask.view_bits::<Lsb0>();
    let ret = view
        .iter_ones()
        .map(|index| (index as u8) + bit0_value)
        .collect::<Vec<_>>();
    Ok(ret)
}

/// Parses a bitmask with the given length into a `Vec<u8>`. The least significant bit
/// of the first byte is mapped to `bit0_value`.
pub fn fixed_length_bitmask_u8(
    i: &mut Bytes,
    bit0_value: u8,
    bitmask_len: usize,
) -> ParseResult<Vec<u8>> {
    let bitmask = take(bitmask_len).parse(i)?;

    let view = bitmask.view_bits::<Lsb0>();
    let ret = view
        .iter_ones()
        .map(|index| (index as u8) + bit0_value)
        .collect::<Vec<_>>();
    Ok(ret)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hex_bytes;

    #[test]
    fn test_fixed_length_bitmask() {
        // bits 0 and 2 of the first byte, bit 0 of the second
        let mut input = hex_bytes!("0501");
        let values = fixed_length_bitmask_u8(&mut input, 1, 2).unwrap();
        assert_eq!(values, vec![1, 3, 9]);
    }

    #[test]
    fn test_length_data() {
        let mut input = hex_bytes!("020a0bff");
        let data = length_data(be_u8).parse(&mut input).unwrap();
        assert_eq!(data, hex_bytes!("0a0b"));
        assert_eq!(input, hex_bytes!("ff"));
    }
}
