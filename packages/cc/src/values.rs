use bytes::{Bytes, BytesMut};
use ux::{u2, u3};
use zip_core::parse::{bits, bytes::be_int, BitParsable, ParseError, ParseResult, Parser};
use zip_core::serialize::{self, BitSerializable, Serializable};

/// A numeric reading encoded as `precision(3) scale(2) size(3)` followed by a
/// signed big-endian integer of `size` bytes.
///
/// The physical value is `value · 10^(-precision)`; `scale` selects the unit and
/// is reported separately. Both the scaled integer and the precision are kept so
/// callers that need the exact reading do not lose digits to rounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScaledValue {
    pub value: i64,
    pub precision: u8,
    pub scale: u8,
    pub size: u8,
}

impl ScaledValue {
    pub fn new(value: i64, precision: u8, scale: u8, size: u8) -> Self {
        Self {
            value,
            precision,
            scale,
            size,
        }
    }

    /// The reading rounded to an integer, i.e. `round(value · 10^(-precision))`
    pub fn rounded(&self) -> i64 {
        let divisor = 10i64.pow(self.precision as u32);
        let half = divisor / 2;
        let value = self.value;
        if value >= 0 {
            (value + half) / divisor
        } else {
            (value - half) / divisor
        }
    }

    /// The reading as a float, for callers that want the full precision
    pub fn as_f64(&self) -> f64 {
        self.value as f64 / 10f64.powi(self.precision as i32)
    }
}

fn validate_size(size: u8) -> ParseResult<()> {
    match size {
        1 | 2 | 4 => Ok(()),
        _ => Err(ParseError::validation_failure(format!(
            "invalid value size {}",
            size
        ))),
    }
}

impl ScaledValue {
    /// Parses the packed `precision/scale/size` byte and the following value bytes.
    /// Sizes other than 1, 2 or 4 are a decode error.
    pub fn parse(i: &mut Bytes) -> ParseResult<Self> {
        let (precision, scale, size) =
            bits::bits((u3::parse, u2::parse, u3::parse)).parse(i)?;
        let size = u8::from(size);
        validate_size(size)?;
        let value = be_int(size as usize).parse(i)?;

        Ok(Self {
            value,
            precision: u8::from(precision),
            scale: u8::from(scale),
            size,
        })
    }

    pub fn serialize(&self, output: &mut BytesMut) {
        use serialize::bits::bits;
        use serialize::bytes::be_int;
        bits(|bo| {
            u3::new(self.precision & 0b111).write(bo);
            u2::new(self.scale & 0b11).write(bo);
            u3::new(self.size & 0b111).write(bo);
        })
        .serialize(output);
        be_int(self.value, self.size as usize).serialize(output);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use zip_core::hex_bytes;

    #[test]
    fn test_parse() {
        // precision = 1, scale = 0, size = 2, value = 200
        let mut input = hex_bytes!("2200c8");
        let value = ScaledValue::parse(&mut input).unwrap();
        assert_eq!(value, ScaledValue::new(200, 1, 0, 2));
        assert_eq!(value.rounded(), 20);
    }

    #[test]
    fn test_negative_value() {
        // precision = 1, scale = 0, size = 2, value = -55 (-5.5 degrees)
        let mut input = hex_bytes!("22ffc9");
        let value = ScaledValue::parse(&mut input).unwrap();
        assert_eq!(value.value, -55);
        assert_eq!(value.rounded(), -6);
    }

    #[test]
    fn test_invalid_size() {
        // size = 3 is not allowed
        let mut input = hex_bytes!("23010203");
        assert!(ScaledValue::parse(&mut input).is_err());
    }

    #[test]
    fn test_roundtrip() {
        let value = ScaledValue::new(-1234, 2, 1, 4);
        let mut buf = BytesMut::new();
        value.serialize(&mut buf);
        let mut input = buf.freeze();
        assert_eq!(ScaledValue::parse(&mut input).unwrap(), value);
    }

    #[test]
    fn test_rounding() {
        assert_eq!(ScaledValue::new(25, 1, 0, 1).rounded(), 3);
        assert_eq!(ScaledValue::new(24, 1, 0, 1).rounded(), 2);
        assert_eq!(ScaledValue::new(200, 1, 0, 2).rounded(), 20);
        assert_eq!(ScaledValue::new(0, 0, 0, 1).rounded(), 0);
    }
}
