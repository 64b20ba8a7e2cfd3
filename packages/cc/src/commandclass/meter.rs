use crate::commandclass::{CCBase, CCId, CCParsable, CCParsingContext, CCSerializable, CC};
use crate::values::ScaledValue;
use bytes::{Bytes, BytesMut};
use derive_try_from_primitive::TryFromPrimitive;
use typed_builder::TypedBuilder;
use ux::{u2, u5};
use zip_core::parse::{
    bits,
    bytes::{be_int, be_u16},
    combinators::opt,
    BitParsable, ParseResult, Parser,
};
use zip_core::prelude::*;
use zip_core::serialize::{self, BitSerializable, Serializable};

#[derive(Debug, Clone, Copy, PartialEq, TryFromPrimitive)]
#[repr(u8)]
pub enum MeterCCCommand {
    Get = 0x01,
    Report = 0x02,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum MeterType {
    Electric = 0x01,
    Gas = 0x02,
    Water = 0x03,
    Heating = 0x04,
    Cooling = 0x05,
}

zip_core::impl_maybe_known_codec!(MeterType);

#[derive(Default, Debug, Clone, PartialEq, TypedBuilder)]
#[builder(field_defaults(default))]
pub struct MeterCCGet {
    /// Which scale to request. Only understood by version 2+ devices.
    #[builder(setter(into))]
    pub scale: Option<u8>,
}

impl CCBase for MeterCCGet {
    fn expects_report(&self) -> bool {
        true
    }

    fn test_report(&self, report: &CC) -> bool {
        matches!(report, CC::MeterCCReport(_))
    }
}

impl CCId for MeterCCGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Meter
    }

    fn cc_command(&self) -> Option<u8> {
        Some(MeterCCCommand::Get as _)
    }
}

impl CCParsable for MeterCCGet {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let scale = opt(zip_core::parse::bytes::be_u8)
            .parse(i)?
            .map(|b| (b >> 3) & 0b111);
        Ok(Self { scale })
    }
}

impl CCSerializable for MeterCCGet {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        if let Some(scale) = self.scale {
            be_u8((scale & 0b111) << 3).serialize(output);
        }
    }
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct MeterCCReport {
    pub meter_type: MaybeKnown<MeterType>,
    pub rate_type: u8,
    /// The 3-bit scale: bit 2 comes from the meter-type byte, bits 1..0 from the
    /// precision byte
    pub scale: u8,
    pub value: ScaledValue,
    #[builder(default, setter(into))]
    pub delta_time: Option<u16>,
    #[builder(default, setter(into))]
    pub previous_value: Option<i64>,
}

impl CCBase for MeterCCReport {}

impl CCId for MeterCCReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Meter
    }

    fn cc_command(&self) -> Option<u8> {
        Some(MeterCCCommand::Report as _)
    }
}

impl CCParsable for MeterCCReport {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let (scale2, rate_type, meter_type) =
            bits::bits((bits::bool, u2::parse, u5::parse)).parse(i)?;
        let value = ScaledValue::parse(i)?;
        let scale = ((scale2 as u8) << 2) | value.scale;

        let delta_time = opt(be_u16).parse(i)?;
        let previous_value = match delta_time {
            Some(dt) if dt > 0 => opt(be_int(value.size as usize)).parse(i)?,
            _ => None,
        };

        Ok(Self {
            meter_type: MaybeKnown::from(u8::from(meter_type)),
            rate_type: u8::from(rate_type),
            scale,
            value,
            delta_time,
            previous_value,
        })
    }
}

impl CCSerializable for MeterCCReport {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bits::bits;
        use serialize::bytes::{be_int, be_u16};

        let scale2 = self.scale & 0b100 != 0;
        bits(|bo| {
            scale2.write(bo);
            u2::new(self.rate_type & 0b11).write(bo);
            u5::new(u8::from(self.meter_type) & 0b1_1111).write(bo);
        })
        .serialize(output);

        let value = ScaledValue {
            scale: self.scale & 0b11,
            ..self.value
        };
        value.serialize(output);

        if let Some(delta_time) = self.delta_time {
            be_u16(delta_time).serialize(output);
            if let Some(previous_value) = self.previous_value {
                be_int(previous_value, self.value.size as usize).serialize(output);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use zip_core::hex_bytes;

    #[test]
    fn test_report_electric_kwh() {
        let ctx = CCParsingContext::default();
        // meter type = electric, precision = 2, scale = 0 (kWh), size = 4, value = 123456
        let mut input = hex_bytes!("21440001e240");
        let report = MeterCCReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(report.meter_type, MaybeKnown::Known(MeterType::Electric));
        assert_eq!(report.rate_type, 1);
        assert_eq!(report.scale, 0);
        assert_eq!(report.value.value, 123456);
        assert_eq!(report.value.rounded(), 1235);
    }

    #[test]
    fn test_report_split_scale() {
        let ctx = CCParsingContext::default();
        // scale2 = 1 (bit 7 of the first byte), scale10 = 1 -> scale = 0b101
        let mut input = hex_bytes!("a10a0064");
        let report = MeterCCReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(report.scale, 0b101);
        assert_eq!(report.value.value, 100);
    }

    #[test]
    fn test_report_with_previous_value() {
        let ctx = CCParsingContext::default();
        // size = 1, value = 50, delta = 60 s, previous = 45
        let mut input = hex_bytes!("210932003c2d");
        let report = MeterCCReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(report.value.value, 50);
        assert_eq!(report.delta_time, Some(60));
        assert_eq!(report.previous_value, Some(45));
    }
}
