use crate::commandclass::{CCBase, CCId, CCParsable, CCParsingContext, CCSerializable, CC};
use bytes::{Bytes, BytesMut};
use derive_try_from_primitive::TryFromPrimitive;
use typed_builder::TypedBuilder;
use zip_core::parse::{bytes::be_u8, ParseResult};
use zip_core::prelude::*;
use zip_core::serialize::{self, Serializable};

#[derive(Debug, Clone, Copy, PartialEq, TryFromPrimitive)]
#[repr(u8)]
pub enum BatteryCCCommand {
    Get = 0x02,
    Report = 0x03,
}

/// A battery charge report. 0xFF is the low-battery warning, not a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatteryLevel {
    Percent(u8),
    LowWarning,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct BatteryCCGet {}

impl CCBase for BatteryCCGet {
    fn expects_report(&self) -> bool {
        true
    }

    fn test_report(&self, report: &CC) -> bool {
        matches!(report, CC::BatteryCCReport(_))
    }
}

impl CCId for BatteryCCGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Battery
    }

    fn cc_command(&self) -> Option<u8> {
        Some(BatteryCCCommand::Get as _)
    }
}

impl CCParsable for BatteryCCGet {
    fn parse(_i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        // No payload
        Ok(Self {})
    }
}

impl CCSerializable for BatteryCCGet {
    fn serialize_payload(&self, _output: &mut BytesMut) {}
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct BatteryCCReport {
    pub level: BatteryLevel,
}

impl CCBase for BatteryCCReport {}

impl CCId for BatteryCCReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Battery
    }

    fn cc_command(&self) -> Option<u8> {
        Some(BatteryCCCommand::Report as _)
    }
}

impl CCParsable for BatteryCCReport {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let level = match be_u8(i)? {
            0xff => BatteryLevel::LowWarning,
            pct => BatteryLevel::Percent(pct),
        };
        Ok(Self { level })
    }
}

impl CCSerializable for BatteryCCReport {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        let b = match self.level {
            BatteryLevel::Percent(pct) => pct,
            BatteryLevel::LowWarning => 0xff,
        };
        be_u8(b).serialize(output);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use zip_core::hex_bytes;

    #[test]
    fn test_report() {
        let ctx = CCParsingContext::default();
        let mut input = hex_bytes!("64");
        let report = BatteryCCReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(report.level, BatteryLevel::Percent(100));

        let mut input = hex_bytes!("ff");
        let report = BatteryCCReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(report.level, BatteryLevel::LowWarning);
    }
}
