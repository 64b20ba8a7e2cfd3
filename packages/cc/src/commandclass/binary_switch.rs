use crate::commandclass::{CCBase, CCId, CCParsable, CCParsingContext, CCSerializable, CC};
use bytes::{Bytes, BytesMut};
use derive_try_from_primitive::TryFromPrimitive;
use typed_builder::TypedBuilder;
use zip_core::parse::{bytes::be_u8, combinators::opt, Parsable, ParseResult, Parser};
use zip_core::prelude::*;
use zip_core::serialize::{self, Serializable};

#[derive(Debug, Clone, Copy, PartialEq, TryFromPrimitive)]
#[repr(u8)]
pub enum BinarySwitchCCCommand {
    Set = 0x01,
    Get = 0x02,
    Report = 0x03,
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct BinarySwitchCCSet {
    pub target_value: BinarySet,
    /// Transition duration, only understood by version 2 devices
    #[builder(default, setter(into))]
    pub duration: Option<u8>,
}

impl CCBase for BinarySwitchCCSet {}

impl CCId for BinarySwitchCCSet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::BinarySwitch
    }

    fn cc_command(&self) -> Option<u8> {
        Some(BinarySwitchCCCommand::Set as _)
    }
}

impl CCParsable for BinarySwitchCCSet {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let target_value = BinarySet::parse(i)?;
        let duration = opt(be_u8).parse(i)?;

        Ok(Self {
            target_value,
            duration,
        })
    }
}

impl CCSerializable for BinarySwitchCCSet {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        self.target_value.serialize(output);
        if let Some(duration) = self.duration {
            be_u8(duration).serialize(output);
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct BinarySwitchCCGet {}

impl CCBase for BinarySwitchCCGet {
    fn expects_report(&self) -> bool {
        true
    }

    fn test_report(&self, report: &CC) -> bool {
        matches!(report, CC::BinarySwitchCCReport(_))
    }
}

impl CCId for BinarySwitchCCGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::BinarySwitch
    }

    fn cc_command(&self) -> Option<u8> {
        Some(BinarySwitchCCCommand::Get as _)
    }
}

impl CCParsable for BinarySwitchCCGet {
    fn parse(_i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        // No payload
        Ok(Self {})
    }
}

impl CCSerializable for BinarySwitchCCGet {
    fn serialize_payload(&self, _output: &mut BytesMut) {}
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct BinarySwitchCCReport {
    pub current_value: BinaryReport,
    #[builder(default, setter(into))]
    pub target_value: Option<BinaryReport>,
    #[builder(default, setter(into))]
    pub duration: Option<u8>,
}

impl CCBase for BinarySwitchCCReport {}

impl CCId for BinarySwitchCCReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::BinarySwitch
    }

    fn cc_command(&self) -> Option<u8> {
        Some(BinarySwitchCCCommand::Report as _)
    }
}

impl CCParsable for BinarySwitchCCReport {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let current_value = BinaryReport::parse(i)?;
        let target_value = opt(BinaryReport::parse).parse(i)?;
        let duration = match target_value {
            Some(_) => opt(be_u8).parse(i)?,
            None => None,
        };

        Ok(Self {
            current_value,
            target_value,
            duration,
        })
    }
}

impl CCSerializable for BinarySwitchCCReport {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        self.current_value.serialize(output);
        if let Some(target_value) = self.target_value {
            target_value.serialize(output);
            be_u8(self.duration.unwrap_or_default()).serialize(output);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use zip_core::hex_bytes;

    #[test]
    fn test_report_v1() {
        let ctx = CCParsingContext::default();
        let mut input = hex_bytes!("ff");
        let report = BinarySwitchCCReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(report.current_value, BinaryReport::On);
        assert_eq!(report.target_value, None);
    }

    #[test]
    fn test_report_v2() {
        let ctx = CCParsingContext::default();
        let mut input = hex_bytes!("00ff05");
        let report = BinarySwitchCCReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(report.current_value, BinaryReport::Off);
        assert_eq!(report.target_value, Some(BinaryReport::On));
        assert_eq!(report.duration, Some(5));
    }
}
