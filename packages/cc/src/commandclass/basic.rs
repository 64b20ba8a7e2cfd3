use crate::commandclass::{CCBase, CCId, CCParsable, CCParsingContext, CCSerializable, CC};
use bytes::{Bytes, BytesMut};
use derive_try_from_primitive::TryFromPrimitive;
use typed_builder::TypedBuilder;
use zip_core::parse::{ParseResult, Parsable};
use zip_core::prelude::*;
use zip_core::serialize::Serializable;

#[derive(Debug, Clone, Copy, PartialEq, TryFromPrimitive)]
#[repr(u8)]
pub enum BasicCCCommand {
    Set = 0x01,
    Get = 0x02,
    Report = 0x03,
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct BasicCCSet {
    pub target_value: BinarySet,
}

impl CCBase for BasicCCSet {}

impl CCId for BasicCCSet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Basic
    }

    fn cc_command(&self) -> Option<u8> {
        Some(BasicCCCommand::Set as _)
    }
}

impl CCParsable for BasicCCSet {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let target_value = BinarySet::parse(i)?;
        Ok(Self { target_value })
    }
}

impl CCSerializable for BasicCCSet {
    fn serialize_payload(&self, output: &mut BytesMut) {
        self.target_value.serialize(output);
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct BasicCCGet {}

impl CCBase for BasicCCGet {
    fn expects_report(&self) -> bool {
        true
    }

    fn test_report(&self, report: &CC) -> bool {
        matches!(report, CC::BasicCCReport(_))
    }
}

impl CCId for BasicCCGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Basic
    }

    fn cc_command(&self) -> Option<u8> {
        Some(BasicCCCommand::Get as _)
    }
}

impl CCParsable for BasicCCGet {
    fn parse(_i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        // No payload
        Ok(Self {})
    }
}

impl CCSerializable for BasicCCGet {
    fn serialize_payload(&self, _output: &mut BytesMut) {}
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct BasicCCReport {
    pub current_value: BinaryReport,
}

impl CCBase for BasicCCReport {}

impl CCId for BasicCCReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Basic
    }

    fn cc_command(&self) -> Option<u8> {
        Some(BasicCCCommand::Report as _)
    }
}

impl CCParsable for BasicCCReport {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let current_value = BinaryReport::parse(i)?;
        Ok(Self { current_value })
    }
}

impl CCSerializable for BasicCCReport {
    fn serialize_payload(&self, output: &mut BytesMut) {
        self.current_value.serialize(output);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use zip_core::hex_bytes;

    #[test]
    fn test_report_values() {
        let ctx = CCParsingContext::default();
        let mut input = hex_bytes!("00");
        let report = BasicCCReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(report.current_value, BinaryReport::Off);

        let mut input = hex_bytes!("ff");
        let report = BasicCCReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(report.current_value, BinaryReport::On);

        let mut input = hex_bytes!("fe");
        let report = BasicCCReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(report.current_value, BinaryReport::Unknown);
    }
}
