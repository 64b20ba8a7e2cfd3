use crate::commandclass::{CCBase, CCId, CCParsable, CCParsingContext, CCSerializable, CC};
use bytes::{Bytes, BytesMut};
use derive_try_from_primitive::TryFromPrimitive;
use typed_builder::TypedBuilder;
use zip_core::parse::{bytes::be_u8, combinators::opt, Parsable, ParseResult, Parser};
use zip_core::prelude::*;
use zip_core::serialize::{self, Serializable};

#[derive(Debug, Clone, Copy, PartialEq, TryFromPrimitive)]
#[repr(u8)]
pub enum MultilevelSwitchCCCommand {
    Set = 0x01,
    Get = 0x02,
    Report = 0x03,
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct MultilevelSwitchCCSet {
    pub target_value: LevelSet,
    #[builder(default, setter(into))]
    pub duration: Option<u8>,
}

impl CCBase for MultilevelSwitchCCSet {}

impl CCId for MultilevelSwitchCCSet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::MultilevelSwitch
    }

    fn cc_command(&self) -> Option<u8> {
        Some(MultilevelSwitchCCCommand::Set as _)
    }
}

impl CCParsable for MultilevelSwitchCCSet {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let target_value = LevelSet::parse(i)?;
        let duration = opt(be_u8).parse(i)?;

        Ok(Self {
            target_value,
            duration,
        })
    }
}

impl CCSerializable for MultilevelSwitchCCSet {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        self.target_value.serialize(output);
        if let Some(duration) = self.duration {
            be_u8(duration).serialize(output);
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct MultilevelSwitchCCGet {}

impl CCBase for MultilevelSwitchCCGet {
    fn expects_report(&self) -> bool {
        true
    }

    fn test_report(&self, report: &CC) -> bool {
        matches!(report, CC::MultilevelSwitchCCReport(_))
    }
}

impl CCId for MultilevelSwitchCCGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::MultilevelSwitch
    }

    fn cc_command(&self) -> Option<u8> {
        Some(MultilevelSwitchCCCommand::Get as _)
    }
}

impl CCParsable for MultilevelSwitchCCGet {
    fn parse(_i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        // No payload
        Ok(Self {})
    }
}

impl CCSerializable for MultilevelSwitchCCGet {
    fn serialize_payload(&self, _output: &mut BytesMut) {}
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct MultilevelSwitchCCReport {
    pub current_value: LevelReport,
    #[builder(default, setter(into))]
    pub target_value: Option<LevelReport>,
    #[builder(default, setter(into))]
    pub duration: Option<u8>,
}

impl CCBase for MultilevelSwitchCCReport {}

impl CCId for MultilevelSwitchCCReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::MultilevelSwitch
    }

    fn cc_command(&self) -> Option<u8> {
        Some(MultilevelSwitchCCCommand::Report as _)
    }
}

impl CCParsable for MultilevelSwitchCCReport {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let current_value = LevelReport::parse(i)?;
        let target_value = opt(LevelReport::parse).parse(i)?;
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

impl CCSerializable for MultilevelSwitchCCReport {
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
    fn test_report_dimmer_percentage() {
        let ctx = CCParsingContext::default();
        let mut input = hex_bytes!("32");
        let report = MultilevelSwitchCCReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(report.current_value, LevelReport::Level(50));
    }

    #[test]
    fn test_set_rejects_out_of_range() {
        assert!(LevelSet::new(100).is_err());
    }
}
