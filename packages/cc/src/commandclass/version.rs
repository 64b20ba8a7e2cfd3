use crate::commandclass::{CCBase, CCId, CCParsable, CCParsingContext, CCSerializable, CC};
use bytes::{Bytes, BytesMut};
use derive_try_from_primitive::TryFromPrimitive;
use typed_builder::TypedBuilder;
use zip_core::parse::{bytes::be_u8, Parsable, ParseResult};
use zip_core::prelude::*;
use zip_core::serialize::{self, Serializable};

#[derive(Debug, Clone, Copy, PartialEq, TryFromPrimitive)]
#[repr(u8)]
pub enum VersionCCCommand {
    CommandClassGet = 0x13,
    CommandClassReport = 0x14,
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct VersionCCCommandClassGet {
    #[builder(setter(into))]
    pub requested_cc: CommandClassId,
}

impl CCBase for VersionCCCommandClassGet {
    fn expects_report(&self) -> bool {
        true
    }

    fn test_report(&self, report: &CC) -> bool {
        matches!(
            report,
            CC::VersionCCCommandClassReport(report) if report.requested_cc == self.requested_cc
        )
    }
}

impl CCId for VersionCCCommandClassGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Version
    }

    fn cc_command(&self) -> Option<u8> {
        Some(VersionCCCommand::CommandClassGet as _)
    }
}

impl CCParsable for VersionCCCommandClassGet {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let requested_cc = CommandClassId::parse(i)?;
        Ok(Self { requested_cc })
    }
}

impl CCSerializable for VersionCCCommandClassGet {
    fn serialize_payload(&self, output: &mut BytesMut) {
        self.requested_cc.serialize(output);
    }
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct VersionCCCommandClassReport {
    #[builder(setter(into))]
    pub requested_cc: CommandClassId,
    pub version: u8,
}

impl CCBase for VersionCCCommandClassReport {}

impl CCId for VersionCCCommandClassReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Version
    }

    fn cc_command(&self) -> Option<u8> {
        Some(VersionCCCommand::CommandClassReport as _)
    }
}

impl CCParsable for VersionCCCommandClassReport {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let requested_cc = CommandClassId::parse(i)?;
        let version = be_u8(i)?;
        Ok(Self {
            requested_cc,
            version,
        })
    }
}

impl CCSerializable for VersionCCCommandClassReport {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        self.requested_cc.serialize(output);
        be_u8(self.version).serialize(output);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use zip_core::hex_bytes;

    #[test]
    fn test_report() {
        let ctx = CCParsingContext::default();
        let mut input = hex_bytes!("2502");
        let report = VersionCCCommandClassReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(
            report.requested_cc,
            CommandClassId::Known(CommandClasses::BinarySwitch)
        );
        assert_eq!(report.version, 2);
    }
}
