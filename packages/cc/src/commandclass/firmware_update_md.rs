use crate::commandclass::{CCBase, CCId, CCParsable, CCParsingContext, CCSerializable, CC};
use bytes::{Bytes, BytesMut};
use derive_try_from_primitive::TryFromPrimitive;
use typed_builder::TypedBuilder;
use zip_core::parse::{bytes::be_u16, ParseResult};
use zip_core::prelude::*;
use zip_core::serialize::{self, Serializable};

#[derive(Debug, Clone, Copy, PartialEq, TryFromPrimitive)]
#[repr(u8)]
pub enum FirmwareUpdateMdCCCommand {
    MetaDataGet = 0x01,
    MetaDataReport = 0x02,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct FirmwareUpdateMdCCMetaDataGet {}

impl CCBase for FirmwareUpdateMdCCMetaDataGet {
    fn expects_report(&self) -> bool {
        true
    }

    fn test_report(&self, report: &CC) -> bool {
        matches!(report, CC::FirmwareUpdateMdCCMetaDataReport(_))
    }
}

impl CCId for FirmwareUpdateMdCCMetaDataGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::FirmwareUpdateMetaData
    }

    fn cc_command(&self) -> Option<u8> {
        Some(FirmwareUpdateMdCCCommand::MetaDataGet as _)
    }
}

impl CCParsable for FirmwareUpdateMdCCMetaDataGet {
    fn parse(_i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        // No payload
        Ok(Self {})
    }
}

impl CCSerializable for FirmwareUpdateMdCCMetaDataGet {
    fn serialize_payload(&self, _output: &mut BytesMut) {}
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct FirmwareUpdateMdCCMetaDataReport {
    pub manufacturer_id: u16,
    pub firmware_id: u16,
    pub checksum: u16,
}

impl CCBase for FirmwareUpdateMdCCMetaDataReport {}

impl CCId for FirmwareUpdateMdCCMetaDataReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::FirmwareUpdateMetaData
    }

    fn cc_command(&self) -> Option<u8> {
        Some(FirmwareUpdateMdCCCommand::MetaDataReport as _)
    }
}

impl CCParsable for FirmwareUpdateMdCCMetaDataReport {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let manufacturer_id = be_u16(i)?;
        let firmware_id = be_u16(i)?;
        let checksum = be_u16(i)?;

        Ok(Self {
            manufacturer_id,
            firmware_id,
            checksum,
        })
    }
}

impl CCSerializable for FirmwareUpdateMdCCMetaDataReport {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u16;
        be_u16(self.manufacturer_id).serialize(output);
        be_u16(self.firmware_id).serialize(output);
        be_u16(self.checksum).serialize(output);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use zip_core::hex_bytes;

    #[test]
    fn test_report() {
        let ctx = CCParsingContext::default();
        let mut input = hex_bytes!("010e0b01aabb");
        let report = FirmwareUpdateMdCCMetaDataReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(report.manufacturer_id, 0x010e);
        assert_eq!(report.firmware_id, 0x0b01);
        assert_eq!(report.checksum, 0xaabb);
    }
}
