use crate::commandclass::{CCBase, CCId, CCParsable, CCParsingContext, CCSerializable, CC};
use bytes::{Bytes, BytesMut};
use derive_try_from_primitive::TryFromPrimitive;
use typed_builder::TypedBuilder;
use ux::{u3, u5};
use zip_core::parse::{
    bits,
    bytes::{be_u16, complete::take},
    combinators::map_res,
    BitParsable, ParseResult, Parser,
};
use zip_core::prelude::*;
use zip_core::serialize::{self, BitSerializable, Serializable};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, TryFromPrimitive)]
#[repr(u8)]
pub enum ManufacturerSpecificCCCommand {
    Get = 0x04,
    Report = 0x05,
    DeviceSpecificGet = 0x06,
    DeviceSpecificReport = 0x07,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum DeviceIdType {
    FactoryDefault = 0x00,
    SerialNumber = 0x01,
    PseudoRandom = 0x02,
}

impl Display for DeviceIdType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceIdType::FactoryDefault => write!(f, "factory default"),
            DeviceIdType::SerialNumber => write!(f, "serial number"),
            DeviceIdType::PseudoRandom => write!(f, "pseudo-random"),
        }
    }
}

/// A device id is either UTF-8 text or raw binary (conventionally shown as hex)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceId {
    Utf8(String),
    Binary(Vec<u8>),
}

impl Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceId::Utf8(s) => f.write_str(s),
            DeviceId::Binary(b) => write!(f, "h'{}", hex::encode(b)),
        }
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct ManufacturerSpecificCCGet {}

impl CCBase for ManufacturerSpecificCCGet {
    fn expects_report(&self) -> bool {
        true
    }

    fn test_report(&self, report: &CC) -> bool {
        matches!(report, CC::ManufacturerSpecificCCReport(_))
    }
}

impl CCId for ManufacturerSpecificCCGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::ManufacturerSpecific
    }

    fn cc_command(&self) -> Option<u8> {
        Some(ManufacturerSpecificCCCommand::Get as _)
    }
}

impl CCParsable for ManufacturerSpecificCCGet {
    fn parse(_i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        // No payload
        Ok(Self {})
    }
}

impl CCSerializable for ManufacturerSpecificCCGet {
    fn serialize_payload(&self, _output: &mut BytesMut) {}
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct ManufacturerSpecificCCReport {
    pub manufacturer_id: u16,
    pub product_type: u16,
    pub product_id: u16,
}

impl CCBase for ManufacturerSpecificCCReport {}

impl CCId for ManufacturerSpecificCCReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::ManufacturerSpecific
    }

    fn cc_command(&self) -> Option<u8> {
        Some(ManufacturerSpecificCCCommand::Report as _)
    }
}

impl CCParsable for ManufacturerSpecificCCReport {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let manufacturer_id = be_u16(i)?;
        let product_type = be_u16(i)?;
        let product_id = be_u16(i)?;

        Ok(Self {
            manufacturer_id,
            product_type,
            product_id,
        })
    }
}

impl CCSerializable for ManufacturerSpecificCCReport {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u16;
        be_u16(self.manufacturer_id).serialize(output);
        be_u16(self.product_type).serialize(output);
        be_u16(self.product_id).serialize(output);
    }
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct ManufacturerSpecificCCDeviceSpecificGet {
    pub device_id_type: DeviceIdType,
}

impl CCBase for ManufacturerSpecificCCDeviceSpecificGet {
    fn expects_report(&self) -> bool {
        true
    }

    fn test_report(&self, report: &CC) -> bool {
        matches!(
            report,
            CC::ManufacturerSpecificCCDeviceSpecificReport(
                ManufacturerSpecificCCDeviceSpecificReport {
                    device_id_type,
                    ..
                }
            ) if device_id_type == &self.device_id_type
        )
    }
}

impl CCId for ManufacturerSpecificCCDeviceSpecificGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::ManufacturerSpecific
    }

    fn cc_command(&self) -> Option<u8> {
        Some(ManufacturerSpecificCCCommand::DeviceSpecificGet as _)
    }
}

impl CCParsable for ManufacturerSpecificCCDeviceSpecificGet {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let (_reserved, device_id_type) = bits::bits((
            u5::parse,
            map_res(bits::take::<u8, _>(3usize), DeviceIdType::try_from),
        ))
        .parse(i)?;

        Ok(Self { device_id_type })
    }
}

impl CCSerializable for ManufacturerSpecificCCDeviceSpecificGet {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bits::bits;
        bits(|bo| {
            u5::new(0).write(bo);
            u3::new((self.device_id_type as u8) & 0b111).write(bo);
        })
        .serialize(output);
    }
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct ManufacturerSpecificCCDeviceSpecificReport {
    pub device_id_type: DeviceIdType,
    pub device_id: DeviceId,
}

impl CCBase for ManufacturerSpecificCCDeviceSpecificReport {}

impl CCId for ManufacturerSpecificCCDeviceSpecificReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::ManufacturerSpecific
    }

    fn cc_command(&self) -> Option<u8> {
        Some(ManufacturerSpecificCCCommand::DeviceSpecificReport as _)
    }
}

impl CCParsable for ManufacturerSpecificCCDeviceSpecificReport {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let (_reserved, device_id_type) = bits::bits((
            u5::parse,
            map_res(bits::take::<u8, _>(3usize), DeviceIdType::try_from),
        ))
        .parse(i)?;
        let (data_format, data_len) = bits::bits((u3::parse, u5::parse)).parse(i)?;
        let data = take(u8::from(data_len)).parse(i)?;

        // Format 0 is UTF-8, everything else is binary
        let device_id = match u8::from(data_format) {
            0 => DeviceId::Utf8(String::from_utf8_lossy(&data).into_owned()),
            _ => DeviceId::Binary(data.to_vec()),
        };

        Ok(Self {
            device_id_type,
            device_id,
        })
    }
}

impl CCSerializable for ManufacturerSpecificCCDeviceSpecificReport {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bits::bits;
        use serialize::bytes::slice;

        let (format, data): (u8, &[u8]) = match &self.device_id {
            DeviceId::Utf8(s) => (0, s.as_bytes()),
            DeviceId::Binary(b) => (1, b),
        };
        let data_len = data.len() as u8;

        bits(|bo| {
            u5::new(0).write(bo);
            u3::new((self.device_id_type as u8) & 0b111).write(bo);
        })
        .serialize(output);
        bits(|bo| {
            u3::new(format & 0b111).write(bo);
            u5::new(data_len & 0b1_1111).write(bo);
        })
        .serialize(output);
        slice(data).serialize(output);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use zip_core::hex_bytes;

    #[test]
    fn test_report() {
        let ctx = CCParsingContext::default();
        let mut input = hex_bytes!("010e000200ff");
        let report = ManufacturerSpecificCCReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(report.manufacturer_id, 0x010e);
        assert_eq!(report.product_type, 0x0002);
        assert_eq!(report.product_id, 0x00ff);
    }

    #[test]
    fn test_device_specific_report_utf8() {
        let ctx = CCParsingContext::default();
        // serial number, UTF-8, "ABC"
        let mut input = hex_bytes!("0103414243");
        let report =
            ManufacturerSpecificCCDeviceSpecificReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(report.device_id_type, DeviceIdType::SerialNumber);
        assert_eq!(report.device_id, DeviceId::Utf8("ABC".to_string()));
    }

    #[test]
    fn test_device_specific_report_binary() {
        let ctx = CCParsingContext::default();
        // serial number, binary format, 4 bytes
        let mut input = hex_bytes!("0124deadbeef");
        let report =
            ManufacturerSpecificCCDeviceSpecificReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(
            report.device_id,
            DeviceId::Binary(vec![0xde, 0xad, 0xbe, 0xef])
        );
        assert_eq!(report.device_id.to_string(), "h'deadbeef");
    }
}
