use crate::commandclass::{CCBase, CCId, CCParsable, CCParsingContext, CCSerializable, CC};
use bytes::{Bytes, BytesMut};
use derive_try_from_primitive::TryFromPrimitive;
use typed_builder::TypedBuilder;
use ux::{u3, u4};
use zip_core::parse::{
    bits,
    bytes::{be_int, be_u16, be_u8},
    BitParsable, ParseError, ParseResult, Parser,
};
use zip_core::prelude::*;
use zip_core::serialize::{self, BitSerializable, Serializable};

#[derive(Debug, Clone, Copy, PartialEq, TryFromPrimitive)]
#[repr(u8)]
pub enum ConfigurationCCCommand {
    Set = 0x04,
    Get = 0x05,
    Report = 0x06,
    BulkGet = 0x08,
    BulkReport = 0x09,
}

fn validate_param_size(size: u8) -> ParseResult<()> {
    match size {
        1 | 2 | 4 => Ok(()),
        _ => Err(ParseError::validation_failure(format!(
            "invalid configuration value size {}",
            size
        ))),
    }
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct ConfigurationCCSet {
    pub parameter: u8,
    /// Resets the parameter to its factory default; the value is ignored then
    #[builder(default)]
    pub default: bool,
    pub size: u8,
    pub value: i64,
}

impl CCBase for ConfigurationCCSet {}

impl CCId for ConfigurationCCSet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Configuration
    }

    fn cc_command(&self) -> Option<u8> {
        Some(ConfigurationCCCommand::Set as _)
    }
}

impl CCParsable for ConfigurationCCSet {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let parameter = be_u8(i)?;
        let (default, _reserved, size) =
            bits::bits((bits::bool, u4::parse, u3::parse)).parse(i)?;
        let size = u8::from(size);
        validate_param_size(size)?;
        let value = be_int(size as usize).parse(i)?;

        Ok(Self {
            parameter,
            default,
            size,
            value,
        })
    }
}

impl CCSerializable for ConfigurationCCSet {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bits::bits;
        use serialize::bytes::{be_int, be_u8};
        be_u8(self.parameter).serialize(output);
        bits(|bo| {
            self.default.write(bo);
            u4::new(0).write(bo);
            u3::new(self.size & 0b111).write(bo);
        })
        .serialize(output);
        be_int(self.value, self.size as usize).serialize(output);
    }
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct ConfigurationCCGet {
    pub parameter: u8,
}

impl CCBase for ConfigurationCCGet {
    fn expects_report(&self) -> bool {
        true
    }

    fn test_report(&self, report: &CC) -> bool {
        matches!(
            report,
            CC::ConfigurationCCReport(report) if report.parameter == self.parameter
        )
    }
}

impl CCId for ConfigurationCCGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Configuration
    }

    fn cc_command(&self) -> Option<u8> {
        Some(ConfigurationCCCommand::Get as _)
    }
}

impl CCParsable for ConfigurationCCGet {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let parameter = be_u8(i)?;
        Ok(Self { parameter })
    }
}

impl CCSerializable for ConfigurationCCGet {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        be_u8(self.parameter).serialize(output);
    }
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct ConfigurationCCReport {
    pub parameter: u8,
    pub size: u8,
    pub value: i64,
}

impl CCBase for ConfigurationCCReport {}

impl CCId for ConfigurationCCReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Configuration
    }

    fn cc_command(&self) -> Option<u8> {
        Some(ConfigurationCCCommand::Report as _)
    }
}

impl CCParsable for ConfigurationCCReport {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let parameter = be_u8(i)?;
        let size = be_u8(i)? & 0b111;
        validate_param_size(size)?;
        let value = be_int(size as usize).parse(i)?;

        Ok(Self {
            parameter,
            size,
            value,
        })
    }
}

impl CCSerializable for ConfigurationCCReport {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::{be_int, be_u8};
        be_u8(self.parameter).serialize(output);
        be_u8(self.size & 0b111).serialize(output);
        be_int(self.value, self.size as usize).serialize(output);
    }
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct ConfigurationCCBulkGet {
    pub parameter_offset: u16,
    pub count: u8,
}

impl CCBase for ConfigurationCCBulkGet {
    fn expects_report(&self) -> bool {
        true
    }

    fn test_report(&self, report: &CC) -> bool {
        matches!(
            report,
            CC::ConfigurationCCBulkReport(report)
                if report.parameter_offset == self.parameter_offset
        )
    }
}

impl CCId for ConfigurationCCBulkGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Configuration
    }

    fn cc_command(&self) -> Option<u8> {
        Some(ConfigurationCCCommand::BulkGet as _)
    }
}

impl CCParsable for ConfigurationCCBulkGet {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let parameter_offset = be_u16(i)?;
        let count = be_u8(i)?;
        Ok(Self {
            parameter_offset,
            count,
        })
    }
}

impl CCSerializable for ConfigurationCCBulkGet {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::{be_u16, be_u8};
        be_u16(self.parameter_offset).serialize(output);
        be_u8(self.count).serialize(output);
    }
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct ConfigurationCCBulkReport {
    pub parameter_offset: u16,
    /// How many more bulk reports complete this transfer
    pub to_follow: u8,
    #[builder(default)]
    pub default: bool,
    #[builder(default)]
    pub handshake: bool,
    pub size: u8,
    pub values: Vec<i64>,
}

impl CCBase for ConfigurationCCBulkReport {}

impl CCId for ConfigurationCCBulkReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Configuration
    }

    fn cc_command(&self) -> Option<u8> {
        Some(ConfigurationCCCommand::BulkReport as _)
    }
}

impl CCParsable for ConfigurationCCBulkReport {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let parameter_offset = be_u16(i)?;
        let count = be_u8(i)?;
        let to_follow = be_u8(i)?;
        let (default, handshake, _reserved, size) =
            bits::bits((bits::bool, bits::bool, u3::parse, u3::parse)).parse(i)?;
        let size = u8::from(size);
        validate_param_size(size)?;

        let mut values = Vec::with_capacity(count as usize);
        for _ in 0..count {
            values.push(be_int(size as usize).parse(i)?);
        }

        Ok(Self {
            parameter_offset,
            to_follow,
            default,
            handshake,
            size,
            values,
        })
    }
}

impl CCSerializable for ConfigurationCCBulkReport {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bits::bits;
        use serialize::bytes::{be_int, be_u16, be_u8};
        be_u16(self.parameter_offset).serialize(output);
        be_u8(self.values.len() as u8).serialize(output);
        be_u8(self.to_follow).serialize(output);
        bits(|bo| {
            self.default.write(bo);
            self.handshake.write(bo);
            u3::new(0).write(bo);
            u3::new(self.size & 0b111).write(bo);
        })
        .serialize(output);
        for value in &self.values {
            be_int(*value, self.size as usize).serialize(output);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use zip_core::hex_bytes;

    #[test]
    fn test_report_signed_value() {
        let ctx = CCParsingContext::default();
        // parameter 7, size 1, value -1
        let mut input = hex_bytes!("0701ff");
        let report = ConfigurationCCReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(report.parameter, 7);
        assert_eq!(report.value, -1);
    }

    #[test]
    fn test_bulk_report() {
        let ctx = CCParsingContext::default();
        // offset 10, 2 parameters, 1 report to follow, size 2, values 256 and -2
        let mut input = hex_bytes!("000a0201020100fffe");
        let report = ConfigurationCCBulkReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(report.parameter_offset, 10);
        assert_eq!(report.to_follow, 1);
        assert_eq!(report.size, 2);
        assert_eq!(report.values, vec![256, -2]);
    }

    #[test]
    fn test_report_invalid_size() {
        let ctx = CCParsingContext::default();
        let mut input = hex_bytes!("0703010203");
        assert!(ConfigurationCCReport::parse(&mut input, &ctx).is_err());
    }
}
