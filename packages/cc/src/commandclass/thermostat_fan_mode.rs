use crate::commandclass::{CCBase, CCId, CCParsable, CCParsingContext, CCSerializable, CC};
use bytes::{Bytes, BytesMut};
use derive_try_from_primitive::TryFromPrimitive;
use typed_builder::TypedBuilder;
use zip_core::parse::{bytes::be_u8, ParseResult};
use zip_core::prelude::*;
use zip_core::serialize::{self, Serializable};

#[derive(Debug, Clone, Copy, PartialEq, TryFromPrimitive)]
#[repr(u8)]
pub enum ThermostatFanModeCCCommand {
    Set = 0x01,
    Get = 0x02,
    Report = 0x03,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum ThermostatFanMode {
    AutoLow = 0x00,
    Low = 0x01,
    AutoHigh = 0x02,
    High = 0x03,
    AutoMedium = 0x04,
    Medium = 0x05,
    Circulation = 0x06,
    HumidityCirculation = 0x07,
    LeftRight = 0x08,
    UpDown = 0x09,
    Quiet = 0x0a,
    ExternalCirculation = 0x0b,
}

zip_core::impl_maybe_known_codec!(ThermostatFanMode);

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct ThermostatFanModeCCSet {
    #[builder(setter(into))]
    pub mode: MaybeKnown<ThermostatFanMode>,
    /// Version 2+: turns the fan off entirely, regardless of mode
    #[builder(default)]
    pub off: bool,
}

impl CCBase for ThermostatFanModeCCSet {}

impl CCId for ThermostatFanModeCCSet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::ThermostatFanMode
    }

    fn cc_command(&self) -> Option<u8> {
        Some(ThermostatFanModeCCCommand::Set as _)
    }
}

impl CCParsable for ThermostatFanModeCCSet {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let b = be_u8(i)?;
        Ok(Self {
            mode: MaybeKnown::from(b & 0b1111),
            off: b & 0x80 != 0,
        })
    }
}

impl CCSerializable for ThermostatFanModeCCSet {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        let off = if self.off { 0x80 } else { 0x00 };
        be_u8(off | (u8::from(self.mode) & 0b1111)).serialize(output);
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct ThermostatFanModeCCGet {}

impl CCBase for ThermostatFanModeCCGet {
    fn expects_report(&self) -> bool {
        true
    }

    fn test_report(&self, report: &CC) -> bool {
        matches!(report, CC::ThermostatFanModeCCReport(_))
    }
}

impl CCId for ThermostatFanModeCCGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::ThermostatFanMode
    }

    fn cc_command(&self) -> Option<u8> {
        Some(ThermostatFanModeCCCommand::Get as _)
    }
}

impl CCParsable for ThermostatFanModeCCGet {
    fn parse(_i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        // No payload
        Ok(Self {})
    }
}

impl CCSerializable for ThermostatFanModeCCGet {
    fn serialize_payload(&self, _output: &mut BytesMut) {}
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct ThermostatFanModeCCReport {
    #[builder(setter(into))]
    pub mode: MaybeKnown<ThermostatFanMode>,
    #[builder(default)]
    pub off: bool,
}

impl CCBase for ThermostatFanModeCCReport {}

impl CCId for ThermostatFanModeCCReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::ThermostatFanMode
    }

    fn cc_command(&self) -> Option<u8> {
        Some(ThermostatFanModeCCCommand::Report as _)
    }
}

impl CCParsable for ThermostatFanModeCCReport {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let b = be_u8(i)?;
        Ok(Self {
            mode: MaybeKnown::from(b & 0b1111),
            off: b & 0x80 != 0,
        })
    }
}

impl CCSerializable for ThermostatFanModeCCReport {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        let off = if self.off { 0x80 } else { 0x00 };
        be_u8(off | (u8::from(self.mode) & 0b1111)).serialize(output);
    }
}
