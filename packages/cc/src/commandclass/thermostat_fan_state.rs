use crate::commandclass::{CCBase, CCId, CCParsable, CCParsingContext, CCSerializable, CC};
use bytes::{Bytes, BytesMut};
use derive_try_from_primitive::TryFromPrimitive;
use typed_builder::TypedBuilder;
use zip_core::parse::{bytes::be_u8, ParseResult};
use zip_core::prelude::*;
use zip_core::serialize::{self, Serializable};

#[derive(Debug, Clone, Copy, PartialEq, TryFromPrimitive)]
#[repr(u8)]
pub enum ThermostatFanStateCCCommand {
    Get = 0x02,
    Report = 0x03,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum ThermostatFanState {
    Idle = 0x00,
    Running = 0x01,
    RunningHigh = 0x02,
    RunningMedium = 0x03,
    Circulation = 0x04,
    HumidityCirculation = 0x05,
    RightLeftCirculation = 0x06,
    UpDownCirculation = 0x07,
    QuietCirculation = 0x08,
}

zip_core::impl_maybe_known_codec!(ThermostatFanState);

#[derive(Default, Debug, Clone, PartialEq)]
pub struct ThermostatFanStateCCGet {}

impl CCBase for ThermostatFanStateCCGet {
    fn expects_report(&self) -> bool {
        true
    }

    fn test_report(&self, report: &CC) -> bool {
        matches!(report, CC::ThermostatFanStateCCReport(_))
    }
}

impl CCId for ThermostatFanStateCCGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::ThermostatFanState
    }

    fn cc_command(&self) -> Option<u8> {
        Some(ThermostatFanStateCCCommand::Get as _)
    }
}

impl CCParsable for ThermostatFanStateCCGet {
    fn parse(_i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        // No payload
        Ok(Self {})
    }
}

impl CCSerializable for ThermostatFanStateCCGet {
    fn serialize_payload(&self, _output: &mut BytesMut) {}
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct ThermostatFanStateCCReport {
    #[builder(setter(into))]
    pub state: MaybeKnown<ThermostatFanState>,
}

impl CCBase for ThermostatFanStateCCReport {}

impl CCId for ThermostatFanStateCCReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::ThermostatFanState
    }

    fn cc_command(&self) -> Option<u8> {
        Some(ThermostatFanStateCCCommand::Report as _)
    }
}

impl CCParsable for ThermostatFanStateCCReport {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let state = MaybeKnown::from(be_u8(i)? & 0b1111);
        Ok(Self { state })
    }
}

impl CCSerializable for ThermostatFanStateCCReport {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        be_u8(u8::from(self.state) & 0b1111).serialize(output);
    }
}
