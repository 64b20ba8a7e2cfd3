use crate::commandclass::{CCBase, CCId, CCParsable, CCParsingContext, CCSerializable, CC};
use bytes::{Bytes, BytesMut};
use derive_try_from_primitive::TryFromPrimitive;
use typed_builder::TypedBuilder;
use zip_core::parse::{
    bytes::{be_i8, be_u8},
    ParseResult,
};
use zip_core::prelude::*;
use zip_core::serialize::{self, Serializable};

#[derive(Debug, Clone, Copy, PartialEq, TryFromPrimitive)]
#[repr(u8)]
pub enum ThermostatSetbackCCCommand {
    Set = 0x01,
    Get = 0x02,
    Report = 0x03,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum SetbackType {
    None = 0x00,
    Temporary = 0x01,
    Permanent = 0x02,
}

zip_core::impl_maybe_known_codec!(SetbackType);

/// The setback amount in 1/10 Kelvin, or one of the special states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetbackState {
    Setback(i8),
    FrostProtection,
    EnergySaving,
    Unused,
}

impl SetbackState {
    fn from_byte(b: u8) -> Self {
        match b {
            0x79 => Self::FrostProtection,
            0x7a => Self::EnergySaving,
            0x7f => Self::Unused,
            _ => Self::Setback(b as i8),
        }
    }

    fn to_byte(self) -> u8 {
        match self {
            Self::Setback(v) => v as u8,
            Self::FrostProtection => 0x79,
            Self::EnergySaving => 0x7a,
            Self::Unused => 0x7f,
        }
    }
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct ThermostatSetbackCCSet {
    #[builder(setter(into))]
    pub setback_type: MaybeKnown<SetbackType>,
    pub state: SetbackState,
}

impl CCBase for ThermostatSetbackCCSet {}

impl CCId for ThermostatSetbackCCSet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::ThermostatSetback
    }

    fn cc_command(&self) -> Option<u8> {
        Some(ThermostatSetbackCCCommand::Set as _)
    }
}

impl CCParsable for ThermostatSetbackCCSet {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let setback_type = MaybeKnown::from(be_u8(i)? & 0b11);
        let state = SetbackState::from_byte(be_i8(i)? as u8);
        Ok(Self {
            setback_type,
            state,
        })
    }
}

impl CCSerializable for ThermostatSetbackCCSet {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        be_u8(u8::from(self.setback_type) & 0b11).serialize(output);
        be_u8(self.state.to_byte()).serialize(output);
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct ThermostatSetbackCCGet {}

impl CCBase for ThermostatSetbackCCGet {
    fn expects_report(&self) -> bool {
        true
    }

    fn test_report(&self, report: &CC) -> bool {
        matches!(report, CC::ThermostatSetbackCCReport(_))
    }
}

impl CCId for ThermostatSetbackCCGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::ThermostatSetback
    }

    fn cc_command(&self) -> Option<u8> {
        Some(ThermostatSetbackCCCommand::Get as _)
    }
}

impl CCParsable for ThermostatSetbackCCGet {
    fn parse(_i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        // No payload
        Ok(Self {})
    }
}

impl CCSerializable for ThermostatSetbackCCGet {
    fn serialize_payload(&self, _output: &mut BytesMut) {}
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct ThermostatSetbackCCReport {
    #[builder(setter(into))]
    pub setback_type: MaybeKnown<SetbackType>,
    pub state: SetbackState,
}

impl CCBase for ThermostatSetbackCCReport {}

impl CCId for ThermostatSetbackCCReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::ThermostatSetback
    }

    fn cc_command(&self) -> Option<u8> {
        Some(ThermostatSetbackCCCommand::Report as _)
    }
}

impl CCParsable for ThermostatSetbackCCReport {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let setback_type = MaybeKnown::from(be_u8(i)? & 0b11);
        let state = SetbackState::from_byte(be_i8(i)? as u8);
        Ok(Self {
            setback_type,
            state,
        })
    }
}

impl CCSerializable for ThermostatSetbackCCReport {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        be_u8(u8::from(self.setback_type) & 0b11).serialize(output);
        be_u8(self.state.to_byte()).serialize(output);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use zip_core::hex_bytes;

    #[test]
    fn test_report_negative_setback() {
        let ctx = CCParsingContext::default();
        // temporary setback of -2.2 K
        let mut input = hex_bytes!("01ea");
        let report = ThermostatSetbackCCReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(report.setback_type, MaybeKnown::Known(SetbackType::Temporary));
        assert_eq!(report.state, SetbackState::Setback(-22));
    }

    #[test]
    fn test_report_special_state() {
        let ctx = CCParsingContext::default();
        let mut input = hex_bytes!("0279");
        let report = ThermostatSetbackCCReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(report.state, SetbackState::FrostProtection);
    }
}
