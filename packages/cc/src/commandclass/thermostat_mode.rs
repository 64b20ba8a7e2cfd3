use crate::commandclass::{CCBase, CCId, CCParsable, CCParsingContext, CCSerializable, CC};
use bytes::{Bytes, BytesMut};
use derive_try_from_primitive::TryFromPrimitive;
use typed_builder::TypedBuilder;
use zip_core::parse::{
    bytes::{be_u8, rest},
    ParseResult,
};
use zip_core::prelude::*;
use zip_core::serialize::{self, Serializable};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, TryFromPrimitive)]
#[repr(u8)]
pub enum ThermostatModeCCCommand {
    Set = 0x01,
    Get = 0x02,
    Report = 0x03,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum ThermostatMode {
    Off = 0x00,
    Heat = 0x01,
    Cool = 0x02,
    Auto = 0x03,
    Auxiliary = 0x04,
    Resume = 0x05,
    Fan = 0x06,
    Furnace = 0x07,
    DryAir = 0x08,
    MoistAir = 0x09,
    AutoChangeover = 0x0a,
    EnergyHeat = 0x0b,
    EnergyCool = 0x0c,
    Away = 0x0d,
    FullPower = 0x0f,
    Manufacturer = 0x1f,
}

impl Display for ThermostatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Off => "Off",
            Self::Heat => "Heat",
            Self::Cool => "Cool",
            Self::Auto => "Auto",
            Self::Auxiliary => "Auxiliary",
            Self::Resume => "Resume",
            Self::Fan => "Fan",
            Self::Furnace => "Furnace",
            Self::DryAir => "Dry air",
            Self::MoistAir => "Moist air",
            Self::AutoChangeover => "Auto changeover",
            Self::EnergyHeat => "Energy heat",
            Self::EnergyCool => "Energy cool",
            Self::Away => "Away",
            Self::FullPower => "Full power",
            Self::Manufacturer => "Manufacturer specific",
        };
        f.write_str(name)
    }
}

zip_core::impl_maybe_known_codec!(ThermostatMode);

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct ThermostatModeCCSet {
    #[builder(setter(into))]
    pub mode: MaybeKnown<ThermostatMode>,
}

impl CCBase for ThermostatModeCCSet {}

impl CCId for ThermostatModeCCSet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::ThermostatMode
    }

    fn cc_command(&self) -> Option<u8> {
        Some(ThermostatModeCCCommand::Set as _)
    }
}

impl CCParsable for ThermostatModeCCSet {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let mode = MaybeKnown::from(be_u8(i)? & 0b1_1111);
        Ok(Self { mode })
    }
}

impl CCSerializable for ThermostatModeCCSet {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        be_u8(u8::from(self.mode) & 0b1_1111).serialize(output);
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct ThermostatModeCCGet {}

impl CCBase for ThermostatModeCCGet {
    fn expects_report(&self) -> bool {
        true
    }

    fn test_report(&self, report: &CC) -> bool {
        matches!(report, CC::ThermostatModeCCReport(_))
    }
}

impl CCId for ThermostatModeCCGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::ThermostatMode
    }

    fn cc_command(&self) -> Option<u8> {
        Some(ThermostatModeCCCommand::Get as _)
    }
}

impl CCParsable for ThermostatModeCCGet {
    fn parse(_i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        // No payload
        Ok(Self {})
    }
}

impl CCSerializable for ThermostatModeCCGet {
    fn serialize_payload(&self, _output: &mut BytesMut) {}
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct ThermostatModeCCReport {
    #[builder(setter(into))]
    pub mode: MaybeKnown<ThermostatMode>,
}

impl CCBase for ThermostatModeCCReport {}

impl CCId for ThermostatModeCCReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::ThermostatMode
    }

    fn cc_command(&self) -> Option<u8> {
        Some(ThermostatModeCCCommand::Report as _)
    }
}

impl CCParsable for ThermostatModeCCReport {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let mode = MaybeKnown::from(be_u8(i)? & 0b1_1111);
        // Version 3 devices may append manufacturer-specific data. It carries no
        // information this library exposes, so trailing bytes are consumed and
        // ignored regardless of length.
        let _ = rest(i)?;
        Ok(Self { mode })
    }
}

impl CCSerializable for ThermostatModeCCReport {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        be_u8(u8::from(self.mode) & 0b1_1111).serialize(output);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use zip_core::hex_bytes;

    #[test]
    fn test_report_single_byte() {
        let ctx = CCParsingContext::default();
        let mut input = hex_bytes!("01");
        let report = ThermostatModeCCReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(report.mode, MaybeKnown::Known(ThermostatMode::Heat));
    }

    #[test]
    fn test_report_ignores_trailing_bytes() {
        let ctx = CCParsingContext::default();
        let mut input = hex_bytes!("02deadbeef");
        let report = ThermostatModeCCReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(report.mode, MaybeKnown::Known(ThermostatMode::Cool));
        assert!(input.is_empty());
    }
}
