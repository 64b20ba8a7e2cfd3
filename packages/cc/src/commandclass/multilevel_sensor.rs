use crate::commandclass::{CCBase, CCId, CCParsable, CCParsingContext, CCSerializable, CC};
use crate::values::ScaledValue;
use bytes::{Bytes, BytesMut};
use derive_try_from_primitive::TryFromPrimitive;
use typed_builder::TypedBuilder;
use zip_core::parse::{bytes::be_u8, combinators::opt, Parsable, ParseResult, Parser};
use zip_core::prelude::*;
use zip_core::serialize::{self, Serializable};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, TryFromPrimitive)]
#[repr(u8)]
pub enum MultilevelSensorCCCommand {
    Get = 0x04,
    Report = 0x05,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum MultilevelSensorType {
    AirTemperature = 0x01,
    General = 0x02,
    Luminance = 0x03,
    Power = 0x04,
    Humidity = 0x05,
    Velocity = 0x06,
    Direction = 0x07,
    AtmosphericPressure = 0x08,
    BarometricPressure = 0x09,
    SolarRadiation = 0x0a,
    DewPoint = 0x0b,
    RainRate = 0x0c,
    TideLevel = 0x0d,
    Weight = 0x0e,
    Voltage = 0x0f,
    Current = 0x10,
    Co2 = 0x11,
    AirFlow = 0x12,
    TankCapacity = 0x13,
    Distance = 0x14,
    AnglePosition = 0x15,
    Rotation = 0x16,
    WaterTemperature = 0x17,
    SoilTemperature = 0x18,
    SeismicIntensity = 0x19,
    SeismicMagnitude = 0x1a,
    Ultraviolet = 0x1b,
    ElectricalResistivity = 0x1c,
    ElectricalConductivity = 0x1d,
    Loudness = 0x1e,
    Moisture = 0x1f,
    Frequency = 0x20,
    Time = 0x21,
    TargetTemperature = 0x22,
}

impl Display for MultilevelSensorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::AirTemperature => "Air temperature",
            Self::General => "General purpose",
            Self::Luminance => "Illuminance",
            Self::Power => "Power",
            Self::Humidity => "Humidity",
            Self::Velocity => "Velocity",
            Self::Direction => "Direction",
            Self::AtmosphericPressure => "Atmospheric pressure",
            Self::BarometricPressure => "Barometric pressure",
            Self::SolarRadiation => "Solar radiation",
            Self::DewPoint => "Dew point",
            Self::RainRate => "Rain rate",
            Self::TideLevel => "Tide level",
            Self::Weight => "Weight",
            Self::Voltage => "Voltage",
            Self::Current => "Current",
            Self::Co2 => "Carbon dioxide level",
            Self::AirFlow => "Air flow",
            Self::TankCapacity => "Tank capacity",
            Self::Distance => "Distance",
            Self::AnglePosition => "Angle position",
            Self::Rotation => "Rotation",
            Self::WaterTemperature => "Water temperature",
            Self::SoilTemperature => "Soil temperature",
            Self::SeismicIntensity => "Seismic intensity",
            Self::SeismicMagnitude => "Seismic magnitude",
            Self::Ultraviolet => "Ultraviolet",
            Self::ElectricalResistivity => "Electrical resistivity",
            Self::ElectricalConductivity => "Electrical conductivity",
            Self::Loudness => "Loudness",
            Self::Moisture => "Moisture",
            Self::Frequency => "Frequency",
            Self::Time => "Time",
            Self::TargetTemperature => "Target temperature",
        };
        f.write_str(name)
    }
}

zip_core::impl_maybe_known_codec!(MultilevelSensorType);

#[derive(Default, Debug, Clone, PartialEq, TypedBuilder)]
#[builder(field_defaults(default))]
pub struct MultilevelSensorCCGet {
    /// Which sensor to query. Only understood by version 5 devices,
    /// older ones report their default sensor.
    #[builder(setter(into))]
    pub sensor_type: Option<MaybeKnown<MultilevelSensorType>>,
    #[builder(setter(into))]
    pub scale: Option<u8>,
}

impl CCBase for MultilevelSensorCCGet {
    fn expects_report(&self) -> bool {
        true
    }

    fn test_report(&self, report: &CC) -> bool {
        match report {
            CC::MultilevelSensorCCReport(report) => match self.sensor_type {
                Some(sensor_type) => report.sensor_type == sensor_type,
                None => true,
            },
            _ => false,
        }
    }
}

impl CCId for MultilevelSensorCCGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::MultilevelSensor
    }

    fn cc_command(&self) -> Option<u8> {
        Some(MultilevelSensorCCCommand::Get as _)
    }
}

impl CCParsable for MultilevelSensorCCGet {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let sensor_type = opt(MaybeKnown::<MultilevelSensorType>::parse).parse(i)?;
        let scale = match sensor_type {
            Some(_) => opt(be_u8).parse(i)?.map(|b| (b >> 3) & 0b11),
            None => None,
        };

        Ok(Self { sensor_type, scale })
    }
}

impl CCSerializable for MultilevelSensorCCGet {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        if let Some(sensor_type) = self.sensor_type {
            sensor_type.serialize(output);
            be_u8((self.scale.unwrap_or_default() & 0b11) << 3).serialize(output);
        }
    }
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct MultilevelSensorCCReport {
    pub sensor_type: MaybeKnown<MultilevelSensorType>,
    pub value: ScaledValue,
}

impl MultilevelSensorCCReport {
    /// The reading rounded to an integer, matching what simple UIs display
    pub fn level(&self) -> i64 {
        self.value.rounded()
    }
}

impl CCBase for MultilevelSensorCCReport {}

impl CCId for MultilevelSensorCCReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::MultilevelSensor
    }

    fn cc_command(&self) -> Option<u8> {
        Some(MultilevelSensorCCCommand::Report as _)
    }
}

impl CCParsable for MultilevelSensorCCReport {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let sensor_type = MaybeKnown::<MultilevelSensorType>::parse(i)?;
        let value = ScaledValue::parse(i)?;

        Ok(Self { sensor_type, value })
    }
}

impl CCSerializable for MultilevelSensorCCReport {
    fn serialize_payload(&self, output: &mut BytesMut) {
        self.sensor_type.serialize(output);
        self.value.serialize(output);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use zip_core::hex_bytes;

    #[test]
    fn test_report_temperature() {
        // type = air temperature, precision = 1, size = 2, value = 200 (20.0)
        let ctx = CCParsingContext::default();
        let mut input = hex_bytes!("012200c8");
        let report = MultilevelSensorCCReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(
            report.sensor_type,
            MaybeKnown::Known(MultilevelSensorType::AirTemperature)
        );
        assert_eq!(report.level(), 20);
        assert_eq!(report.value.precision, 1);
        assert_eq!(report.value.scale, 0);
    }

    #[test]
    fn test_report_invalid_size_is_error() {
        let ctx = CCParsingContext::default();
        // size = 3
        let mut input = hex_bytes!("0123010203");
        assert!(MultilevelSensorCCReport::parse(&mut input, &ctx).is_err());
    }

    #[test]
    fn test_report_unknown_sensor_type() {
        let ctx = CCParsingContext::default();
        let mut input = hex_bytes!("7f0105");
        let report = MultilevelSensorCCReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(report.sensor_type, MaybeKnown::Unknown(0x7f));
        assert_eq!(report.level(), 5);
    }
}
