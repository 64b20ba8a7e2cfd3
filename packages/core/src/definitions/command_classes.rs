use crate::parse::{
    bytes::{be_u16, be_u8},
    combinators::peek,
    Parsable, ParseResult, Parser,
};
use crate::serialize::{self, Serializable};
use bytes::{Bytes, BytesMut};
use derive_try_from_primitive::TryFromPrimitive;
use enum_iterator::Sequence;
use std::fmt::Display;

/// Separates the supported from the controlled part of a command class list (NIF)
pub const COMMAND_CLASS_SUPPORT_CONTROL_MARK: u8 = 0xef;
/// First byte of a two-byte (extended) command class identifier
pub const EXTENDED_COMMAND_CLASS_PREFIX: u8 = 0xf1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Sequence, TryFromPrimitive)]
#[repr(u16)]
pub enum CommandClasses {
    AlarmSensor = 0x9c,
    AlarmSilence = 0x9d,
    AllSwitch = 0x27,
    AntiTheft = 0x5d,
    AntiTheftUnlock = 0x7e,
    ApplicationCapability = 0x57,
    ApplicationStatus = 0x22,
    Association = 0x85,
    AssociationCommandConfiguration = 0x9b,
    AssociationGroupInformation = 0x59,
    BarrierOperator = 0x66,
    Basic = 0x20,
    BasicTariffInformation = 0x36,
    BasicWindowCovering = 0x50,
    Battery = 0x80,
    BinarySensor = 0x30,
    BinarySwitch = 0x25,
    BinaryToggleSwitch = 0x28,
    CentralScene = 0x5b,
    ClimateControlSchedule = 0x46,
    Clock = 0x81,
    ColorSwitch = 0x33,
    Configuration = 0x70,
    ControllerReplication = 0x21,
    CRC16Encapsulation = 0x56,
    DeviceResetLocally = 0x5a,
    DoorLock = 0x62,
    DoorLockLogging = 0x4c,
    EnergyProduction = 0x90,
    EntryControl = 0x6f,
    FirmwareUpdateMetaData = 0x7a,
    GeographicLocation = 0x8c,
    GroupingName = 0x7b,
    Hail = 0x82,
    HumidityControlMode = 0x6d,
    HumidityControlOperatingState = 0x6e,
    HumidityControlSetpoint = 0x64,
    InclusionController = 0x74,
    Indicator = 0x87,
    IPAssociation = 0x5c,
    Irrigation = 0x6b,
    Language = 0x89,
    Lock = 0x76,
    Mailbox = 0x69,
    ManufacturerProprietary = 0x91,
    ManufacturerSpecific = 0x72,
    Meter = 0x32,
    MultiChannel = 0x60,
    MultiChannelAssociation = 0x8e,
    MultiCommand = 0x8f,
    MultilevelSensor = 0x31,
    MultilevelSwitch = 0x26,
    MultilevelToggleSwitch = 0x29,
    NetworkManagementBasic = 0x4d,
    NetworkManagementInclusion = 0x34,
    NetworkManagementInstallationAndMaintenance = 0x67,
    NetworkManagementPrimary = 0x54,
    NetworkManagementProxy = 0x52,
    NoOperation = 0x00,
    NodeNamingAndLocation = 0x77,
    NodeProvisioning = 0x78,
    Notification = 0x71,
    Powerlevel = 0x73,
    Protection = 0x75,
    SceneActivation = 0x2b,
    SceneActuatorConfiguration = 0x2c,
    SceneControllerConfiguration = 0x2d,
    Schedule = 0x53,
    ScheduleEntryLock = 0x4e,
    Security = 0x98,
    Security2 = 0x9f,
    SecurityMark = 0xf100,
    SoundSwitch = 0x79,
    Supervision = 0x6c,
    ThermostatFanMode = 0x44,
    ThermostatFanState = 0x45,
    ThermostatMode = 0x40,
    ThermostatOperatingState = 0x42,
    ThermostatSetback = 0x47,
    ThermostatSetpoint = 0x43,
    Time = 0x8a,
    TimeParameters = 0x8b,
    TransportService = 0x55,
    UserCode = 0x63,
    Version = 0x86,
    WakeUp = 0x84,
    WindowCovering = 0x6a,
    ZIP = 0x23,
    ZIP6LoWPAN = 0x4f,
    ZIPGateway = 0x5f,
    ZIPNamingAndLocation = 0x68,
    ZIPND = 0x58,
    ZIPPortal = 0x61,
    ZWavePlusInfo = 0x5e,
}

impl CommandClasses {
    pub fn is_extended_cc(&self) -> bool {
        *self as u16 > 0xff
    }

    /// Returns an iterator over all defined command classes
    pub fn all_ccs() -> impl Iterator<Item = Self> {
        enum_iterator::all::<Self>()
    }
}

impl Display for CommandClasses {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            CommandClasses::AlarmSensor => "Alarm Sensor",
            CommandClasses::AlarmSilence => "Alarm Silence",
            CommandClasses::AllSwitch => "All Switch",
            CommandClasses::AntiTheft => "Anti-Theft",
            CommandClasses::AntiTheftUnlock => "Anti-Theft Unlock",
            CommandClasses::ApplicationCapability => "Application Capability",
            CommandClasses::ApplicationStatus => "Application Status",
            CommandClasses::Association => "Association",
            CommandClasses::AssociationCommandConfiguration => "Association Command Configuration",
            CommandClasses::AssociationGroupInformation => "Association Group Information",
            CommandClasses::BarrierOperator => "Barrier Operator",
            CommandClasses::Basic => "Basic",
            CommandClasses::BasicTariffInformation => "Basic Tariff Information",
            CommandClasses::BasicWindowCovering => "Basic Window Covering",
            CommandClasses::Battery => "Battery",
            CommandClasses::BinarySensor => "Binary Sensor",
            CommandClasses::BinarySwitch => "Binary Switch",
            CommandClasses::BinaryToggleSwitch => "Binary Toggle Switch",
            CommandClasses::CentralScene => "Central Scene",
            CommandClasses::ClimateControlSchedule => "Climate Control Schedule",
            CommandClasses::Clock => "Clock",
            CommandClasses::ColorSwitch => "Color Switch",
            CommandClasses::Configuration => "Configuration",
            CommandClasses::ControllerReplication => "Controller Replication",
            CommandClasses::CRC16Encapsulation => "CRC-16 Encapsulation",
            CommandClasses::DeviceResetLocally => "Device Reset Locally",
            CommandClasses::DoorLock => "Door Lock",
            CommandClasses::DoorLockLogging => "Door Lock Logging",
            CommandClasses::EnergyProduction => "Energy Production",
            CommandClasses::EntryControl => "Entry Control",
            CommandClasses::FirmwareUpdateMetaData => "Firmware Update Meta Data",
            CommandClasses::GeographicLocation => "Geographic Location",
            CommandClasses::GroupingName => "Grouping Name",
            CommandClasses::Hail => "Hail",
            CommandClasses::HumidityControlMode => "Humidity Control Mode",
            CommandClasses::HumidityControlOperatingState => "Humidity Control Operating State",
            CommandClasses::HumidityControlSetpoint => "Humidity Control Setpoint",
            CommandClasses::InclusionController => "Inclusion Controller",
            CommandClasses::Indicator => "Indicator",
            CommandClasses::IPAssociation => "IP Association",
            CommandClasses::Irrigation => "Irrigation",
            CommandClasses::Language => "Language",
            CommandClasses::Lock => "Lock",
            CommandClasses::Mailbox => "Mailbox",
            CommandClasses::ManufacturerProprietary => "Manufacturer Proprietary",
            CommandClasses::ManufacturerSpecific => "Manufacturer Specific",
            CommandClasses::Meter => "Meter",
            CommandClasses::MultiChannel => "Multi Channel",
            CommandClasses::MultiChannelAssociation => "Multi Channel Association",
            CommandClasses::MultiCommand => "Multi Command",
            CommandClasses::MultilevelSensor => "Multilevel Sensor",
            CommandClasses::MultilevelSwitch => "Multilevel Switch",
            CommandClasses::MultilevelToggleSwitch => "Multilevel Toggle Switch",
            CommandClasses::NetworkManagementBasic => "Network Management Basic",
            CommandClasses::NetworkManagementInclusion => "Network Management Inclusion",
            CommandClasses::NetworkManagementInstallationAndMaintenance => {
                "Network Management Installation and Maintenance"
            }
            CommandClasses::NetworkManagementPrimary => "Network Management Primary",
            CommandClasses::NetworkManagementProxy => "Network Management Proxy",
            CommandClasses::NoOperation => "No Operation",
            CommandClasses::NodeNamingAndLocation => "Node Naming and Location",
            CommandClasses::NodeProvisioning => "Node Provisioning",
            CommandClasses::Notification => "Notification",
            CommandClasses::Powerlevel => "Powerlevel",
            CommandClasses::Protection => "Protection",
            CommandClasses::SceneActivation => "Scene Activation",
            CommandClasses::SceneActuatorConfiguration => "Scene Actuator Configuration",
            CommandClasses::SceneControllerConfiguration => "Scene Controller Configuration",
            CommandClasses::Schedule => "Schedule",
            CommandClasses::ScheduleEntryLock => "Schedule Entry Lock",
            CommandClasses::Security => "Security",
            CommandClasses::Security2 => "Security 2",
            CommandClasses::SecurityMark => "Security Mark",
            CommandClasses::SoundSwitch => "Sound Switch",
            CommandClasses::Supervision => "Supervision",
            CommandClasses::ThermostatFanMode => "Thermostat Fan Mode",
            CommandClasses::ThermostatFanState => "Thermostat Fan State",
            CommandClasses::ThermostatMode => "Thermostat Mode",
            CommandClasses::ThermostatOperatingState => "Thermostat Operating State",
            CommandClasses::ThermostatSetback => "Thermostat Setback",
            CommandClasses::ThermostatSetpoint => "Thermostat Setpoint",
            CommandClasses::Time => "Time",
            CommandClasses::TimeParameters => "Time Parameters",
            CommandClasses::TransportService => "Transport Service",
            CommandClasses::UserCode => "User Code",
            CommandClasses::Version => "Version",
            CommandClasses::WakeUp => "Wake Up",
            CommandClasses::WindowCovering => "Window Covering",
            CommandClasses::ZIP => "Z/IP",
            CommandClasses::ZIP6LoWPAN => "Z/IP 6LoWPAN",
            CommandClasses::ZIPGateway => "Z/IP Gateway",
            CommandClasses::ZIPNamingAndLocation => "Z/IP Naming and Location",
            CommandClasses::ZIPND => "Z/IP ND",
            CommandClasses::ZIPPortal => "Z/IP Portal",
            CommandClasses::ZWavePlusInfo => "Z-Wave Plus Info",
        })
    }
}

/// A command class identifier as it appears on the wire. Identifiers this library
/// does not know decode to [CommandClassId::Unknown] instead of failing, so new
/// command classes can be added without touching the dispatch logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandClassId {
    Known(CommandClasses),
    Unknown(u8),
}

impl CommandClassId {
    pub fn known(&self) -> Option<CommandClasses> {
        match self {
            Self::Known(cc) => Some(*cc),
            Self::Unknown(_) => None,
        }
    }
}

impl From<u8> for CommandClassId {
    fn from(id: u8) -> Self {
        CommandClasses::try_from(id as u16)
            .map(Self::Known)
            .unwrap_or(Self::Unknown(id))
    }
}

impl From<CommandClasses> for CommandClassId {
    fn from(cc: CommandClasses) -> Self {
        Self::Known(cc)
    }
}

impl Display for CommandClassId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Known(cc) => write!(f, "{}", cc),
            Self::Unknown(id) => write!(f, "Unknown ({:#04x})", id),
        }
    }
}

impl Parsable for CommandClassId {
    fn parse(i: &mut Bytes) -> ParseResult<Self> {
        let id = peek(be_u8).parse(i)?;
        if id == EXTENDED_COMMAND_CLASS_PREFIX {
            let ext = be_u16(i)?;
            return Ok(CommandClasses::try_from(ext)
                .map(Self::Known)
                .unwrap_or(Self::Unknown(id)));
        }
        let id = be_u8(i)?;
        Ok(Self::from(id))
    }
}

impl Serializable for CommandClassId {
    fn serialize(&self, output: &mut BytesMut) {
        use serialize::bytes::{be_u16, be_u8};
        match self {
            Self::Known(cc) if cc.is_extended_cc() => be_u16(*cc as u16).serialize(output),
            Self::Known(cc) => be_u8(*cc as u8).serialize(output),
            Self::Unknown(id) => be_u8(*id).serialize(output),
        }
    }
}

/// Parses a NIF-style command class list. The bytes 0x00 (padding), 0xEF
/// (support/control mark) and 0xF1 (extended identifier prefix) are skipped and not
/// emitted as command classes. The input order is preserved.
pub fn parse_cc_list(i: &mut Bytes) -> ParseResult<Vec<CommandClassId>> {
    let mut ret = Vec::with_capacity(i.len());
    while !i.is_empty() {
        let id = be_u8(i)?;
        match id {
            0x00 | COMMAND_CLASS_SUPPORT_CONTROL_MARK | EXTENDED_COMMAND_CLASS_PREFIX => continue,
            _ => ret.push(CommandClassId::from(id)),
        }
    }
    Ok(ret)
}

/// Serializes a command class list, one byte per (non-extended) command class
pub fn serialize_cc_list<'a>(ccs: &'a [CommandClassId]) -> impl Serializable + 'a {
    move |output: &mut BytesMut| {
        for cc in ccs {
            cc.serialize(output);
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::hex_bytes;

    #[test]
    fn test_unknown_cc_does_not_fail() {
        let mut input = hex_bytes!("fe");
        let id = CommandClassId::parse(&mut input).unwrap();
        assert_eq!(id, CommandClassId::Unknown(0xfe));
    }

    #[test]
    fn test_extended_cc() {
        let mut input = hex_bytes!("f100");
        let id = CommandClassId::parse(&mut input).unwrap();
        assert_eq!(id, CommandClassId::Known(CommandClasses::SecurityMark));
    }

    #[test]
    fn test_cc_list_skips_markers() {
        // Basic, padding, mark, extended prefix, Binary Switch
        let mut input = hex_bytes!("2000eff125");
        let list = parse_cc_list(&mut input).unwrap();
        assert_eq!(
            list,
            vec![
                CommandClassId::Known(CommandClasses::Basic),
                CommandClassId::Known(CommandClasses::BinarySwitch),
            ]
        );
    }
}
