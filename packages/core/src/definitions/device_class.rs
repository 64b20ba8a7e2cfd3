use crate::definitions::MaybeKnown;
use crate::impl_maybe_known_codec;
use derive_try_from_primitive::TryFromPrimitive;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum BasicDeviceClass {
    PortableController = 0x01,
    StaticController = 0x02,
    EndNode = 0x03,
    RoutingEndNode = 0x04,
}

impl Display for BasicDeviceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BasicDeviceClass::PortableController => write!(f, "Portable Controller"),
            BasicDeviceClass::StaticController => write!(f, "Static Controller"),
            BasicDeviceClass::EndNode => write!(f, "End Node"),
            BasicDeviceClass::RoutingEndNode => write!(f, "Routing End Node"),
        }
    }
}

impl_maybe_known_codec!(BasicDeviceClass);

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum GenericDeviceClass {
    RemoteController = 0x01,
    StaticController = 0x02,
    AvControlPoint = 0x03,
    Display = 0x04,
    NetworkExtender = 0x05,
    Appliance = 0x06,
    SensorNotification = 0x07,
    Thermostat = 0x08,
    WindowCovering = 0x09,
    RepeaterEndNode = 0x0f,
    BinarySwitch = 0x10,
    MultilevelSwitch = 0x11,
    RemoteSwitch = 0x12,
    ToggleSwitch = 0x13,
    ZipNode = 0x15,
    Ventilation = 0x16,
    SecurityPanel = 0x17,
    WallController = 0x18,
    BinarySensor = 0x20,
    MultilevelSensor = 0x21,
    Meter = 0x31,
    EntryControl = 0x40,
    SemiInteroperable = 0x50,
    AlarmSensor = 0xa1,
    NonInteroperable = 0xff,
}

impl Display for GenericDeviceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            GenericDeviceClass::RemoteController => "Remote Controller",
            GenericDeviceClass::StaticController => "Static Controller",
            GenericDeviceClass::AvControlPoint => "AV Control Point",
            GenericDeviceClass::Display => "Display",
            GenericDeviceClass::NetworkExtender => "Network Extender",
            GenericDeviceClass::Appliance => "Appliance",
            GenericDeviceClass::SensorNotification => "Sensor Notification",
            GenericDeviceClass::Thermostat => "Thermostat",
            GenericDeviceClass::WindowCovering => "Window Covering",
            GenericDeviceClass::RepeaterEndNode => "Repeater End Node",
            GenericDeviceClass::BinarySwitch => "Binary Switch",
            GenericDeviceClass::MultilevelSwitch => "Multilevel Switch",
            GenericDeviceClass::RemoteSwitch => "Remote Switch",
            GenericDeviceClass::ToggleSwitch => "Toggle Switch",
            GenericDeviceClass::ZipNode => "Z/IP Node",
            GenericDeviceClass::Ventilation => "Ventilation",
            GenericDeviceClass::SecurityPanel => "Security Panel",
            GenericDeviceClass::WallController => "Wall Controller",
            GenericDeviceClass::BinarySensor => "Binary Sensor",
            GenericDeviceClass::MultilevelSensor => "Multilevel Sensor",
            GenericDeviceClass::Meter => "Meter",
            GenericDeviceClass::EntryControl => "Entry Control",
            GenericDeviceClass::SemiInteroperable => "Semi Interoperable",
            GenericDeviceClass::AlarmSensor => "Alarm Sensor",
            GenericDeviceClass::NonInteroperable => "Non Interoperable",
        };
        f.write_str(name)
    }
}

impl_maybe_known_codec!(GenericDeviceClass);

/// Specific device classes are scoped by their generic class
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecificDeviceClass {
    NotUsed,
    PortableSceneController,
    PcController,
    SceneSwitchBinary,
    PowerSwitchBinary,
    SirenSwitchBinary,
    ValveOpenClose,
    PowerSwitchMultilevel,
    MotorMultiposition,
    SceneSwitchMultilevel,
    FanSwitch,
    RoutingSensorBinary,
    RoutingSensorMultilevel,
    SimpleMeter,
    DoorLock,
    AdvancedDoorLock,
    SecureKeypadDoorLock,
    SecureKeypad,
    ThermostatGeneral,
    ThermostatGeneralV2,
    SetpointThermostat,
    SetbackScheduleThermostat,
    ZonedSecurityPanel,
    Unknown(u8, u8),
}

impl SpecificDeviceClass {
    /// Resolves the (generic, specific) pair. 0x00 always means "not used".
    pub fn lookup(generic: MaybeKnown<GenericDeviceClass>, specific: u8) -> Self {
        use GenericDeviceClass as G;
        use SpecificDeviceClass as S;

        if specific == 0x00 {
            return S::NotUsed;
        }

        let generic = match generic.known() {
            Some(g) => *g,
            None => return S::Unknown(u8::from(generic), specific),
        };

        match (generic, specific) {
            (G::RemoteController, 0x01) => S::PortableSceneController,
            (G::StaticController, 0x01) => S::PcController,
            (G::BinarySwitch, 0x01) => S::PowerSwitchBinary,
            (G::BinarySwitch, 0x03) => S::SceneSwitchBinary,
            (G::BinarySwitch, 0x05) => S::SirenSwitchBinary,
            (G::BinarySwitch, 0x06) => S::ValveOpenClose,
            (G::MultilevelSwitch, 0x01) => S::PowerSwitchMultilevel,
            (G::MultilevelSwitch, 0x03) => S::MotorMultiposition,
            (G::MultilevelSwitch, 0x04) => S::SceneSwitchMultilevel,
            (G::MultilevelSwitch, 0x08) => S::FanSwitch,
            (G::BinarySensor, 0x01) => S::RoutingSensorBinary,
            (G::MultilevelSensor, 0x01) => S::RoutingSensorMultilevel,
            (G::Meter, 0x01) => S::SimpleMeter,
            (G::EntryControl, 0x01) => S::DoorLock,
            (G::EntryControl, 0x02) => S::AdvancedDoorLock,
            (G::EntryControl, 0x03) => S::SecureKeypadDoorLock,
            (G::EntryControl, 0x0b) => S::SecureKeypad,
            (G::Thermostat, 0x02) => S::ThermostatGeneral,
            (G::Thermostat, 0x06) => S::ThermostatGeneralV2,
            (G::Thermostat, 0x04) => S::SetpointThermostat,
            (G::Thermostat, 0x05) => S::SetbackScheduleThermostat,
            (G::SecurityPanel, 0x01) => S::ZonedSecurityPanel,
            (g, s) => S::Unknown(g as u8, s),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_unknown_generic_class() {
        let class = MaybeKnown::<GenericDeviceClass>::from(0xab);
        assert_eq!(class, MaybeKnown::Unknown(0xab));
    }

    #[test]
    fn test_specific_lookup() {
        let generic = MaybeKnown::Known(GenericDeviceClass::BinarySwitch);
        assert_eq!(
            SpecificDeviceClass::lookup(generic, 0x01),
            SpecificDeviceClass::PowerSwitchBinary
        );
        assert_eq!(
            SpecificDeviceClass::lookup(generic, 0x00),
            SpecificDeviceClass::NotUsed
        );
        assert_eq!(
            SpecificDeviceClass::lookup(generic, 0x7f),
            SpecificDeviceClass::Unknown(0x10, 0x7f)
        );
    }
}
