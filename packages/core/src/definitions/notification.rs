use derive_try_from_primitive::TryFromPrimitive;
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum NotificationType {
    SmokeAlarm = 0x01,
    CoAlarm = 0x02,
    Co2Alarm = 0x03,
    HeatAlarm = 0x04,
    WaterAlarm = 0x05,
    AccessControl = 0x06,
    HomeSecurity = 0x07,
    PowerManagement = 0x08,
    System = 0x09,
    EmergencyAlarm = 0x0a,
    Clock = 0x0b,
    Appliance = 0x0c,
    HomeHealth = 0x0d,
    Siren = 0x0e,
    WaterValve = 0x0f,
    WeatherAlarm = 0x10,
    Irrigation = 0x11,
    GasAlarm = 0x12,
}

impl Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SmokeAlarm => write!(f, "Smoke Alarm"),
            Self::CoAlarm => write!(f, "CO Alarm"),
            Self::Co2Alarm => write!(f, "CO2 Alarm"),
            Self::HeatAlarm => write!(f, "Heat Alarm"),
            Self::WaterAlarm => write!(f, "Water Alarm"),
            Self::AccessControl => write!(f, "Access Control"),
            Self::HomeSecurity => write!(f, "Home Security"),
            Self::PowerManagement => write!(f, "Power Management"),
            Self::System => write!(f, "System"),
            Self::EmergencyAlarm => write!(f, "Emergency Alarm"),
            Self::Clock => write!(f, "Clock"),
            Self::Appliance => write!(f, "Appliance"),
            Self::HomeHealth => write!(f, "Home Health"),
            Self::Siren => write!(f, "Siren"),
            Self::WaterValve => write!(f, "Water Valve"),
            Self::WeatherAlarm => write!(f, "Weather Alarm"),
            Self::Irrigation => write!(f, "Irrigation"),
            Self::GasAlarm => write!(f, "Gas Alarm"),
        }
    }
}

crate::impl_maybe_known_codec!(NotificationType);

/// Typed notification events for the types this library resolves. Everything
/// else is carried as a raw event byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationEvent {
    Idle,
    // Smoke / CO / CO2 / heat / water
    AlarmDetected,
    AlarmDetectedUnknownLocation,
    AlarmTest,
    // Access control
    ManualLock,
    ManualUnlock,
    RfLock,
    RfUnlock,
    KeypadLock,
    KeypadUnlock,
    DoorOpen,
    DoorClosed,
    // Home security
    Intrusion,
    IntrusionUnknownLocation,
    TamperingCoverRemoved,
    TamperingInvalidCode,
    GlassBreakage,
    MotionDetected,
    MotionDetectedUnknownLocation,
    // Power management
    PowerApplied,
    AcDisconnected,
    AcReconnected,
    ReplaceBatterySoon,
    ReplaceBatteryNow,
    Unknown(u8),
}

impl NotificationEvent {
    /// Resolves a (notification type, event byte) pair. Event 0x00 is always
    /// the idle state.
    pub fn lookup(notification_type: NotificationType, event: u8) -> Self {
        use NotificationEvent as E;
        use NotificationType as T;

        if event == 0x00 {
            return E::Idle;
        }

        match (notification_type, event) {
            (
                T::SmokeAlarm | T::CoAlarm | T::Co2Alarm | T::HeatAlarm | T::WaterAlarm,
                0x01,
            ) => E::AlarmDetected,
            (
                T::SmokeAlarm | T::CoAlarm | T::Co2Alarm | T::HeatAlarm | T::WaterAlarm,
                0x02,
            ) => E::AlarmDetectedUnknownLocation,
            (T::SmokeAlarm, 0x03) => E::AlarmTest,
            (T::AccessControl, 0x01) => E::ManualLock,
            (T::AccessControl, 0x02) => E::ManualUnlock,
            (T::AccessControl, 0x03) => E::RfLock,
            (T::AccessControl, 0x04) => E::RfUnlock,
            (T::AccessControl, 0x05) => E::KeypadLock,
            (T::AccessControl, 0x06) => E::KeypadUnlock,
            (T::AccessControl, 0x16) => E::DoorOpen,
            (T::AccessControl, 0x17) => E::DoorClosed,
            (T::HomeSecurity, 0x01) => E::Intrusion,
            (T::HomeSecurity, 0x02) => E::IntrusionUnknownLocation,
            (T::HomeSecurity, 0x03) => E::TamperingCoverRemoved,
            (T::HomeSecurity, 0x04) => E::TamperingInvalidCode,
            (T::HomeSecurity, 0x05) => E::GlassBreakage,
            (T::HomeSecurity, 0x07) => E::MotionDetected,
            (T::HomeSecurity, 0x08) => E::MotionDetectedUnknownLocation,
            (T::PowerManagement, 0x01) => E::PowerApplied,
            (T::PowerManagement, 0x02) => E::AcDisconnected,
            (T::PowerManagement, 0x03) => E::AcReconnected,
            (T::PowerManagement, 0x0a) => E::ReplaceBatterySoon,
            (T::PowerManagement, 0x0b) => E::ReplaceBatteryNow,
            (_, event) => E::Unknown(event),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_event_lookup() {
        assert_eq!(
            NotificationEvent::lookup(NotificationType::AccessControl, 0x06),
            NotificationEvent::KeypadUnlock
        );
        assert_eq!(
            NotificationEvent::lookup(NotificationType::HomeSecurity, 0x00),
            NotificationEvent::Idle
        );
        assert_eq!(
            NotificationEvent::lookup(NotificationType::Clock, 0x42),
            NotificationEvent::Unknown(0x42)
        );
    }
}
