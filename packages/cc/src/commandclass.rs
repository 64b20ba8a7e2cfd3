use crate::commandclass_raw::CCRaw;
use bytes::{Bytes, BytesMut};
use enum_dispatch::enum_dispatch;
use typed_builder::TypedBuilder;
use zip_core::parse::{ParseError, ParseResult};
use zip_core::prelude::*;
use zip_core::submodule;

submodule!(association);
submodule!(basic);
submodule!(battery);
submodule!(binary_switch);
submodule!(configuration);
submodule!(door_lock);
submodule!(firmware_update_md);
submodule!(mailbox);
submodule!(manufacturer_specific);
submodule!(meter);
submodule!(multilevel_sensor);
submodule!(multilevel_switch);
submodule!(network_management_basic);
submodule!(network_management_inclusion);
submodule!(network_management_proxy);
submodule!(notification);
submodule!(thermostat_fan_mode);
submodule!(thermostat_fan_state);
submodule!(thermostat_mode);
submodule!(thermostat_setback);
submodule!(thermostat_setpoint);
submodule!(user_code);
submodule!(version);
submodule!(wake_up);

/// Pre-states shared by ordinary device commands
pub const DEVICE_COMMAND_PRE_STATES: &[NetworkMode] =
    &[NetworkMode::Idle, NetworkMode::ConfiguringNewNode];

#[derive(Default, Debug, Clone, TypedBuilder)]
#[builder(field_defaults(default))]
pub struct CCParsingContext {
    /// The node the command originated from, if known
    #[builder(setter(into))]
    pub source_node_id: Option<NodeId>,
}

pub trait CCParsable
where
    Self: Sized + CCBase,
{
    fn parse(i: &mut Bytes, ctx: &CCParsingContext) -> ParseResult<Self>;
}

#[enum_dispatch(CC)]
/// Identifies a command class and its commands
pub trait CCId: CCBase {
    /// The command class identifier
    fn cc_id(&self) -> CommandClasses;

    /// The subcommand identifier, if applicable
    fn cc_command(&self) -> Option<u8>;
}

#[enum_dispatch(CC)]
/// Command-specific behavior the runner and coordinator need
pub trait CCBase: std::fmt::Debug + Sync + Send + Clone + PartialEq {
    /// Whether this command finishes with a report instead of a bare ack
    fn expects_report(&self) -> bool {
        // Unless specified otherwise, assume that the command doesn't
        false
    }

    /// If this command expects a report, tests whether the given command is it
    fn test_report(&self, report: &CC) -> bool {
        let _ = report;
        false
    }

    /// The network modes the coordinator must be in to accept this command
    fn pre_states(&self) -> &'static [NetworkMode] {
        DEVICE_COMMAND_PRE_STATES
    }

    /// The network mode the coordinator enters while this command runs.
    /// `None` means the command does not change the mode.
    fn exec_state(&self) -> Option<NetworkMode> {
        None
    }
}

#[enum_dispatch(CC)]
pub trait CCSerializable {
    /// Serializes the command payload (everything after the command byte)
    fn serialize_payload(&self, output: &mut BytesMut);
}

#[enum_dispatch]
#[derive(Debug, Clone, PartialEq)]
pub enum CC {
    AssociationCCSet(AssociationCCSet),
    AssociationCCRemove(AssociationCCRemove),
    AssociationCCGet(AssociationCCGet),
    AssociationCCReport(AssociationCCReport),
    BasicCCSet(BasicCCSet),
    BasicCCGet(BasicCCGet),
    BasicCCReport(BasicCCReport),
    BatteryCCGet(BatteryCCGet),
    BatteryCCReport(BatteryCCReport),
    BinarySwitchCCSet(BinarySwitchCCSet),
    BinarySwitchCCGet(BinarySwitchCCGet),
    BinarySwitchCCReport(BinarySwitchCCReport),
    ConfigurationCCSet(ConfigurationCCSet),
    ConfigurationCCGet(ConfigurationCCGet),
    ConfigurationCCReport(ConfigurationCCReport),
    ConfigurationCCBulkGet(ConfigurationCCBulkGet),
    ConfigurationCCBulkReport(ConfigurationCCBulkReport),
    DoorLockCCOperationSet(DoorLockCCOperationSet),
    DoorLockCCOperationGet(DoorLockCCOperationGet),
    DoorLockCCOperationReport(DoorLockCCOperationReport),
    FirmwareUpdateMdCCMetaDataGet(FirmwareUpdateMdCCMetaDataGet),
    FirmwareUpdateMdCCMetaDataReport(FirmwareUpdateMdCCMetaDataReport),
    MailboxCCConfigurationGet(MailboxCCConfigurationGet),
    MailboxCCConfigurationReport(MailboxCCConfigurationReport),
    ManufacturerSpecificCCGet(ManufacturerSpecificCCGet),
    ManufacturerSpecificCCReport(ManufacturerSpecificCCReport),
    ManufacturerSpecificCCDeviceSpecificGet(ManufacturerSpecificCCDeviceSpecificGet),
    ManufacturerSpecificCCDeviceSpecificReport(ManufacturerSpecificCCDeviceSpecificReport),
    MeterCCGet(MeterCCGet),
    MeterCCReport(MeterCCReport),
    MultilevelSensorCCGet(MultilevelSensorCCGet),
    MultilevelSensorCCReport(MultilevelSensorCCReport),
    MultilevelSwitchCCSet(MultilevelSwitchCCSet),
    MultilevelSwitchCCGet(MultilevelSwitchCCGet),
    MultilevelSwitchCCReport(MultilevelSwitchCCReport),
    NetworkManagementBasicCCLearnModeSet(NetworkManagementBasicCCLearnModeSet),
    NetworkManagementBasicCCLearnModeSetStatus(NetworkManagementBasicCCLearnModeSetStatus),
    NetworkManagementBasicCCDefaultSet(NetworkManagementBasicCCDefaultSet),
    NetworkManagementBasicCCDefaultSetComplete(NetworkManagementBasicCCDefaultSetComplete),
    NetworkManagementInclusionCCNodeAdd(NetworkManagementInclusionCCNodeAdd),
    NetworkManagementInclusionCCNodeAddStatus(NetworkManagementInclusionCCNodeAddStatus),
    NetworkManagementInclusionCCNodeRemove(NetworkManagementInclusionCCNodeRemove),
    NetworkManagementInclusionCCNodeRemoveStatus(NetworkManagementInclusionCCNodeRemoveStatus),
    NetworkManagementInclusionCCNodeNeighborUpdateRequest(
        NetworkManagementInclusionCCNodeNeighborUpdateRequest,
    ),
    NetworkManagementInclusionCCNodeNeighborUpdateStatus(
        NetworkManagementInclusionCCNodeNeighborUpdateStatus,
    ),
    NetworkManagementInclusionCCNodeAddKeysReport(NetworkManagementInclusionCCNodeAddKeysReport),
    NetworkManagementInclusionCCNodeAddKeysSet(NetworkManagementInclusionCCNodeAddKeysSet),
    NetworkManagementInclusionCCNodeAddDskReport(NetworkManagementInclusionCCNodeAddDskReport),
    NetworkManagementInclusionCCNodeAddDskSet(NetworkManagementInclusionCCNodeAddDskSet),
    NetworkManagementProxyCCNodeListGet(NetworkManagementProxyCCNodeListGet),
    NetworkManagementProxyCCNodeListReport(NetworkManagementProxyCCNodeListReport),
    NetworkManagementProxyCCNodeInfoCachedGet(NetworkManagementProxyCCNodeInfoCachedGet),
    NetworkManagementProxyCCNodeInfoCachedReport(NetworkManagementProxyCCNodeInfoCachedReport),
    NotificationCCGet(NotificationCCGet),
    NotificationCCReport(NotificationCCReport),
    ThermostatFanModeCCSet(ThermostatFanModeCCSet),
    ThermostatFanModeCCGet(ThermostatFanModeCCGet),
    ThermostatFanModeCCReport(ThermostatFanModeCCReport),
    ThermostatFanStateCCGet(ThermostatFanStateCCGet),
    ThermostatFanStateCCReport(ThermostatFanStateCCReport),
    ThermostatModeCCSet(ThermostatModeCCSet),
    ThermostatModeCCGet(ThermostatModeCCGet),
    ThermostatModeCCReport(ThermostatModeCCReport),
    ThermostatSetbackCCSet(ThermostatSetbackCCSet),
    ThermostatSetbackCCGet(ThermostatSetbackCCGet),
    ThermostatSetbackCCReport(ThermostatSetbackCCReport),
    ThermostatSetpointCCSet(ThermostatSetpointCCSet),
    ThermostatSetpointCCGet(ThermostatSetpointCCGet),
    ThermostatSetpointCCReport(ThermostatSetpointCCReport),
    UserCodeCCSet(UserCodeCCSet),
    UserCodeCCGet(UserCodeCCGet),
    UserCodeCCReport(UserCodeCCReport),
    VersionCCCommandClassGet(VersionCCCommandClassGet),
    VersionCCCommandClassReport(VersionCCCommandClassReport),
    WakeUpCCIntervalSet(WakeUpCCIntervalSet),
    WakeUpCCIntervalGet(WakeUpCCIntervalGet),
    WakeUpCCIntervalReport(WakeUpCCIntervalReport),
    WakeUpCCNotification(WakeUpCCNotification),
    WakeUpCCNoMoreInformation(WakeUpCCNoMoreInformation),
    WakeUpCCIntervalCapabilitiesGet(WakeUpCCIntervalCapabilitiesGet),
    WakeUpCCIntervalCapabilitiesReport(WakeUpCCIntervalCapabilitiesReport),
}

impl CC {
    /// Interprets a raw command class frame. Unknown classes and commands result
    /// in a `NotImplemented` error; callers keep the raw frame in that case so
    /// nothing is lost.
    pub fn try_from_raw(raw: CCRaw, ctx: &CCParsingContext) -> ParseResult<Self> {
        use CommandClasses as C;

        let cc_id = match raw.cc_id {
            CommandClassId::Known(cc) => cc,
            CommandClassId::Unknown(id) => {
                return Err(ParseError::not_implemented(format!(
                    "unknown command class {:#04x}",
                    id
                )))
            }
        };
        let Some(cc_command) = raw.cc_command else {
            return Err(ParseError::not_implemented(
                "command class without a command byte",
            ));
        };

        let mut payload = raw.payload.clone();
        let i = &mut payload;

        let cc: CC = match (cc_id, cc_command) {
            (C::Association, 0x01) => AssociationCCSet::parse(i, ctx)?.into(),
            (C::Association, 0x02) => AssociationCCGet::parse(i, ctx)?.into(),
            // 0x06 is tolerated because some gateways mislabel the report
            (C::Association, 0x03 | ASSOCIATION_REPORT_ALT_COMMAND) => {
                AssociationCCReport::parse(i, ctx)?.into()
            }
            (C::Association, 0x04) => AssociationCCRemove::parse(i, ctx)?.into(),
            (C::Basic, 0x01) => BasicCCSet::parse(i, ctx)?.into(),
            (C::Basic, 0x02) => BasicCCGet::parse(i, ctx)?.into(),
            (C::Basic, 0x03) => BasicCCReport::parse(i, ctx)?.into(),
            (C::Battery, 0x02) => BatteryCCGet::parse(i, ctx)?.into(),
            (C::Battery, 0x03) => BatteryCCReport::parse(i, ctx)?.into(),
            (C::BinarySwitch, 0x01) => BinarySwitchCCSet::parse(i, ctx)?.into(),
            (C::BinarySwitch, 0x02) => BinarySwitchCCGet::parse(i, ctx)?.into(),
            (C::BinarySwitch, 0x03) => BinarySwitchCCReport::parse(i, ctx)?.into(),
            (C::Configuration, 0x04) => ConfigurationCCSet::parse(i, ctx)?.into(),
            (C::Configuration, 0x05) => ConfigurationCCGet::parse(i, ctx)?.into(),
            (C::Configuration, 0x06) => ConfigurationCCReport::parse(i, ctx)?.into(),
            (C::Configuration, 0x08) => ConfigurationCCBulkGet::parse(i, ctx)?.into(),
            (C::Configuration, 0x09) => ConfigurationCCBulkReport::parse(i, ctx)?.into(),
            (C::DoorLock, 0x01) => DoorLockCCOperationSet::parse(i, ctx)?.into(),
            (C::DoorLock, 0x02) => DoorLockCCOperationGet::parse(i, ctx)?.into(),
            (C::DoorLock, 0x03) => DoorLockCCOperationReport::parse(i, ctx)?.into(),
            (C::FirmwareUpdateMetaData, 0x01) => {
                FirmwareUpdateMdCCMetaDataGet::parse(i, ctx)?.into()
            }
            (C::FirmwareUpdateMetaData, 0x02) => {
                FirmwareUpdateMdCCMetaDataReport::parse(i, ctx)?.into()
            }
            (C::Mailbox, 0x01) => MailboxCCConfigurationGet::parse(i, ctx)?.into(),
            (C::Mailbox, 0x03) => MailboxCCConfigurationReport::parse(i, ctx)?.into(),
            (C::ManufacturerSpecific, 0x04) => ManufacturerSpecificCCGet::parse(i, ctx)?.into(),
            (C::ManufacturerSpecific, 0x05) => {
                ManufacturerSpecificCCReport::parse(i, ctx)?.into()
            }
            (C::ManufacturerSpecific, 0x06) => {
                ManufacturerSpecificCCDeviceSpecificGet::parse(i, ctx)?.into()
            }
            (C::ManufacturerSpecific, 0x07) => {
                ManufacturerSpecificCCDeviceSpecificReport::parse(i, ctx)?.into()
            }
            (C::Meter, 0x01) => MeterCCGet::parse(i, ctx)?.into(),
            (C::Meter, 0x02) => MeterCCReport::parse(i, ctx)?.into(),
            (C::MultilevelSensor, 0x04) => MultilevelSensorCCGet::parse(i, ctx)?.into(),
            (C::MultilevelSensor, 0x05) => MultilevelSensorCCReport::parse(i, ctx)?.into(),
            (C::MultilevelSwitch, 0x01) => MultilevelSwitchCCSet::parse(i, ctx)?.into(),
            (C::MultilevelSwitch, 0x02) => MultilevelSwitchCCGet::parse(i, ctx)?.into(),
            (C::MultilevelSwitch, 0x03) => MultilevelSwitchCCReport::parse(i, ctx)?.into(),
            (C::NetworkManagementBasic, 0x01) => {
                NetworkManagementBasicCCLearnModeSet::parse(i, ctx)?.into()
            }
            (C::NetworkManagementBasic, 0x02) => {
                NetworkManagementBasicCCLearnModeSetStatus::parse(i, ctx)?.into()
            }
            (C::NetworkManagementBasic, 0x06) => {
                NetworkManagementBasicCCDefaultSet::parse(i, ctx)?.into()
            }
            (C::NetworkManagementBasic, 0x07) => {
                NetworkManagementBasicCCDefaultSetComplete::parse(i, ctx)?.into()
            }
            (C::NetworkManagementInclusion, 0x01) => {
                NetworkManagementInclusionCCNodeAdd::parse(i, ctx)?.into()
            }
            (C::NetworkManagementInclusion, 0x02) => {
                NetworkManagementInclusionCCNodeAddStatus::parse(i, ctx)?.into()
            }
            (C::NetworkManagementInclusion, 0x03) => {
                NetworkManagementInclusionCCNodeRemove::parse(i, ctx)?.into()
            }
            (C::NetworkManagementInclusion, 0x04) => {
                NetworkManagementInclusionCCNodeRemoveStatus::parse(i, ctx)?.into()
            }
            (C::NetworkManagementInclusion, 0x0b) => {
                NetworkManagementInclusionCCNodeNeighborUpdateRequest::parse(i, ctx)?.into()
            }
            (C::NetworkManagementInclusion, 0x0c) => {
                NetworkManagementInclusionCCNodeNeighborUpdateStatus::parse(i, ctx)?.into()
            }
            (C::NetworkManagementInclusion, 0x11) => {
                NetworkManagementInclusionCCNodeAddKeysReport::parse(i, ctx)?.into()
            }
            (C::NetworkManagementInclusion, 0x12) => {
                NetworkManagementInclusionCCNodeAddKeysSet::parse(i, ctx)?.into()
            }
            (C::NetworkManagementInclusion, 0x13) => {
                NetworkManagementInclusionCCNodeAddDskReport::parse(i, ctx)?.into()
            }
            (C::NetworkManagementInclusion, 0x14) => {
                NetworkManagementInclusionCCNodeAddDskSet::parse(i, ctx)?.into()
            }
            (C::NetworkManagementProxy, 0x01) => {
                NetworkManagementProxyCCNodeListGet::parse(i, ctx)?.into()
            }
            (C::NetworkManagementProxy, 0x02) => {
                NetworkManagementProxyCCNodeListReport::parse(i, ctx)?.into()
            }
            (C::NetworkManagementProxy, 0x03) => {
                NetworkManagementProxyCCNodeInfoCachedGet::parse(i, ctx)?.into()
            }
            (C::NetworkManagementProxy, 0x04) => {
                NetworkManagementProxyCCNodeInfoCachedReport::parse(i, ctx)?.into()
            }
            (C::Notification, 0x04) => NotificationCCGet::parse(i, ctx)?.into(),
            (C::Notification, 0x05) => NotificationCCReport::parse(i, ctx)?.into(),
            (C::ThermostatFanMode, 0x01) => ThermostatFanModeCCSet::parse(i, ctx)?.into(),
            (C::ThermostatFanMode, 0x02) => ThermostatFanModeCCGet::parse(i, ctx)?.into(),
            (C::ThermostatFanMode, 0x03) => ThermostatFanModeCCReport::parse(i, ctx)?.into(),
            (C::ThermostatFanState, 0x02) => ThermostatFanStateCCGet::parse(i, ctx)?.into(),
            (C::ThermostatFanState, 0x03) => ThermostatFanStateCCReport::parse(i, ctx)?.into(),
            (C::ThermostatMode, 0x01) => ThermostatModeCCSet::parse(i, ctx)?.into(),
            (C::ThermostatMode, 0x02) => ThermostatModeCCGet::parse(i, ctx)?.into(),
            (C::ThermostatMode, 0x03) => ThermostatModeCCReport::parse(i, ctx)?.into(),
            (C::ThermostatSetback, 0x01) => ThermostatSetbackCCSet::parse(i, ctx)?.into(),
            (C::ThermostatSetback, 0x02) => ThermostatSetbackCCGet::parse(i, ctx)?.into(),
            (C::ThermostatSetback, 0x03) => ThermostatSetbackCCReport::parse(i, ctx)?.into(),
            (C::ThermostatSetpoint, 0x01) => ThermostatSetpointCCSet::parse(i, ctx)?.into(),
            (C::ThermostatSetpoint, 0x02) => ThermostatSetpointCCGet::parse(i, ctx)?.into(),
            (C::ThermostatSetpoint, 0x03) => ThermostatSetpointCCReport::parse(i, ctx)?.into(),
            (C::UserCode, 0x01) => UserCodeCCSet::parse(i, ctx)?.into(),
            (C::UserCode, 0x02) => UserCodeCCGet::parse(i, ctx)?.into(),
            (C::UserCode, 0x03) => UserCodeCCReport::parse(i, ctx)?.into(),
            (C::Version, 0x13) => VersionCCCommandClassGet::parse(i, ctx)?.into(),
            (C::Version, 0x14) => VersionCCCommandClassReport::parse(i, ctx)?.into(),
            (C::WakeUp, 0x04) => WakeUpCCIntervalSet::parse(i, ctx)?.into(),
            (C::WakeUp, 0x05) => WakeUpCCIntervalGet::parse(i, ctx)?.into(),
            (C::WakeUp, 0x06) => WakeUpCCIntervalReport::parse(i, ctx)?.into(),
            (C::WakeUp, 0x07) => WakeUpCCNotification::parse(i, ctx)?.into(),
            (C::WakeUp, 0x08) => WakeUpCCNoMoreInformation::parse(i, ctx)?.into(),
            (C::WakeUp, 0x09) => WakeUpCCIntervalCapabilitiesGet::parse(i, ctx)?.into(),
            (C::WakeUp, 0x0a) => WakeUpCCIntervalCapabilitiesReport::parse(i, ctx)?.into(),
            (cc, cmd) => {
                return Err(ParseError::not_implemented(format!(
                    "unknown command {:#04x} for command class {}",
                    cmd, cc
                )))
            }
        };

        Ok(cc)
    }

    /// Network management commands carry their own sequence number in the body.
    /// The coordinator stamps the envelope sequence number into it so status
    /// reports can be matched back to the request.
    pub fn with_seq_no(mut self, seq_no: u8) -> Self {
        match &mut self {
            CC::NetworkManagementInclusionCCNodeAdd(cc) => cc.seq_no = seq_no,
            CC::NetworkManagementInclusionCCNodeRemove(cc) => cc.seq_no = seq_no,
            CC::NetworkManagementInclusionCCNodeNeighborUpdateRequest(cc) => cc.seq_no = seq_no,
            CC::NetworkManagementInclusionCCNodeAddKeysSet(cc) => cc.seq_no = seq_no,
            CC::NetworkManagementInclusionCCNodeAddDskSet(cc) => cc.seq_no = seq_no,
            CC::NetworkManagementBasicCCLearnModeSet(cc) => cc.seq_no = seq_no,
            CC::NetworkManagementBasicCCDefaultSet(cc) => cc.seq_no = seq_no,
            CC::NetworkManagementProxyCCNodeListGet(cc) => cc.seq_no = seq_no,
            CC::NetworkManagementProxyCCNodeInfoCachedGet(cc) => cc.seq_no = seq_no,
            _ => {}
        }
        self
    }

    /// Serializes this command back into its raw frame form
    pub fn as_raw(&self) -> CCRaw {
        let mut payload = BytesMut::with_capacity(16);
        self.serialize_payload(&mut payload);
        CCRaw {
            cc_id: self.cc_id().into(),
            cc_command: self.cc_command(),
            payload: payload.freeze(),
        }
    }
}

impl ToLogPayload for CC {
    fn to_log_payload(&self) -> LogPayload {
        LogPayloadText::new(format!("{:?}", self)).into()
    }
}

/// A command that was at least structurally decoded. Commands this library has
/// no typed representation for stay in their raw form and are passed through
/// verbatim instead of being dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum CcOrRaw {
    CC(CC),
    Raw(CCRaw),
}

impl CcOrRaw {
    pub fn as_raw(&self) -> CCRaw {
        match self {
            CcOrRaw::CC(cc) => cc.as_raw(),
            CcOrRaw::Raw(raw) => raw.clone(),
        }
    }

    /// Attempts the typed interpretation, keeping the raw form on unknown
    /// commands and failing only on malformed known ones
    pub fn from_raw(raw: CCRaw, ctx: &CCParsingContext) -> ParseResult<Self> {
        match CC::try_from_raw(raw.clone(), ctx) {
            Ok(cc) => Ok(CcOrRaw::CC(cc)),
            Err(ParseError::Final(zip_core::parse::ErrorContext::NotImplemented(_))) => {
                Ok(CcOrRaw::Raw(raw))
            }
            Err(e) => Err(e),
        }
    }

    pub fn as_cc(&self) -> Option<&CC> {
        match self {
            CcOrRaw::CC(cc) => Some(cc),
            CcOrRaw::Raw(_) => None,
        }
    }
}

impl From<CC> for CcOrRaw {
    fn from(val: CC) -> Self {
        Self::CC(val)
    }
}

impl From<CCRaw> for CcOrRaw {
    fn from(val: CCRaw) -> Self {
        Self::Raw(val)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use zip_core::hex_bytes;
    use zip_core::parse::Parsable;
    use zip_core::serialize::Serializable;

    #[test]
    fn test_unknown_command_class_stays_raw() {
        let ctx = CCParsingContext::default();
        let mut input = hex_bytes!("fefe010203");
        let raw = CCRaw::parse(&mut input).unwrap();
        let cc = CcOrRaw::from_raw(raw.clone(), &ctx).unwrap();
        assert_eq!(cc, CcOrRaw::Raw(raw.clone()));
        assert_eq!(raw.cc_id, CommandClassId::Unknown(0xfe));
        assert_eq!(raw.cc_command, Some(0xfe));
        assert_eq!(raw.payload, hex_bytes!("010203"));
    }

    #[test]
    fn test_known_class_unknown_command_stays_raw() {
        let ctx = CCParsingContext::default();
        let mut input = hex_bytes!("25e001");
        let raw = CCRaw::parse(&mut input).unwrap();
        let cc = CcOrRaw::from_raw(raw.clone(), &ctx).unwrap();
        assert_eq!(cc, CcOrRaw::Raw(raw));
    }

    #[test]
    fn test_dispatch_roundtrip() {
        let ctx = CCParsingContext::default();
        let cc = CC::BinarySwitchCCSet(
            BinarySwitchCCSet::builder()
                .target_value(BinarySet::On)
                .build(),
        );
        let raw = cc.as_raw();
        let bytes = raw.as_bytes();
        assert_eq!(bytes, hex_bytes!("2501ff"));

        let mut input = bytes;
        let parsed_raw = CCRaw::parse(&mut input).unwrap();
        let parsed = CC::try_from_raw(parsed_raw, &ctx).unwrap();
        assert_eq!(parsed, cc);
    }

    #[test]
    fn test_association_report_alt_command_byte() {
        let ctx = CCParsingContext::default();
        // The same report body under 0x03 and the mislabeled 0x06
        for cmd in [0x03u8, 0x06] {
            let raw = CCRaw {
                cc_id: CommandClassId::Known(CommandClasses::Association),
                cc_command: Some(cmd),
                payload: hex_bytes!("01050002"),
            };
            let cc = CC::try_from_raw(raw, &ctx).unwrap();
            match cc {
                CC::AssociationCCReport(report) => {
                    assert_eq!(report.group_id, 1);
                    assert_eq!(report.node_ids, vec![NodeId::new(2).unwrap()]);
                }
                other => panic!("expected an association report, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_mode_policy() {
        let node_add = CC::NetworkManagementInclusionCCNodeAdd(
            NetworkManagementInclusionCCNodeAdd::builder().seq_no(1).build(),
        );
        assert_eq!(node_add.pre_states(), &[NetworkMode::Idle]);
        assert_eq!(node_add.exec_state(), Some(NetworkMode::IncludingNode));

        let get = CC::BinarySwitchCCGet(BinarySwitchCCGet::default());
        assert_eq!(get.pre_states(), DEVICE_COMMAND_PRE_STATES);
        assert_eq!(get.exec_state(), None);
    }
}
