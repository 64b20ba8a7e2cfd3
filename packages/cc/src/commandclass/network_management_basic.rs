use crate::commandclass::{CCBase, CCId, CCParsable, CCParsingContext, CCSerializable, CC};
use bytes::{Bytes, BytesMut};
use derive_try_from_primitive::TryFromPrimitive;
use typed_builder::TypedBuilder;
use zip_core::parse::{bytes::be_u8, Parsable, ParseResult};
use zip_core::prelude::*;
use zip_core::serialize::{self, Serializable};

#[derive(Debug, Clone, Copy, PartialEq, TryFromPrimitive)]
#[repr(u8)]
pub enum NetworkManagementBasicCCCommand {
    LearnModeSet = 0x01,
    LearnModeSetStatus = 0x02,
    DefaultSet = 0x06,
    DefaultSetComplete = 0x07,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum LearnMode {
    Disable = 0x00,
    Classic = 0x01,
    NetworkWide = 0x02,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum LearnModeStatusKind {
    Done = 0x06,
    Failed = 0x07,
    SecurityFailed = 0x09,
}

zip_core::impl_maybe_known_codec!(LearnModeStatusKind);

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum DefaultSetStatusKind {
    Done = 0x06,
    Busy = 0x07,
}

zip_core::impl_maybe_known_codec!(DefaultSetStatusKind);

/// Puts this controller into learn mode so another controller can include it
#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct NetworkManagementBasicCCLearnModeSet {
    pub seq_no: u8,
    #[builder(default = LearnMode::Classic)]
    pub mode: LearnMode,
}

impl CCBase for NetworkManagementBasicCCLearnModeSet {
    fn expects_report(&self) -> bool {
        self.mode != LearnMode::Disable
    }

    fn test_report(&self, report: &CC) -> bool {
        matches!(
            report,
            CC::NetworkManagementBasicCCLearnModeSetStatus(status)
                if status.seq_no == self.seq_no
        )
    }

    fn pre_states(&self) -> &'static [NetworkMode] {
        match self.mode {
            LearnMode::Disable => &[NetworkMode::LearnMode],
            _ => &[NetworkMode::Idle],
        }
    }

    fn exec_state(&self) -> Option<NetworkMode> {
        match self.mode {
            LearnMode::Disable => None,
            _ => Some(NetworkMode::LearnMode),
        }
    }
}

impl CCId for NetworkManagementBasicCCLearnModeSet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::NetworkManagementBasic
    }

    fn cc_command(&self) -> Option<u8> {
        Some(NetworkManagementBasicCCCommand::LearnModeSet as _)
    }
}

impl CCParsable for NetworkManagementBasicCCLearnModeSet {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let seq_no = be_u8(i)?;
        let _reserved = be_u8(i)?;
        let mode = LearnMode::try_from(be_u8(i)?)?;
        Ok(Self { seq_no, mode })
    }
}

impl CCSerializable for NetworkManagementBasicCCLearnModeSet {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        be_u8(self.seq_no).serialize(output);
        be_u8(0).serialize(output);
        be_u8(self.mode as u8).serialize(output);
    }
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct NetworkManagementBasicCCLearnModeSetStatus {
    pub seq_no: u8,
    #[builder(setter(into))]
    pub status: MaybeKnown<LearnModeStatusKind>,
    /// The node id this controller received from the including controller
    #[builder(default, setter(into))]
    pub new_node_id: Option<NodeId>,
}

impl CCBase for NetworkManagementBasicCCLearnModeSetStatus {}

impl CCId for NetworkManagementBasicCCLearnModeSetStatus {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::NetworkManagementBasic
    }

    fn cc_command(&self) -> Option<u8> {
        Some(NetworkManagementBasicCCCommand::LearnModeSetStatus as _)
    }
}

impl CCParsable for NetworkManagementBasicCCLearnModeSetStatus {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let seq_no = be_u8(i)?;
        let status = MaybeKnown::<LearnModeStatusKind>::parse(i)?;
        let _reserved = be_u8(i)?;
        let new_node_id = NodeId::parse_optional(i)?;

        Ok(Self {
            seq_no,
            status,
            new_node_id,
        })
    }
}

impl CCSerializable for NetworkManagementBasicCCLearnModeSetStatus {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        be_u8(self.seq_no).serialize(output);
        self.status.serialize(output);
        be_u8(0).serialize(output);
        be_u8(self.new_node_id.map(u8::from).unwrap_or(0)).serialize(output);
    }
}

/// Resets the gateway to factory defaults, leaving the network
#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct NetworkManagementBasicCCDefaultSet {
    pub seq_no: u8,
}

impl CCBase for NetworkManagementBasicCCDefaultSet {
    fn expects_report(&self) -> bool {
        true
    }

    fn test_report(&self, report: &CC) -> bool {
        matches!(
            report,
            CC::NetworkManagementBasicCCDefaultSetComplete(status)
                if status.seq_no == self.seq_no
        )
    }

    fn pre_states(&self) -> &'static [NetworkMode] {
        &[NetworkMode::Idle]
    }

    fn exec_state(&self) -> Option<NetworkMode> {
        Some(NetworkMode::DefaultSetting)
    }
}

impl CCId for NetworkManagementBasicCCDefaultSet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::NetworkManagementBasic
    }

    fn cc_command(&self) -> Option<u8> {
        Some(NetworkManagementBasicCCCommand::DefaultSet as _)
    }
}

impl CCParsable for NetworkManagementBasicCCDefaultSet {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let seq_no = be_u8(i)?;
        Ok(Self { seq_no })
    }
}

impl CCSerializable for NetworkManagementBasicCCDefaultSet {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        be_u8(self.seq_no).serialize(output);
    }
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct NetworkManagementBasicCCDefaultSetComplete {
    pub seq_no: u8,
    #[builder(setter(into))]
    pub status: MaybeKnown<DefaultSetStatusKind>,
}

impl CCBase for NetworkManagementBasicCCDefaultSetComplete {}

impl CCId for NetworkManagementBasicCCDefaultSetComplete {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::NetworkManagementBasic
    }

    fn cc_command(&self) -> Option<u8> {
        Some(NetworkManagementBasicCCCommand::DefaultSetComplete as _)
    }
}

impl CCParsable for NetworkManagementBasicCCDefaultSetComplete {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let seq_no = be_u8(i)?;
        let status = MaybeKnown::<DefaultSetStatusKind>::parse(i)?;
        Ok(Self { seq_no, status })
    }
}

impl CCSerializable for NetworkManagementBasicCCDefaultSetComplete {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        be_u8(self.seq_no).serialize(output);
        self.status.serialize(output);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use zip_core::hex_bytes;

    #[test]
    fn test_learn_mode_status() {
        let ctx = CCParsingContext::default();
        let mut input = hex_bytes!("0106000a");
        let status =
            NetworkManagementBasicCCLearnModeSetStatus::parse(&mut input, &ctx).unwrap();
        assert_eq!(status.status, MaybeKnown::Known(LearnModeStatusKind::Done));
        assert_eq!(status.new_node_id.map(u8::from), Some(10));
    }

    #[test]
    fn test_default_set_complete() {
        let ctx = CCParsingContext::default();
        let mut input = hex_bytes!("0206");
        let status =
            NetworkManagementBasicCCDefaultSetComplete::parse(&mut input, &ctx).unwrap();
        assert_eq!(status.seq_no, 2);
        assert_eq!(status.status, MaybeKnown::Known(DefaultSetStatusKind::Done));
    }
}
