use crate::commandclass::{CCBase, CCId, CCParsable, CCParsingContext, CCSerializable, CC};
use bytes::{Bytes, BytesMut};
use derive_try_from_primitive::TryFromPrimitive;
use typed_builder::TypedBuilder;
use zip_core::parse::{bytes::be_u24, Parsable, ParseResult};
use zip_core::prelude::*;
use zip_core::serialize::{self, Serializable};

#[derive(Debug, Clone, Copy, PartialEq, TryFromPrimitive)]
#[repr(u8)]
pub enum WakeUpCCCommand {
    IntervalSet = 0x04,
    IntervalGet = 0x05,
    IntervalReport = 0x06,
    Notification = 0x07,
    NoMoreInformation = 0x08,
    IntervalCapabilitiesGet = 0x09,
    IntervalCapabilitiesReport = 0x0a,
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct WakeUpCCIntervalSet {
    /// Wake-up interval in seconds, encoded as 24 bits
    pub interval_seconds: u32,
    /// The node the device should notify when it wakes up
    pub node_id: NodeId,
}

impl CCBase for WakeUpCCIntervalSet {}

impl CCId for WakeUpCCIntervalSet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::WakeUp
    }

    fn cc_command(&self) -> Option<u8> {
        Some(WakeUpCCCommand::IntervalSet as _)
    }
}

impl CCParsable for WakeUpCCIntervalSet {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let interval_seconds = be_u24(i)?;
        let node_id = NodeId::parse(i)?;
        Ok(Self {
            interval_seconds,
            node_id,
        })
    }
}

impl CCSerializable for WakeUpCCIntervalSet {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u24;
        be_u24(self.interval_seconds).serialize(output);
        self.node_id.serialize(output);
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct WakeUpCCIntervalGet {}

impl CCBase for WakeUpCCIntervalGet {
    fn expects_report(&self) -> bool {
        true
    }

    fn test_report(&self, report: &CC) -> bool {
        matches!(report, CC::WakeUpCCIntervalReport(_))
    }
}

impl CCId for WakeUpCCIntervalGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::WakeUp
    }

    fn cc_command(&self) -> Option<u8> {
        Some(WakeUpCCCommand::IntervalGet as _)
    }
}

impl CCParsable for WakeUpCCIntervalGet {
    fn parse(_i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        // No payload
        Ok(Self {})
    }
}

impl CCSerializable for WakeUpCCIntervalGet {
    fn serialize_payload(&self, _output: &mut BytesMut) {}
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct WakeUpCCIntervalReport {
    pub interval_seconds: u32,
    pub node_id: NodeId,
}

impl CCBase for WakeUpCCIntervalReport {}

impl CCId for WakeUpCCIntervalReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::WakeUp
    }

    fn cc_command(&self) -> Option<u8> {
        Some(WakeUpCCCommand::IntervalReport as _)
    }
}

impl CCParsable for WakeUpCCIntervalReport {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let interval_seconds = be_u24(i)?;
        let node_id = NodeId::parse(i)?;
        Ok(Self {
            interval_seconds,
            node_id,
        })
    }
}

impl CCSerializable for WakeUpCCIntervalReport {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u24;
        be_u24(self.interval_seconds).serialize(output);
        self.node_id.serialize(output);
    }
}

/// Sent by a sleeping node when it wakes up and is ready to receive queued
/// commands
#[derive(Default, Debug, Clone, PartialEq)]
pub struct WakeUpCCNotification {}

impl CCBase for WakeUpCCNotification {}

impl CCId for WakeUpCCNotification {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::WakeUp
    }

    fn cc_command(&self) -> Option<u8> {
        Some(WakeUpCCCommand::Notification as _)
    }
}

impl CCParsable for WakeUpCCNotification {
    fn parse(_i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        // No payload
        Ok(Self {})
    }
}

impl CCSerializable for WakeUpCCNotification {
    fn serialize_payload(&self, _output: &mut BytesMut) {}
}

/// Tells a woken node it can go back to sleep
#[derive(Default, Debug, Clone, PartialEq)]
pub struct WakeUpCCNoMoreInformation {}

impl CCBase for WakeUpCCNoMoreInformation {}

impl CCId for WakeUpCCNoMoreInformation {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::WakeUp
    }

    fn cc_command(&self) -> Option<u8> {
        Some(WakeUpCCCommand::NoMoreInformation as _)
    }
}

impl CCParsable for WakeUpCCNoMoreInformation {
    fn parse(_i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        // No payload
        Ok(Self {})
    }
}

impl CCSerializable for WakeUpCCNoMoreInformation {
    fn serialize_payload(&self, _output: &mut BytesMut) {}
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct WakeUpCCIntervalCapabilitiesGet {}

impl CCBase for WakeUpCCIntervalCapabilitiesGet {
    fn expects_report(&self) -> bool {
        true
    }

    fn test_report(&self, report: &CC) -> bool {
        matches!(report, CC::WakeUpCCIntervalCapabilitiesReport(_))
    }
}

impl CCId for WakeUpCCIntervalCapabilitiesGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::WakeUp
    }

    fn cc_command(&self) -> Option<u8> {
        Some(WakeUpCCCommand::IntervalCapabilitiesGet as _)
    }
}

impl CCParsable for WakeUpCCIntervalCapabilitiesGet {
    fn parse(_i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        // No payload
        Ok(Self {})
    }
}

impl CCSerializable for WakeUpCCIntervalCapabilitiesGet {
    fn serialize_payload(&self, _output: &mut BytesMut) {}
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct WakeUpCCIntervalCapabilitiesReport {
    pub min_interval_seconds: u32,
    pub max_interval_seconds: u32,
    pub default_interval_seconds: u32,
    pub interval_step_seconds: u32,
}

impl CCBase for WakeUpCCIntervalCapabilitiesReport {}

impl CCId for WakeUpCCIntervalCapabilitiesReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::WakeUp
    }

    fn cc_command(&self) -> Option<u8> {
        Some(WakeUpCCCommand::IntervalCapabilitiesReport as _)
    }
}

impl CCParsable for WakeUpCCIntervalCapabilitiesReport {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let min_interval_seconds = be_u24(i)?;
        let max_interval_seconds = be_u24(i)?;
        let default_interval_seconds = be_u24(i)?;
        let interval_step_seconds = be_u24(i)?;

        Ok(Self {
            min_interval_seconds,
            max_interval_seconds,
            default_interval_seconds,
            interval_step_seconds,
        })
    }
}

impl CCSerializable for WakeUpCCIntervalCapabilitiesReport {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u24;
        be_u24(self.min_interval_seconds).serialize(output);
        be_u24(self.max_interval_seconds).serialize(output);
        be_u24(self.default_interval_seconds).serialize(output);
        be_u24(self.interval_step_seconds).serialize(output);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use zip_core::hex_bytes;

    #[test]
    fn test_interval_report_24_bit() {
        let ctx = CCParsingContext::default();
        // 86400 seconds, notify node 1
        let mut input = hex_bytes!("01518001");
        let report = WakeUpCCIntervalReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(report.interval_seconds, 86400);
        assert_eq!(u8::from(report.node_id), 1);
    }

    #[test]
    fn test_capabilities_report() {
        let ctx = CCParsingContext::default();
        let mut input = hex_bytes!("000258015180000e10000258");
        let report = WakeUpCCIntervalCapabilitiesReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(report.min_interval_seconds, 600);
        assert_eq!(report.max_interval_seconds, 86400);
        assert_eq!(report.default_interval_seconds, 3600);
        assert_eq!(report.interval_step_seconds, 600);
    }
}
