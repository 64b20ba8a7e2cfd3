use crate::commandclass::{CCBase, CCId, CCParsable, CCParsingContext, CCSerializable, CC};
use bytes::{Bytes, BytesMut};
use derive_try_from_primitive::TryFromPrimitive;
use typed_builder::TypedBuilder;
use ux::u4;
use zip_core::parse::{bits, bytes::be_u8, BitParsable, Parsable, ParseResult, Parser};
use zip_core::prelude::*;
use zip_core::serialize::{self, BitSerializable, Serializable};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, PartialEq, TryFromPrimitive)]
#[repr(u8)]
pub enum DoorLockCCCommand {
    OperationSet = 0x01,
    OperationGet = 0x02,
    OperationReport = 0x03,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum DoorLockMode {
    Unsecured = 0x00,
    UnsecuredWithTimeout = 0x01,
    InsideUnsecured = 0x10,
    InsideUnsecuredWithTimeout = 0x11,
    OutsideUnsecured = 0x20,
    OutsideUnsecuredWithTimeout = 0x21,
    Unknown = 0xfe,
    Secured = 0xff,
}

impl Display for DoorLockMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Unsecured => "Unsecured",
            Self::UnsecuredWithTimeout => "Unsecured with timeout",
            Self::InsideUnsecured => "Inside handle unsecured",
            Self::InsideUnsecuredWithTimeout => "Inside handle unsecured with timeout",
            Self::OutsideUnsecured => "Outside handle unsecured",
            Self::OutsideUnsecuredWithTimeout => "Outside handle unsecured with timeout",
            Self::Unknown => "Unknown",
            Self::Secured => "Secured",
        };
        f.write_str(name)
    }
}

zip_core::impl_maybe_known_codec!(DoorLockMode);

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct DoorLockCCOperationSet {
    #[builder(setter(into))]
    pub mode: MaybeKnown<DoorLockMode>,
}

impl CCBase for DoorLockCCOperationSet {}

impl CCId for DoorLockCCOperationSet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::DoorLock
    }

    fn cc_command(&self) -> Option<u8> {
        Some(DoorLockCCCommand::OperationSet as _)
    }
}

impl CCParsable for DoorLockCCOperationSet {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let mode = MaybeKnown::<DoorLockMode>::parse(i)?;
        Ok(Self { mode })
    }
}

impl CCSerializable for DoorLockCCOperationSet {
    fn serialize_payload(&self, output: &mut BytesMut) {
        self.mode.serialize(output);
    }
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct DoorLockCCOperationGet {}

impl CCBase for DoorLockCCOperationGet {
    fn expects_report(&self) -> bool {
        true
    }

    fn test_report(&self, report: &CC) -> bool {
        matches!(report, CC::DoorLockCCOperationReport(_))
    }
}

impl CCId for DoorLockCCOperationGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::DoorLock
    }

    fn cc_command(&self) -> Option<u8> {
        Some(DoorLockCCCommand::OperationGet as _)
    }
}

impl CCParsable for DoorLockCCOperationGet {
    fn parse(_i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        // No payload
        Ok(Self {})
    }
}

impl CCSerializable for DoorLockCCOperationGet {
    fn serialize_payload(&self, _output: &mut BytesMut) {}
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct DoorLockCCOperationReport {
    #[builder(setter(into))]
    pub mode: MaybeKnown<DoorLockMode>,
    /// Which outside handles can open the door
    pub outside_handles: u8,
    /// Which inside handles can open the door
    pub inside_handles: u8,
    pub door_condition: u8,
    pub lock_timeout_minutes: u8,
    pub lock_timeout_seconds: u8,
}

impl CCBase for DoorLockCCOperationReport {}

impl CCId for DoorLockCCOperationReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::DoorLock
    }

    fn cc_command(&self) -> Option<u8> {
        Some(DoorLockCCCommand::OperationReport as _)
    }
}

impl CCParsable for DoorLockCCOperationReport {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let mode = MaybeKnown::<DoorLockMode>::parse(i)?;
        let (outside_handles, inside_handles) =
            bits::bits((u4::parse, u4::parse)).parse(i)?;
        let door_condition = be_u8(i)?;
        let lock_timeout_minutes = be_u8(i)?;
        let lock_timeout_seconds = be_u8(i)?;

        Ok(Self {
            mode,
            outside_handles: u8::from(outside_handles),
            inside_handles: u8::from(inside_handles),
            door_condition,
            lock_timeout_minutes,
            lock_timeout_seconds,
        })
    }
}

impl CCSerializable for DoorLockCCOperationReport {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bits::bits;
        use serialize::bytes::be_u8;
        self.mode.serialize(output);
        bits(|bo| {
            u4::new(self.outside_handles & 0b1111).write(bo);
            u4::new(self.inside_handles & 0b1111).write(bo);
        })
        .serialize(output);
        be_u8(self.door_condition).serialize(output);
        be_u8(self.lock_timeout_minutes).serialize(output);
        be_u8(self.lock_timeout_seconds).serialize(output);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use zip_core::hex_bytes;

    #[test]
    fn test_operation_report() {
        let ctx = CCParsingContext::default();
        let mut input = hex_bytes!("ff12011e00");
        let report = DoorLockCCOperationReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(report.mode, MaybeKnown::Known(DoorLockMode::Secured));
        assert_eq!(report.outside_handles, 0b0001);
        assert_eq!(report.inside_handles, 0b0010);
        assert_eq!(report.door_condition, 0x01);
        assert_eq!(report.lock_timeout_minutes, 30);
    }
}
