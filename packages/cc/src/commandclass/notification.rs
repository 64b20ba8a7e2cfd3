use crate::commandclass::{CCBase, CCId, CCParsable, CCParsingContext, CCSerializable, CC};
use bytes::{Bytes, BytesMut};
use derive_try_from_primitive::TryFromPrimitive;
use typed_builder::TypedBuilder;
use zip_core::parse::{
    bytes::{be_u8, rest},
    combinators::peek,
    Parsable, ParseResult, Parser,
};
use zip_core::prelude::*;
use zip_core::serialize::{self, Serializable};

#[derive(Debug, Clone, Copy, PartialEq, TryFromPrimitive)]
#[repr(u8)]
pub enum NotificationCCCommand {
    Get = 0x04,
    Report = 0x05,
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct NotificationCCGet {
    #[builder(setter(into))]
    pub notification_type: MaybeKnown<NotificationType>,
    #[builder(default)]
    pub event: u8,
}

impl CCBase for NotificationCCGet {
    fn expects_report(&self) -> bool {
        true
    }

    fn test_report(&self, report: &CC) -> bool {
        matches!(report, CC::NotificationCCReport(_))
    }
}

impl CCId for NotificationCCGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Notification
    }

    fn cc_command(&self) -> Option<u8> {
        Some(NotificationCCCommand::Get as _)
    }
}

impl CCParsable for NotificationCCGet {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        // V1 alarm type, unused here
        let _alarm_type = be_u8(i)?;
        let notification_type = MaybeKnown::<NotificationType>::parse(i)?;
        let event = be_u8(i).unwrap_or(0);
        Ok(Self {
            notification_type,
            event,
        })
    }
}

impl CCSerializable for NotificationCCGet {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        be_u8(0).serialize(output);
        self.notification_type.serialize(output);
        be_u8(self.event).serialize(output);
    }
}

/// The two forms a notification report can take. Modern (version 3+) devices
/// send typed notifications with the first three bytes zeroed; version 1 devices
/// send a bare alarm type/level pair.
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationReport {
    Typed {
        status: u8,
        notification_type: MaybeKnown<NotificationType>,
        event: NotificationEvent,
        /// The raw event byte, kept for callers that resolve vendor states
        event_raw: u8,
    },
    Legacy {
        alarm_type: u8,
        alarm_level: u8,
    },
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct NotificationCCReport {
    pub report: NotificationReport,
}

impl CCBase for NotificationCCReport {}

impl CCId for NotificationCCReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Notification
    }

    fn cc_command(&self) -> Option<u8> {
        Some(NotificationCCCommand::Report as _)
    }
}

impl CCParsable for NotificationCCReport {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        // The modern form zeroes the V1 alarm type/level and the zensor byte
        let is_typed = i.len() >= 6 && peek(zip_core::parse::bytes::complete::take(3usize))
            .parse(i)?
            .iter()
            .all(|b| *b == 0);

        let report = if is_typed {
            zip_core::parse::bytes::complete::skip(3usize).parse(i)?;
            let status = be_u8(i)?;
            let notification_type = MaybeKnown::<NotificationType>::parse(i)?;
            let event_raw = be_u8(i)?;
            let event = match notification_type.known() {
                Some(t) => NotificationEvent::lookup(*t, event_raw),
                None => NotificationEvent::Unknown(event_raw),
            };
            // Remaining event parameters are not interpreted
            let _ = rest(i)?;

            NotificationReport::Typed {
                status,
                notification_type,
                event,
                event_raw,
            }
        } else {
            let alarm_type = be_u8(i)?;
            let alarm_level = be_u8(i)?;
            NotificationReport::Legacy {
                alarm_type,
                alarm_level,
            }
        };

        Ok(Self { report })
    }
}

impl CCSerializable for NotificationCCReport {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        match &self.report {
            NotificationReport::Typed {
                status,
                notification_type,
                event_raw,
                ..
            } => {
                be_u8(0).serialize(output);
                be_u8(0).serialize(output);
                be_u8(0).serialize(output);
                be_u8(*status).serialize(output);
                notification_type.serialize(output);
                be_u8(*event_raw).serialize(output);
            }
            NotificationReport::Legacy {
                alarm_type,
                alarm_level,
            } => {
                be_u8(*alarm_type).serialize(output);
                be_u8(*alarm_level).serialize(output);
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use zip_core::hex_bytes;

    #[test]
    fn test_typed_report() {
        let ctx = CCParsingContext::default();
        // zeroed V1 fields, status 0xff, home security, motion detected
        let mut input = hex_bytes!("000000ff0707");
        let report = NotificationCCReport::parse(&mut input, &ctx).unwrap();
        match report.report {
            NotificationReport::Typed {
                notification_type,
                event,
                ..
            } => {
                assert_eq!(
                    notification_type,
                    MaybeKnown::Known(NotificationType::HomeSecurity)
                );
                assert_eq!(event, NotificationEvent::MotionDetected);
            }
            _ => panic!("expected the typed form"),
        }
    }

    #[test]
    fn test_legacy_report() {
        let ctx = CCParsingContext::default();
        let mut input = hex_bytes!("1504");
        let report = NotificationCCReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(
            report.report,
            NotificationReport::Legacy {
                alarm_type: 0x15,
                alarm_level: 0x04,
            }
        );
    }
}
