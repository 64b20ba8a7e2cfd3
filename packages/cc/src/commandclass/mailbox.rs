use crate::commandclass::{CCBase, CCId, CCParsable, CCParsingContext, CCSerializable, CC};
use bytes::{Bytes, BytesMut};
use derive_try_from_primitive::TryFromPrimitive;
use typed_builder::TypedBuilder;
use zip_core::parse::{
    bytes::{be_u16, be_u8, complete::take},
    ParseResult, Parser,
};
use zip_core::prelude::*;
use zip_core::serialize::{self, Serializable};
use std::net::Ipv6Addr;

#[derive(Debug, Clone, Copy, PartialEq, TryFromPrimitive)]
#[repr(u8)]
pub enum MailboxCCCommand {
    ConfigurationGet = 0x01,
    ConfigurationSet = 0x02,
    ConfigurationReport = 0x03,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum MailboxMode {
    Disabled = 0x00,
    Service = 0x01,
    Proxy = 0x02,
}

zip_core::impl_maybe_known_codec!(MailboxMode);

#[derive(Default, Debug, Clone, PartialEq)]
pub struct MailboxCCConfigurationGet {}

impl CCBase for MailboxCCConfigurationGet {
    fn expects_report(&self) -> bool {
        true
    }

    fn test_report(&self, report: &CC) -> bool {
        matches!(report, CC::MailboxCCConfigurationReport(_))
    }
}

impl CCId for MailboxCCConfigurationGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Mailbox
    }

    fn cc_command(&self) -> Option<u8> {
        Some(MailboxCCCommand::ConfigurationGet as _)
    }
}

impl CCParsable for MailboxCCConfigurationGet {
    fn parse(_i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        // No payload
        Ok(Self {})
    }
}

impl CCSerializable for MailboxCCConfigurationGet {
    fn serialize_payload(&self, _output: &mut BytesMut) {}
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct MailboxCCConfigurationReport {
    #[builder(setter(into))]
    pub mode: MaybeKnown<MailboxMode>,
    pub supported_modes: u8,
    pub queue_capacity: u16,
    /// Where the gateway forwards mailbox traffic when running in proxy mode
    pub forwarding_destination: Ipv6Addr,
    pub udp_port: u16,
}

impl CCBase for MailboxCCConfigurationReport {}

impl CCId for MailboxCCConfigurationReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Mailbox
    }

    fn cc_command(&self) -> Option<u8> {
        Some(MailboxCCCommand::ConfigurationReport as _)
    }
}

impl CCParsable for MailboxCCConfigurationReport {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let b = be_u8(i)?;
        let mode = MaybeKnown::from(b & 0b111);
        let supported_modes = (b >> 3) & 0b11;
        let queue_capacity = be_u16(i)?;
        let addr_bytes = take(16usize).parse(i)?;
        let mut octets = [0u8; 16];
        octets.copy_from_slice(&addr_bytes);
        let forwarding_destination = Ipv6Addr::from(octets);
        let udp_port = be_u16(i)?;

        Ok(Self {
            mode,
            supported_modes,
            queue_capacity,
            forwarding_destination,
            udp_port,
        })
    }
}

impl CCSerializable for MailboxCCConfigurationReport {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::{be_u16, be_u8, slice};
        let b = ((self.supported_modes & 0b11) << 3) | (u8::from(self.mode) & 0b111);
        be_u8(b).serialize(output);
        be_u16(self.queue_capacity).serialize(output);
        slice(self.forwarding_destination.octets()).serialize(output);
        be_u16(self.udp_port).serialize(output);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use zip_core::hex_bytes;

    #[test]
    fn test_configuration_report() {
        let ctx = CCParsingContext::default();
        let mut input =
            hex_bytes!("0a012cfd00000000000000000000000000000201bb");
        let report = MailboxCCConfigurationReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(report.mode, MaybeKnown::Known(MailboxMode::Proxy));
        assert_eq!(report.queue_capacity, 300);
        assert_eq!(
            report.forwarding_destination,
            "fd00::2".parse::<Ipv6Addr>().unwrap()
        );
        assert_eq!(report.udp_port, 443);
    }
}
