use crate::consts::ZIP_PACKET_COMMAND;
use bytes::{Bytes, BytesMut};
use zip_cc::prelude::*;
use zip_core::parse::{
    bytes::{be_u8, complete::skip, rest},
    validate, Parsable, ParseResult, Parser,
};
use zip_core::prelude::*;
use zip_core::serialize::{self, Serializable};

/// The ack/nack flags bit-packed into the third header byte of a Z/IP packet
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PacketFlags {
    pub ack_request: bool,
    pub ack_response: bool,
    pub nack_response: bool,
    pub nack_waiting: bool,
    pub nack_queue_full: bool,
    pub nack_option_error: bool,
}

impl PacketFlags {
    pub fn from_byte(b: u8) -> Self {
        Self {
            ack_request: b & 0x80 != 0,
            ack_response: b & 0x40 != 0,
            nack_response: b & 0x20 != 0,
            nack_waiting: b & 0x10 != 0,
            nack_queue_full: b & 0x08 != 0,
            nack_option_error: b & 0x04 != 0,
        }
    }

    pub fn to_byte(self) -> u8 {
        let mut b = 0u8;
        if self.ack_request {
            b |= 0x80;
        }
        if self.ack_response {
            b |= 0x40;
        }
        if self.nack_response {
            b |= 0x20;
        }
        if self.nack_waiting {
            b |= 0x10;
        }
        if self.nack_queue_full {
            b |= 0x08;
        }
        if self.nack_option_error {
            b |= 0x04;
        }
        b
    }

    pub fn ack_request() -> Self {
        Self {
            ack_request: true,
            ..Self::default()
        }
    }

    pub fn ack_response() -> Self {
        Self {
            ack_response: true,
            ..Self::default()
        }
    }
}

// Bits of the fourth header byte
const HEADER_EXTENSION_INCLUDED: u8 = 0x80;
const COMMAND_INCLUDED: u8 = 0x40;
const SECURE_ORIGIN: u8 = 0x10;

/// A Z/IP packet with its body still raw: the envelope fields plus the
/// encapsulated command class frame bytes
#[derive(Clone, PartialEq)]
pub struct PacketRaw {
    pub seq_number: u8,
    pub flags: PacketFlags,
    pub source_endpoint: u8,
    pub dest_endpoint: u8,
    pub body: Bytes,
}

impl std::fmt::Debug for PacketRaw {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PacketRaw")
            .field("seq_number", &self.seq_number)
            .field("flags", &self.flags)
            .field("body", &format!("0x{}", hex::encode(&self.body)))
            .finish()
    }
}

impl Parsable for PacketRaw {
    fn parse(i: &mut Bytes) -> ParseResult<Self> {
        let cc = be_u8(i)?;
        validate(cc == CommandClasses::ZIP as u8, "not a Z/IP packet")?;
        let cmd = be_u8(i)?;
        validate(cmd == ZIP_PACKET_COMMAND, "not a Z/IP packet")?;

        let flags = PacketFlags::from_byte(be_u8(i)?);
        let flags2 = be_u8(i)?;
        let seq_number = be_u8(i)?;
        let source_endpoint = be_u8(i)? & 0x7f;
        let dest_endpoint = be_u8(i)? & 0x7f;

        // Header extensions carry their total length (including the length
        // byte) first. Nothing in them is needed here, so they are skipped.
        if flags2 & HEADER_EXTENSION_INCLUDED != 0 {
            let ext_len = be_u8(i)?;
            skip((ext_len as usize).saturating_sub(1)).parse(i)?;
        }

        let body = rest(i)?;

        Ok(Self {
            seq_number,
            flags,
            source_endpoint,
            dest_endpoint,
            body,
        })
    }
}

impl Serializable for PacketRaw {
    fn serialize(&self, output: &mut BytesMut) {
        use serialize::bytes::{be_u8, slice};
        be_u8(CommandClasses::ZIP as u8).serialize(output);
        be_u8(ZIP_PACKET_COMMAND).serialize(output);
        be_u8(self.flags.to_byte()).serialize(output);
        let mut flags2 = SECURE_ORIGIN;
        if !self.body.is_empty() {
            flags2 |= COMMAND_INCLUDED;
        }
        be_u8(flags2).serialize(output);
        be_u8(self.seq_number).serialize(output);
        be_u8(self.source_endpoint & 0x7f).serialize(output);
        be_u8(self.dest_endpoint & 0x7f).serialize(output);
        slice(&self.body).serialize(output);
    }
}

/// A fully decoded Z/IP packet
#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    pub seq_number: u8,
    pub flags: PacketFlags,
    pub source_endpoint: u8,
    pub dest_endpoint: u8,
    /// The encapsulated command, if the packet carried one
    pub command: Option<CcOrRaw>,
}

impl Packet {
    /// Interprets a raw packet's body. Fails only on malformed bodies of known
    /// commands; unknown commands stay raw.
    pub fn from_raw(raw: PacketRaw, ctx: &CCParsingContext) -> ParseResult<Self> {
        let command = if raw.body.is_empty() {
            None
        } else {
            let mut body = raw.body.clone();
            let cc_raw = CCRaw::parse(&mut body)?;
            Some(CcOrRaw::from_raw(cc_raw, ctx)?)
        };

        Ok(Self {
            seq_number: raw.seq_number,
            flags: raw.flags,
            source_endpoint: raw.source_endpoint,
            dest_endpoint: raw.dest_endpoint,
            command,
        })
    }

    /// An outbound packet carrying a command, asking the gateway to ack it
    pub fn request(seq_number: u8, command: impl Into<CcOrRaw>) -> Self {
        Self {
            seq_number,
            flags: PacketFlags::ack_request(),
            source_endpoint: 0,
            dest_endpoint: 0,
            command: Some(command.into()),
        }
    }

    /// A bare acknowledgement for an inbound packet
    pub fn ack(seq_number: u8) -> Self {
        Self {
            seq_number,
            flags: PacketFlags::ack_response(),
            source_endpoint: 0,
            dest_endpoint: 0,
            command: None,
        }
    }

    pub fn as_raw(&self) -> PacketRaw {
        let body = match &self.command {
            Some(command) => command.as_raw().as_bytes(),
            None => Bytes::new(),
        };
        PacketRaw {
            seq_number: self.seq_number,
            flags: self.flags,
            source_endpoint: self.source_endpoint,
            dest_endpoint: self.dest_endpoint,
            body,
        }
    }

    pub fn is_ack_response(&self) -> bool {
        self.flags.ack_response
    }

    pub fn is_nack_response(&self) -> bool {
        self.flags.nack_response
    }

    /// Whether the gateway signals that the command was queued for a sleeping
    /// node and will be delivered on wake-up
    pub fn sleeping_delay(&self) -> bool {
        self.flags.nack_response && self.flags.nack_waiting
    }

    pub fn is_queue_full(&self) -> bool {
        self.flags.nack_response && self.flags.nack_queue_full
    }

    pub fn is_option_error(&self) -> bool {
        self.flags.nack_response && self.flags.nack_option_error
    }
}

impl Serializable for Packet {
    fn serialize(&self, output: &mut BytesMut) {
        self.as_raw().serialize(output);
    }
}

impl ToLogPayload for Packet {
    fn to_log_payload(&self) -> LogPayload {
        let mut flags = Vec::new();
        if self.flags.ack_request {
            flags.push("ack req");
        }
        if self.flags.ack_response {
            flags.push("ack res");
        }
        if self.flags.nack_response {
            flags.push("nack res");
        }
        if self.flags.nack_waiting {
            flags.push("waiting");
        }
        if self.flags.nack_queue_full {
            flags.push("queue full");
        }
        if self.flags.nack_option_error {
            flags.push("option error");
        }

        let dict = LogPayloadDict::new()
            .with_entry("seq no", self.seq_number)
            .with_entry("flags", flags.join(", "));
        match &self.command {
            Some(CcOrRaw::CC(cc)) => dict.with_nested(cc.to_log_payload()).into(),
            Some(CcOrRaw::Raw(raw)) => dict
                .with_entry("raw command", format!("{:?}", raw))
                .into(),
            None => dict.into(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use zip_core::hex_bytes;

    #[test]
    fn test_header_roundtrip() {
        let packet = Packet::request(
            0x42,
            CC::BinarySwitchCCGet(BinarySwitchCCGet::default()),
        );
        let bytes = packet.as_raw().as_bytes();
        assert_eq!(bytes, hex_bytes!("230280504200002502"));

        let mut input = bytes;
        let raw = PacketRaw::parse(&mut input).unwrap();
        assert_eq!(raw.seq_number, 0x42);
        assert!(raw.flags.ack_request);
        assert_eq!(raw.body, hex_bytes!("2502"));
    }

    #[test]
    fn test_parse_ack_response() {
        let mut input = hex_bytes!("23024010170000");
        let raw = PacketRaw::parse(&mut input).unwrap();
        let packet = Packet::from_raw(raw, &CCParsingContext::default()).unwrap();
        assert_eq!(packet.seq_number, 0x17);
        assert!(packet.is_ack_response());
        assert!(!packet.is_nack_response());
        assert_eq!(packet.command, None);
    }

    #[test]
    fn test_parse_nack_waiting() {
        let mut input = hex_bytes!("23023010170000");
        let raw = PacketRaw::parse(&mut input).unwrap();
        let packet = Packet::from_raw(raw, &CCParsingContext::default()).unwrap();
        assert!(packet.is_nack_response());
        assert!(packet.sleeping_delay());
    }

    #[test]
    fn test_skips_header_extensions() {
        // flags2 has the extension bit set; 5 extension bytes (incl. length)
        let mut input = hex_bytes!("230280d001000005840201002502");
        let raw = PacketRaw::parse(&mut input).unwrap();
        assert_eq!(raw.body, hex_bytes!("2502"));
    }

    #[test]
    fn test_garbage_is_not_a_packet() {
        let mut input = hex_bytes!("ff00aabb");
        assert!(PacketRaw::parse(&mut input).is_err());
    }
}
