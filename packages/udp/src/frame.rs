use crate::consts::{ZIP_KEEP_ALIVE_COMMAND, ZIP_PACKET_COMMAND};
use crate::packet::PacketRaw;
use bytes::{Bytes, BytesMut};
use zip_core::parse::{bytes::be_u8, combinators::peek, Parsable, ParseError, ParseResult, Parser};
use zip_core::prelude::*;
use zip_core::serialize::{self, Serializable};

/// Keep-alive flag bits
const KEEP_ALIVE_PING: u8 = 0x80;
const KEEP_ALIVE_PONG: u8 = 0x40;

/// One inbound or outbound UDP datagram, decoded at the envelope level.
/// Datagrams that are not valid Z/IP frames are kept as garbage so the
/// receiver can log and discard them.
#[derive(Debug, Clone, PartialEq)]
pub enum ZipFrame {
    Packet(PacketRaw),
    KeepAlive(KeepAlive),
    Garbage(Bytes),
}

impl ZipFrame {
    /// Decodes a datagram. This never fails; undecodable input becomes
    /// [ZipFrame::Garbage].
    pub fn parse_datagram(mut datagram: Bytes) -> Self {
        let original = datagram.clone();
        match Self::parse(&mut datagram) {
            Ok(frame) => frame,
            Err(_) => ZipFrame::Garbage(original),
        }
    }
}

impl Parsable for ZipFrame {
    fn parse(i: &mut Bytes) -> ParseResult<Self> {
        let (_cc, cmd) = peek((be_u8, be_u8)).parse(i)?;
        match cmd {
            ZIP_KEEP_ALIVE_COMMAND => Ok(ZipFrame::KeepAlive(KeepAlive::parse(i)?)),
            ZIP_PACKET_COMMAND => Ok(ZipFrame::Packet(PacketRaw::parse(i)?)),
            _ => Err(ParseError::recoverable("not a Z/IP envelope")),
        }
    }
}

impl Serializable for ZipFrame {
    fn serialize(&self, output: &mut BytesMut) {
        use serialize::bytes::slice;
        match self {
            ZipFrame::Packet(packet) => packet.serialize(output),
            ZipFrame::KeepAlive(keep_alive) => keep_alive.serialize(output),
            ZipFrame::Garbage(data) => slice(data).serialize(output),
        }
    }
}

/// The gateway's liveness probe: `[0x23, 0x03, flags]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeepAlive {
    pub ping: bool,
    pub pong: bool,
}

impl KeepAlive {
    pub fn ping() -> Self {
        Self {
            ping: true,
            pong: false,
        }
    }

    pub fn pong() -> Self {
        Self {
            ping: false,
            pong: true,
        }
    }
}

impl Parsable for KeepAlive {
    fn parse(i: &mut Bytes) -> ParseResult<Self> {
        let cc = be_u8(i)?;
        zip_core::parse::validate(cc == CommandClasses::ZIP as u8, "not a Z/IP frame")?;
        let cmd = be_u8(i)?;
        zip_core::parse::validate(cmd == ZIP_KEEP_ALIVE_COMMAND, "not a keep-alive")?;
        let flags = be_u8(i)?;

        Ok(Self {
            ping: flags & KEEP_ALIVE_PING != 0,
            pong: flags & KEEP_ALIVE_PONG != 0,
        })
    }
}

impl Serializable for KeepAlive {
    fn serialize(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        be_u8(CommandClasses::ZIP as u8).serialize(output);
        be_u8(ZIP_KEEP_ALIVE_COMMAND).serialize(output);
        let mut flags = 0u8;
        if self.ping {
            flags |= KEEP_ALIVE_PING;
        }
        if self.pong {
            flags |= KEEP_ALIVE_PONG;
        }
        be_u8(flags).serialize(output);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use zip_core::hex_bytes;

    #[test]
    fn test_keep_alive() {
        let mut input = hex_bytes!("230380");
        let frame = ZipFrame::parse(&mut input).unwrap();
        assert_eq!(frame, ZipFrame::KeepAlive(KeepAlive::ping()));

        let pong = ZipFrame::KeepAlive(KeepAlive::pong());
        assert_eq!(pong.as_bytes(), hex_bytes!("230340"));
    }

    #[test]
    fn test_garbage_datagram() {
        let datagram = hex_bytes!("deadbeef");
        let frame = ZipFrame::parse_datagram(datagram.clone());
        assert_eq!(frame, ZipFrame::Garbage(datagram));
    }
}
