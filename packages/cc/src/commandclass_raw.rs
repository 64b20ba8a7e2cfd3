use bytes::{Bytes, BytesMut};
use zip_core::parse::{
    bytes::{be_u8, rest},
    combinators::map,
    Parsable, ParseResult, Parser,
};
use zip_core::prelude::*;
use zip_core::serialize::{self, Serializable};

/// An un-interpreted command class frame: `[class, command, payload…]`.
///
/// This is what the Z/IP envelope hands to the body parser and what encoders
/// produce. Unknown classes and commands survive in this form, so decoding
/// never fails on them.
#[derive(Clone, PartialEq)]
pub struct CCRaw {
    pub cc_id: CommandClassId,
    pub cc_command: Option<u8>,
    pub payload: Bytes,
}

impl std::fmt::Debug for CCRaw {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CCRaw")
            .field("cc_id", &self.cc_id)
            .field("cc_command", &self.cc_command.map(|c| format!("{:#04x}", c)))
            .field("payload", &format!("0x{}", hex::encode(&self.payload)))
            .finish()
    }
}

impl Parsable for CCRaw {
    fn parse(i: &mut Bytes) -> ParseResult<Self> {
        let cc_id = CommandClassId::parse(i)?;

        // All CCs except NoOperation have a CC command
        let cc_command = match cc_id {
            CommandClassId::Known(CommandClasses::NoOperation) => None,
            _ => map(be_u8, Some).parse(i)?,
        };
        let payload = rest(i)?;

        Ok(Self {
            cc_id,
            cc_command,
            payload,
        })
    }
}

impl Serializable for CCRaw {
    fn serialize(&self, output: &mut BytesMut) {
        use serialize::bytes::{be_u8, slice};
        self.cc_id.serialize(output);
        if let Some(cc_command) = self.cc_command {
            be_u8(cc_command).serialize(output);
        }
        slice(&self.payload).serialize(output);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use zip_core::hex_bytes;

    #[test]
    fn test_parse_known() {
        let mut input = hex_bytes!("250300");
        let raw = CCRaw::parse(&mut input).unwrap();
        assert_eq!(
            raw.cc_id,
            CommandClassId::Known(CommandClasses::BinarySwitch)
        );
        assert_eq!(raw.cc_command, Some(0x03));
        assert_eq!(raw.payload, hex_bytes!("00"));
    }

    #[test]
    fn test_parse_unknown_does_not_fail() {
        let mut input = hex_bytes!("fefe010203");
        let raw = CCRaw::parse(&mut input).unwrap();
        assert_eq!(raw.cc_id, CommandClassId::Unknown(0xfe));
        assert_eq!(raw.cc_command, Some(0xfe));
        assert_eq!(raw.payload, hex_bytes!("010203"));
    }

    #[test]
    fn test_roundtrip() {
        let raw = CCRaw {
            cc_id: CommandClassId::Known(CommandClasses::Basic),
            cc_command: Some(0x01),
            payload: hex_bytes!("ff"),
        };
        let bytes = raw.as_bytes();
        let mut input = bytes.clone();
        let parsed = CCRaw::parse(&mut input).unwrap();
        assert_eq!(parsed, raw);
    }
}
