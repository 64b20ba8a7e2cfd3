use crate::commandclass::{CCBase, CCId, CCParsable, CCParsingContext, CCSerializable, CC};
use bytes::{Bytes, BytesMut};
use derive_try_from_primitive::TryFromPrimitive;
use typed_builder::TypedBuilder;
use zip_core::parse::{
    bytes::{be_u8, rest},
    multi::fixed_length_bitmask_u8,
    Parsable, ParseResult,
};
use zip_core::prelude::*;
use zip_core::serialize::{self, sequence::fixed_bitmask_u8, Serializable};

#[derive(Debug, Clone, Copy, PartialEq, TryFromPrimitive)]
#[repr(u8)]
pub enum NetworkManagementProxyCCCommand {
    NodeListGet = 0x01,
    NodeListReport = 0x02,
    NodeInfoCachedGet = 0x03,
    NodeInfoCachedReport = 0x04,
}

/// The node-list bitmask covers nodes 1..=232
pub const NODE_LIST_BITMASK_LEN: usize = 29;

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct NetworkManagementProxyCCNodeListGet {
    pub seq_no: u8,
}

impl CCBase for NetworkManagementProxyCCNodeListGet {
    fn expects_report(&self) -> bool {
        true
    }

    fn test_report(&self, report: &CC) -> bool {
        matches!(
            report,
            CC::NetworkManagementProxyCCNodeListReport(report) if report.seq_no == self.seq_no
        )
    }
}

impl CCId for NetworkManagementProxyCCNodeListGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::NetworkManagementProxy
    }

    fn cc_command(&self) -> Option<u8> {
        Some(NetworkManagementProxyCCCommand::NodeListGet as _)
    }
}

impl CCParsable for NetworkManagementProxyCCNodeListGet {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let seq_no = be_u8(i)?;
        Ok(Self { seq_no })
    }
}

impl CCSerializable for NetworkManagementProxyCCNodeListGet {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        be_u8(self.seq_no).serialize(output);
    }
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct NetworkManagementProxyCCNodeListReport {
    pub seq_no: u8,
    /// 0 means the list is up to date, anything else that it may be stale
    pub status: u8,
    pub controller_id: u8,
    /// The present node ids, sorted ascending
    pub node_list: Vec<NodeId>,
}

impl CCBase for NetworkManagementProxyCCNodeListReport {}

impl CCId for NetworkManagementProxyCCNodeListReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::NetworkManagementProxy
    }

    fn cc_command(&self) -> Option<u8> {
        Some(NetworkManagementProxyCCCommand::NodeListReport as _)
    }
}

impl CCParsable for NetworkManagementProxyCCNodeListReport {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let seq_no = be_u8(i)?;
        let status = be_u8(i)?;
        let controller_id = be_u8(i)?;
        // Gateways usually send all 29 mask bytes, but trust the actual length
        let mask_len = i.len().min(NODE_LIST_BITMASK_LEN);
        let node_list = fixed_length_bitmask_u8(i, 1, mask_len)?
            .into_iter()
            .filter_map(|id| NodeId::new(id).ok())
            .collect();

        Ok(Self {
            seq_no,
            status,
            controller_id,
            node_list,
        })
    }
}

impl CCSerializable for NetworkManagementProxyCCNodeListReport {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        be_u8(self.seq_no).serialize(output);
        be_u8(self.status).serialize(output);
        be_u8(self.controller_id).serialize(output);
        let ids: Vec<u8> = self.node_list.iter().copied().map(u8::from).collect();
        fixed_bitmask_u8(&ids, 1, NODE_LIST_BITMASK_LEN).serialize(output);
    }
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct NetworkManagementProxyCCNodeInfoCachedGet {
    pub seq_no: u8,
    /// Maximum acceptable cache age as a power of two minutes
    #[builder(default)]
    pub max_age: u8,
    pub node_id: NodeId,
}

impl CCBase for NetworkManagementProxyCCNodeInfoCachedGet {
    fn expects_report(&self) -> bool {
        true
    }

    fn test_report(&self, report: &CC) -> bool {
        matches!(
            report,
            CC::NetworkManagementProxyCCNodeInfoCachedReport(report)
                if report.seq_no == self.seq_no
        )
    }
}

impl CCId for NetworkManagementProxyCCNodeInfoCachedGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::NetworkManagementProxy
    }

    fn cc_command(&self) -> Option<u8> {
        Some(NetworkManagementProxyCCCommand::NodeInfoCachedGet as _)
    }
}

impl CCParsable for NetworkManagementProxyCCNodeInfoCachedGet {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let seq_no = be_u8(i)?;
        let max_age = be_u8(i)? & 0x0f;
        let node_id = NodeId::parse(i)?;

        Ok(Self {
            seq_no,
            max_age,
            node_id,
        })
    }
}

impl CCSerializable for NetworkManagementProxyCCNodeInfoCachedGet {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        be_u8(self.seq_no).serialize(output);
        be_u8(self.max_age & 0x0f).serialize(output);
        self.node_id.serialize(output);
    }
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct NetworkManagementProxyCCNodeInfoCachedReport {
    pub seq_no: u8,
    /// Cache status nibble: 0 = ok, 1 = not responding, 2 = unknown node
    pub status: u8,
    /// Age of the cache entry as a power of two minutes
    pub age: u8,
    pub listening: bool,
    /// The S2 keys the node was granted; the strongest one is the level it
    /// communicates at
    pub granted_keys: Vec<SecurityKey>,
    #[builder(default = MaybeKnown::Unknown(0))]
    pub basic_class: MaybeKnown<BasicDeviceClass>,
    #[builder(default = MaybeKnown::Unknown(0))]
    pub generic_class: MaybeKnown<GenericDeviceClass>,
    #[builder(default = SpecificDeviceClass::NotUsed)]
    pub specific_class: SpecificDeviceClass,
    #[builder(default)]
    pub command_classes: Vec<CommandClassId>,
}

impl NetworkManagementProxyCCNodeInfoCachedReport {
    /// The strongest key the node was granted, if any
    pub fn highest_granted_key(&self) -> Option<SecurityKey> {
        SecurityKey::by_strength()
            .into_iter()
            .find(|key| self.granted_keys.contains(key))
    }
}

impl CCBase for NetworkManagementProxyCCNodeInfoCachedReport {}

impl CCId for NetworkManagementProxyCCNodeInfoCachedReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::NetworkManagementProxy
    }

    fn cc_command(&self) -> Option<u8> {
        Some(NetworkManagementProxyCCCommand::NodeInfoCachedReport as _)
    }
}

impl CCParsable for NetworkManagementProxyCCNodeInfoCachedReport {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let seq_no = be_u8(i)?;
        let b = be_u8(i)?;
        let status = b >> 4;
        let age = b & 0x0f;
        let listening = be_u8(i)? & 0x80 != 0;
        let _opt = be_u8(i)?;
        let granted_keys = SecurityKey::keys_from_bitmask(be_u8(i)?);
        let basic_class = MaybeKnown::<BasicDeviceClass>::parse(i)?;
        let generic_class = MaybeKnown::<GenericDeviceClass>::parse(i)?;
        let specific_class = SpecificDeviceClass::lookup(generic_class, be_u8(i)?);
        let mut cc_bytes = rest(i)?;
        let command_classes = parse_cc_list(&mut cc_bytes)?;

        Ok(Self {
            seq_no,
            status,
            age,
            listening,
            granted_keys,
            basic_class,
            generic_class,
            specific_class,
            command_classes,
        })
    }
}

impl CCSerializable for NetworkManagementProxyCCNodeInfoCachedReport {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        be_u8(self.seq_no).serialize(output);
        be_u8((self.status << 4) | (self.age & 0x0f)).serialize(output);
        be_u8(if self.listening { 0x80 } else { 0x00 }).serialize(output);
        be_u8(0).serialize(output);
        be_u8(SecurityKey::keys_to_bitmask(&self.granted_keys)).serialize(output);
        self.basic_class.serialize(output);
        self.generic_class.serialize(output);
        let specific = match self.specific_class {
            SpecificDeviceClass::Unknown(_, s) => s,
            _ => 0,
        };
        be_u8(specific).serialize(output);
        serialize_cc_list(&self.command_classes).serialize(output);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use zip_core::hex_bytes;

    #[test]
    fn test_node_list_report() {
        let ctx = CCParsingContext::default();
        // seq 1, status 0, controller 0, bit 0 and bit 2 of the first mask byte
        let mut body = BytesMut::new();
        use zip_core::serialize::bytes::slice;
        slice(&[0x01u8, 0x00, 0x00, 0x05]).serialize(&mut body);
        slice(&[0u8; 26]).serialize(&mut body);
        let mut input = body.freeze();

        let report =
            NetworkManagementProxyCCNodeListReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(report.seq_no, 1);
        assert_eq!(report.status, 0);
        assert_eq!(
            report.node_list,
            vec![NodeId::new(1).unwrap(), NodeId::new(3).unwrap()]
        );
    }

    #[test]
    fn test_node_list_roundtrip_29_bytes() {
        let report = NetworkManagementProxyCCNodeListReport::builder()
            .seq_no(1)
            .status(0)
            .controller_id(1)
            .node_list(vec![
                NodeId::new(1).unwrap(),
                NodeId::new(3).unwrap(),
                NodeId::new(232).unwrap(),
            ])
            .build();

        let mut buf = BytesMut::new();
        report.serialize_payload(&mut buf);
        // 3 header bytes + full 29-byte bitmask
        assert_eq!(buf.len(), 3 + NODE_LIST_BITMASK_LEN);

        let ctx = CCParsingContext::default();
        let mut input = buf.freeze();
        let parsed =
            NetworkManagementProxyCCNodeListReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_node_info_cached_report() {
        let ctx = CCParsingContext::default();
        // seq 3, ok/age 2, listening, keys S2 unauth, basic 0x04,
        // generic binary switch, specific power switch, CCs [0x25, 0x72]
        let mut input = hex_bytes!("03028000010410012572");
        let report =
            NetworkManagementProxyCCNodeInfoCachedReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(report.seq_no, 3);
        assert_eq!(report.age, 2);
        assert!(report.listening);
        assert_eq!(
            report.highest_granted_key(),
            Some(SecurityKey::S2Unauthenticated)
        );
        assert_eq!(
            report.generic_class,
            MaybeKnown::Known(GenericDeviceClass::BinarySwitch)
        );
        assert_eq!(report.specific_class, SpecificDeviceClass::PowerSwitchBinary);
        assert_eq!(
            report.command_classes,
            vec![
                CommandClassId::Known(CommandClasses::BinarySwitch),
                CommandClassId::Known(CommandClasses::ManufacturerSpecific),
            ]
        );
    }
}
