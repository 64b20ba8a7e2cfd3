use crate::commandclass::{CCBase, CCId, CCParsable, CCParsingContext, CCSerializable, CC};
use bytes::{Bytes, BytesMut};
use derive_try_from_primitive::TryFromPrimitive;
use typed_builder::TypedBuilder;
use zip_core::parse::{bytes::be_u8, Parsable, ParseResult};
use zip_core::prelude::*;
use zip_core::serialize::{self, Serializable};

#[derive(Debug, Clone, Copy, PartialEq, TryFromPrimitive)]
#[repr(u8)]
pub enum AssociationCCCommand {
    Set = 0x01,
    Get = 0x02,
    Report = 0x03,
    Remove = 0x04,
}

/// Some gateways emit association reports under 0x06 instead of 0x03.
/// The dispatcher accepts both and produces the same report type.
pub const ASSOCIATION_REPORT_ALT_COMMAND: u8 = 0x06;

fn parse_node_list(i: &mut Bytes) -> ParseResult<Vec<NodeId>> {
    let mut nodes = Vec::with_capacity(i.len());
    while !i.is_empty() {
        nodes.push(NodeId::parse(i)?);
    }
    Ok(nodes)
}

fn serialize_node_list(nodes: &[NodeId], output: &mut BytesMut) {
    for node in nodes {
        node.serialize(output);
    }
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct AssociationCCSet {
    pub group_id: u8,
    pub node_ids: Vec<NodeId>,
}

impl CCBase for AssociationCCSet {}

impl CCId for AssociationCCSet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Association
    }

    fn cc_command(&self) -> Option<u8> {
        Some(AssociationCCCommand::Set as _)
    }
}

impl CCParsable for AssociationCCSet {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let group_id = be_u8(i)?;
        let node_ids = parse_node_list(i)?;
        Ok(Self { group_id, node_ids })
    }
}

impl CCSerializable for AssociationCCSet {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        be_u8(self.group_id).serialize(output);
        serialize_node_list(&self.node_ids, output);
    }
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct AssociationCCRemove {
    pub group_id: u8,
    /// Removing with an empty list clears the whole group
    #[builder(default)]
    pub node_ids: Vec<NodeId>,
}

impl CCBase for AssociationCCRemove {}

impl CCId for AssociationCCRemove {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Association
    }

    fn cc_command(&self) -> Option<u8> {
        Some(AssociationCCCommand::Remove as _)
    }
}

impl CCParsable for AssociationCCRemove {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let group_id = be_u8(i)?;
        let node_ids = parse_node_list(i)?;
        Ok(Self { group_id, node_ids })
    }
}

impl CCSerializable for AssociationCCRemove {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        be_u8(self.group_id).serialize(output);
        serialize_node_list(&self.node_ids, output);
    }
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct AssociationCCGet {
    pub group_id: u8,
}

impl CCBase for AssociationCCGet {
    fn expects_report(&self) -> bool {
        true
    }

    fn test_report(&self, report: &CC) -> bool {
        matches!(
            report,
            CC::AssociationCCReport(report) if report.group_id == self.group_id
        )
    }
}

impl CCId for AssociationCCGet {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Association
    }

    fn cc_command(&self) -> Option<u8> {
        Some(AssociationCCCommand::Get as _)
    }
}

impl CCParsable for AssociationCCGet {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let group_id = be_u8(i)?;
        Ok(Self { group_id })
    }
}

impl CCSerializable for AssociationCCGet {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        be_u8(self.group_id).serialize(output);
    }
}

#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct AssociationCCReport {
    pub group_id: u8,
    pub max_nodes_supported: u8,
    pub reports_to_follow: u8,
    pub node_ids: Vec<NodeId>,
}

impl CCBase for AssociationCCReport {}

impl CCId for AssociationCCReport {
    fn cc_id(&self) -> CommandClasses {
        CommandClasses::Association
    }

    fn cc_command(&self) -> Option<u8> {
        Some(AssociationCCCommand::Report as _)
    }
}

impl CCParsable for AssociationCCReport {
    fn parse(i: &mut Bytes, _ctx: &CCParsingContext) -> ParseResult<Self> {
        let group_id = be_u8(i)?;
        let max_nodes_supported = be_u8(i)?;
        let reports_to_follow = be_u8(i)?;
        let node_ids = parse_node_list(i)?;

        Ok(Self {
            group_id,
            max_nodes_supported,
            reports_to_follow,
            node_ids,
        })
    }
}

impl CCSerializable for AssociationCCReport {
    fn serialize_payload(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        be_u8(self.group_id).serialize(output);
        be_u8(self.max_nodes_supported).serialize(output);
        be_u8(self.reports_to_follow).serialize(output);
        serialize_node_list(&self.node_ids, output);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use zip_core::hex_bytes;

    #[test]
    fn test_report() {
        let ctx = CCParsingContext::default();
        let mut input = hex_bytes!("010500020304");
        let report = AssociationCCReport::parse(&mut input, &ctx).unwrap();
        assert_eq!(report.group_id, 1);
        assert_eq!(report.max_nodes_supported, 5);
        assert_eq!(report.reports_to_follow, 0);
        assert_eq!(
            report.node_ids,
            vec![
                NodeId::new(2).unwrap(),
                NodeId::new(3).unwrap(),
                NodeId::new(4).unwrap(),
            ]
        );
    }

    #[test]
    fn test_set_rejects_invalid_node_id() {
        // Node ids outside 1..=232 cannot be constructed
        assert!(NodeId::new(0).is_err());
        assert!(NodeId::new(240).is_err());
    }
}
