use crate::parse::{bytes::be_u8, combinators::map_res, Parsable, ParseResult, Parser};
use crate::serialize::{self, Serializable};
use bytes::{Bytes, BytesMut};
use std::fmt::{Debug, Display};

/// The highest node id a Z-Wave network can assign
pub const MAX_NODE_ID: u8 = 232;

/// Identifies a node on the Z-Wave mesh. Valid ids are 1..=232.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u8);

impl NodeId {
    /// Creates a node id, validating the 1..=232 range
    pub fn new(id: u8) -> Result<Self, InvalidNodeId> {
        match id {
            1..=MAX_NODE_ID => Ok(Self(id)),
            _ => Err(InvalidNodeId(id)),
        }
    }

    /// Creates a node id without range validation. Only meant for parsing
    /// gateway-provided values, which may use 0 as "no node".
    pub fn new_unchecked(id: u8) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("node id {0} is outside the valid range 1..=232")]
pub struct InvalidNodeId(pub u8);

impl Debug for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:0>3}", self.0)
    }
}

impl TryFrom<u8> for NodeId {
    type Error = InvalidNodeId;

    fn try_from(val: u8) -> Result<Self, Self::Error> {
        Self::new(val)
    }
}

impl From<NodeId> for u8 {
    fn from(val: NodeId) -> Self {
        val.0
    }
}

impl PartialEq<u8> for NodeId {
    fn eq(&self, other: &u8) -> bool {
        self.0 == *other
    }
}

impl Parsable for NodeId {
    fn parse(i: &mut Bytes) -> ParseResult<Self> {
        map_res(be_u8, |id| {
            NodeId::new(id).map_err(|_| crate::parse::ParseError::recoverable("invalid node id"))
        })
        .parse(i)
    }
}

impl NodeId {
    /// Parses a node id field that may be zero ("no node", e.g. in a failed
    /// node-remove status)
    pub fn parse_optional(i: &mut Bytes) -> ParseResult<Option<Self>> {
        let id = be_u8(i)?;
        Ok(Self::new(id).ok())
    }
}

impl Serializable for NodeId {
    fn serialize(&self, output: &mut BytesMut) {
        use serialize::bytes::be_u8;
        be_u8(self.0).serialize(output)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_node_id_range() {
        assert!(NodeId::new(0).is_err());
        assert!(NodeId::new(1).is_ok());
        assert!(NodeId::new(232).is_ok());
        assert!(NodeId::new(233).is_err());
    }
}
