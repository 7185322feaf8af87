//! Node identifiers.
//!
//! Nodes are identified by their base58 encoded id. Ids are taken as opaque
//! text; only an empty id is rejected. The dashboard shows the short form:
//! the first [`NodeId::SHORT_LEN`] characters.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The identifier of a node in the network.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeId(String);

impl NodeId {
    /// Length of the short form.
    pub const SHORT_LEN: usize = 8;

    /// The full identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The short identifier shown in node lists.
    pub fn short(&self) -> &str {
        match self.0.char_indices().nth(Self::SHORT_LEN) {
            Some((end, _)) => &self.0[..end],
            None => &self.0,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for NodeId {
    type Err = NodeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(NodeIdError::Empty);
        }
        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for NodeId {
    type Error = NodeIdError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<NodeId> for String {
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// Error parsing a node id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NodeIdError {
    #[error("node id cannot be empty")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_id() {
        let id: NodeId = "2GtxMQD94KvDH1SJPJV7icxofkyV1njuUZKtsqKmtux5".parse().unwrap();
        assert_eq!(id.short(), "2GtxMQD9");
        assert_eq!(id.as_str().len(), 44);
    }

    #[test]
    fn short_id_of_short_input_is_whole() {
        let id: NodeId = "abc".parse().unwrap();
        assert_eq!(id.short(), "abc");
    }

    #[test]
    fn reject_only_empty() {
        assert_eq!("".parse::<NodeId>(), Err(NodeIdError::Empty));
        assert_eq!("  ".parse::<NodeId>(), Err(NodeIdError::Empty));
    }

    #[test]
    fn any_non_empty_text_is_an_id() {
        for raw in ["ab-cd", "ab:cd", "node_1", "peer/2"] {
            let id: NodeId = raw.parse().unwrap();
            assert_eq!(id.as_str(), raw);
        }
        let id: NodeId = " padded ".parse().unwrap();
        assert_eq!(id.as_str(), "padded");
    }

    #[test]
    fn serde_uses_plain_string() {
        let id: NodeId = serde_json::from_str("\"bob123\"").unwrap();
        assert_eq!(id.to_string(), "bob123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"bob123\"");
        assert!(serde_json::from_str::<NodeId>("\"\"").is_err());
    }
}
