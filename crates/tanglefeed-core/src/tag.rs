//! Message type tags.
//!
//! Tag values are part of the protocol and never change. New kinds are
//! appended; 6 and 7 are reserved and must not be reused.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw numeric message tag as it appears on the wire.
///
/// Any value is representable, including ones this crate has no [`MsgType`]
/// for. Routing is keyed on `Tag`, so unknown values simply find no handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(pub u32);

impl Tag {
    /// The known message type for this tag, if any.
    pub fn msg_type(self) -> Option<MsgType> {
        MsgType::try_from(self).ok()
    }
}

impl From<u32> for Tag {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<MsgType> for Tag {
    fn from(kind: MsgType) -> Self {
        Self(kind as u32)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.msg_type() {
            Some(kind) => write!(f, "{}({})", kind.name(), self.0),
            None => write!(f, "{}", self.0),
        }
    }
}

/// The closed set of message kinds a node's dashboard feed sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MsgType {
    Ping = 0,
    Fpc = 1,
    AddNode = 2,
    RemoveNode = 3,
    ConnectNodes = 4,
    DisconnectNodes = 5,
    Mana = 8,
    ManaMapOverall = 9,
    ManaMapOnline = 10,
    ManaAllowedPledge = 11,
    ManaPledge = 12,
    ManaRevoke = 13,
    ManaDashboardAddress = 14,
    ReqManaDashboardAddress = 15,
}

impl MsgType {
    /// Every known message type, in tag order.
    pub const ALL: [MsgType; 14] = [
        MsgType::Ping,
        MsgType::Fpc,
        MsgType::AddNode,
        MsgType::RemoveNode,
        MsgType::ConnectNodes,
        MsgType::DisconnectNodes,
        MsgType::Mana,
        MsgType::ManaMapOverall,
        MsgType::ManaMapOnline,
        MsgType::ManaAllowedPledge,
        MsgType::ManaPledge,
        MsgType::ManaRevoke,
        MsgType::ManaDashboardAddress,
        MsgType::ReqManaDashboardAddress,
    ];

    /// The wire tag for this type.
    pub fn tag(self) -> Tag {
        Tag::from(self)
    }

    /// Protocol name, as used in logs.
    pub fn name(self) -> &'static str {
        match self {
            MsgType::Ping => "ping",
            MsgType::Fpc => "fpc",
            MsgType::AddNode => "addNode",
            MsgType::RemoveNode => "removeNode",
            MsgType::ConnectNodes => "connectNodes",
            MsgType::DisconnectNodes => "disconnectNodes",
            MsgType::Mana => "mana",
            MsgType::ManaMapOverall => "manaMapOverall",
            MsgType::ManaMapOnline => "manaMapOnline",
            MsgType::ManaAllowedPledge => "manaAllowedPledge",
            MsgType::ManaPledge => "manaPledge",
            MsgType::ManaRevoke => "manaRevoke",
            MsgType::ManaDashboardAddress => "manaDashboardAddress",
            MsgType::ReqManaDashboardAddress => "reqManaDashboardAddress",
        }
    }
}

impl fmt::Display for MsgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<Tag> for MsgType {
    type Error = TagError;

    fn try_from(tag: Tag) -> Result<Self, Self::Error> {
        MsgType::ALL
            .into_iter()
            .find(|kind| *kind as u32 == tag.0)
            .ok_or(TagError::Unknown(tag.0))
    }
}

/// Error converting a raw tag into a [`MsgType`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TagError {
    #[error("unknown message tag: {0}")]
    Unknown(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_values_are_stable() {
        assert_eq!(MsgType::Ping.tag(), Tag(0));
        assert_eq!(MsgType::DisconnectNodes.tag(), Tag(5));
        assert_eq!(MsgType::Mana.tag(), Tag(8));
        assert_eq!(MsgType::ManaRevoke.tag(), Tag(13));
        assert_eq!(MsgType::ReqManaDashboardAddress.tag(), Tag(15));
    }

    #[test]
    fn reserved_and_unknown_tags_have_no_type() {
        assert_eq!(Tag(6).msg_type(), None);
        assert_eq!(Tag(7).msg_type(), None);
        assert_eq!(MsgType::try_from(Tag(99)), Err(TagError::Unknown(99)));
    }

    #[test]
    fn every_type_round_trips_through_its_tag() {
        for kind in MsgType::ALL {
            assert_eq!(kind.tag().msg_type(), Some(kind));
        }
    }

    #[test]
    fn display_names_known_tags() {
        assert_eq!(Tag(8).to_string(), "mana(8)");
        assert_eq!(Tag(99).to_string(), "99");
    }
}
