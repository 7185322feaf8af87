//! Core types for tanglefeed.
//!
//! This crate provides the protocol primitives: the message type tags, the
//! `(tag, payload)` envelope, and the payload shapes a node's dashboard feed
//! carries. Routing and accumulation live in `tanglefeed-client`.

mod mana;
mod message;
mod node;
mod tag;
mod time;

pub use mana::{
    AllowedPledge, ManaNetworkList, ManaSample, ManaType, NodeMana, PledgeEvent, PledgeFilter,
    RevokeEvent,
};
pub use message::{Envelope, FrameError};
pub use node::{NodeId, NodeIdError};
pub use tag::{MsgType, Tag, TagError};
pub use time::Timestamp;
