//! Mana payloads.
//!
//! These are the `data` shapes for the mana family of tags (8 through 14).

use crate::{NodeId, Timestamp};
use serde::{Deserialize, Serialize};

/// Which mana vector a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ManaType {
    Access,
    Consensus,
}

/// A node's current mana, sent with tag `mana`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManaSample {
    #[serde(rename = "nodeID")]
    pub node_id: NodeId,
    pub access: f64,
    pub consensus: f64,
    pub time: Timestamp,
}

/// One entry of a network mana list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeMana {
    #[serde(rename = "shortNodeID")]
    pub short_node_id: String,
    #[serde(rename = "nodeID")]
    pub node_id: NodeId,
    pub mana: f64,
}

/// Mana of the whole network (tag `manaMapOverall`) or of the online
/// nodes only (tag `manaMapOnline`), sorted by the sender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManaNetworkList {
    pub mana_type: ManaType,
    pub total_mana: f64,
    #[serde(default)]
    pub nodes: Vec<NodeMana>,
}

/// Pledge filter for one mana type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PledgeFilter {
    pub is_filter_enabled: bool,
    #[serde(default)]
    pub allowed: Vec<String>,
}

/// The nodes this node accepts pledges to, tag `manaAllowedPledge`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedPledge {
    pub access: PledgeFilter,
    pub consensus: PledgeFilter,
}

/// Mana pledged to a node by a transaction, tag `manaPledge`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PledgeEvent {
    pub mana_type: ManaType,
    #[serde(rename = "nodeID")]
    pub node_id: NodeId,
    pub time: Timestamp,
    #[serde(rename = "txID")]
    pub tx_id: String,
    pub amount: f64,
}

/// Mana revoked from a node by a transaction, tag `manaRevoke`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevokeEvent {
    pub mana_type: ManaType,
    #[serde(rename = "nodeID")]
    pub node_id: NodeId,
    pub time: Timestamp,
    #[serde(rename = "txID")]
    pub tx_id: String,
    pub amount: f64,
}
