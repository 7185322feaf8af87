//! Live views fed by the dispatcher.
//!
//! A store owns the state for a group of tags and registers its own handlers
//! with [`attach`](ManaStore::attach). Mutations and notifications are
//! separate steps: a handler first updates the store, then publishes the tag
//! that changed to subscribers, who read whatever snapshot they need.

use crate::{ClientConfig, Registry, SharedSeries};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tanglefeed_core::{
    AllowedPledge, ManaNetworkList, ManaSample, ManaType, MsgType, NodeId, PledgeEvent,
    RevokeEvent, Timestamp,
};
use tokio::sync::broadcast;

const CHANGE_BUFFER: usize = 64;

/// One point of the mana chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ManaPoint {
    pub time: Timestamp,
    pub access: f64,
    pub consensus: f64,
}

impl From<&ManaSample> for ManaPoint {
    fn from(sample: &ManaSample) -> Self {
        Self {
            time: sample.time,
            access: sample.access,
            consensus: sample.consensus,
        }
    }
}

/// A pledge or revoke, as shown in the event log.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ManaEvent {
    Pledge(PledgeEvent),
    Revoke(RevokeEvent),
}

impl ManaEvent {
    pub fn time(&self) -> Timestamp {
        match self {
            ManaEvent::Pledge(ev) => ev.time,
            ManaEvent::Revoke(ev) => ev.time,
        }
    }

    pub fn node_id(&self) -> &NodeId {
        match self {
            ManaEvent::Pledge(ev) => &ev.node_id,
            ManaEvent::Revoke(ev) => &ev.node_id,
        }
    }

    pub fn mana_type(&self) -> ManaType {
        match self {
            ManaEvent::Pledge(ev) => ev.mana_type,
            ManaEvent::Revoke(ev) => ev.mana_type,
        }
    }
}

/// Which nodes a network mana list covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetworkScope {
    Overall,
    Online,
}

impl NetworkScope {
    fn msg_type(self) -> MsgType {
        match self {
            NetworkScope::Overall => MsgType::ManaMapOverall,
            NetworkScope::Online => MsgType::ManaMapOnline,
        }
    }
}

#[derive(Debug, Default)]
struct NodeView {
    latest: HashMap<NodeId, ManaSample>,
    networks: HashMap<(NetworkScope, ManaType), ManaNetworkList>,
    allowed_pledge: Option<AllowedPledge>,
    dashboard_address: Option<String>,
}

/// Everything the mana dashboard shows.
///
/// The chart and the event log are bounded series; the network lists,
/// pledge filter and dashboard address hold only their latest value.
#[derive(Debug, Clone)]
pub struct ManaStore {
    series: SharedSeries<ManaPoint>,
    events: SharedSeries<ManaEvent>,
    view: Arc<RwLock<NodeView>>,
    changes: broadcast::Sender<MsgType>,
}

impl ManaStore {
    pub fn new(series_capacity: usize, event_capacity: usize) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_BUFFER);
        Self {
            series: SharedSeries::new(series_capacity),
            events: SharedSeries::new(event_capacity),
            view: Arc::new(RwLock::new(NodeView::default())),
            changes,
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(config.series_capacity, config.event_capacity)
    }

    /// Register handlers for every mana tag.
    pub fn attach(&self, registry: &mut Registry) {
        let store = self.clone();
        registry.on(MsgType::Mana, move |sample: ManaSample| {
            store.record(sample);
        });
        for scope in [NetworkScope::Overall, NetworkScope::Online] {
            let store = self.clone();
            registry.on(scope.msg_type(), move |list: ManaNetworkList| {
                store.update_network(scope, list);
            });
        }
        let store = self.clone();
        registry.on(MsgType::ManaAllowedPledge, move |allowed: AllowedPledge| {
            store.set_allowed_pledge(allowed);
        });
        let store = self.clone();
        registry.on(MsgType::ManaPledge, move |ev: PledgeEvent| {
            store.record_event(ManaEvent::Pledge(ev));
        });
        let store = self.clone();
        registry.on(MsgType::ManaRevoke, move |ev: RevokeEvent| {
            store.record_event(ManaEvent::Revoke(ev));
        });
        let store = self.clone();
        registry.on(MsgType::ManaDashboardAddress, move |address: String| {
            store.set_dashboard_address(address);
        });
    }

    /// Subscribe to change notifications. Each message names the tag whose
    /// view changed.
    pub fn subscribe(&self) -> broadcast::Receiver<MsgType> {
        self.changes.subscribe()
    }

    /// Append a sample to the chart. Returns the point that fell out of the
    /// window, if any.
    pub fn record(&self, sample: ManaSample) -> Option<ManaPoint> {
        let evicted = self.series.append(ManaPoint::from(&sample));
        self.write_view()
            .latest
            .insert(sample.node_id.clone(), sample);
        self.publish(MsgType::Mana);
        evicted
    }

    pub fn update_network(&self, scope: NetworkScope, list: ManaNetworkList) {
        self.write_view()
            .networks
            .insert((scope, list.mana_type), list);
        self.publish(scope.msg_type());
    }

    pub fn record_event(&self, event: ManaEvent) -> Option<ManaEvent> {
        let kind = match event {
            ManaEvent::Pledge(_) => MsgType::ManaPledge,
            ManaEvent::Revoke(_) => MsgType::ManaRevoke,
        };
        let evicted = self.events.append(event);
        self.publish(kind);
        evicted
    }

    pub fn set_allowed_pledge(&self, allowed: AllowedPledge) {
        self.write_view().allowed_pledge = Some(allowed);
        self.publish(MsgType::ManaAllowedPledge);
    }

    pub fn set_dashboard_address(&self, address: String) {
        self.write_view().dashboard_address = Some(address);
        self.publish(MsgType::ManaDashboardAddress);
    }

    /// The chart, oldest point first.
    pub fn series(&self) -> Vec<ManaPoint> {
        self.series.snapshot()
    }

    /// Recent pledges and revokes, oldest first.
    pub fn events(&self) -> Vec<ManaEvent> {
        self.events.snapshot()
    }

    /// The most recent sample from `node`.
    pub fn latest(&self, node: &NodeId) -> Option<ManaSample> {
        self.read_view().latest.get(node).cloned()
    }

    pub fn network(&self, scope: NetworkScope, mana_type: ManaType) -> Option<ManaNetworkList> {
        self.read_view().networks.get(&(scope, mana_type)).cloned()
    }

    pub fn allowed_pledge(&self) -> Option<AllowedPledge> {
        self.read_view().allowed_pledge.clone()
    }

    pub fn dashboard_address(&self) -> Option<String> {
        self.read_view().dashboard_address.clone()
    }

    fn publish(&self, kind: MsgType) {
        // No subscribers is fine.
        let _ = self.changes.send(kind);
    }

    fn read_view(&self) -> std::sync::RwLockReadGuard<'_, NodeView> {
        self.view.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_view(&self) -> std::sync::RwLockWriteGuard<'_, NodeView> {
        self.view.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Tracks the node's keepalive pings.
#[derive(Debug, Clone)]
pub struct PingMonitor {
    last_seen: Arc<AtomicU64>,
    count: Arc<AtomicU64>,
    changes: broadcast::Sender<MsgType>,
}

impl Default for PingMonitor {
    fn default() -> Self {
        let (changes, _) = broadcast::channel(CHANGE_BUFFER);
        Self {
            last_seen: Arc::default(),
            count: Arc::default(),
            changes,
        }
    }
}

impl PingMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to ping notifications; every observed ping sends
    /// [`MsgType::Ping`].
    pub fn subscribe(&self) -> broadcast::Receiver<MsgType> {
        self.changes.subscribe()
    }

    pub fn attach(&self, registry: &mut Registry) {
        let monitor = self.clone();
        registry.register(MsgType::Ping, move |_: &[u8]| {
            monitor.observe(Timestamp::now());
            Ok(())
        });
    }

    pub fn observe(&self, at: Timestamp) {
        self.last_seen.store(at.as_millis(), Ordering::Relaxed);
        // Publishes `last_seen` to readers that observe the new count.
        self.count.fetch_add(1, Ordering::Release);
        let _ = self.changes.send(MsgType::Ping);
    }

    /// When the last ping arrived, by local clock.
    pub fn last_seen(&self) -> Option<Timestamp> {
        match self.count() {
            0 => None,
            _ => Some(Timestamp::from_millis(
                self.last_seen.load(Ordering::Relaxed),
            )),
        }
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Acquire)
    }
}
