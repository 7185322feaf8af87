//! Session wiring: one connection, one dispatcher, the mana store and a
//! reporter task that logs whatever changed.

use tanglefeed_client::{
    connect, ClientConfig, CloseReason, Dispatcher, ManaStore, NetworkScope, PingMonitor,
    Registry,
};
use tanglefeed_core::{ManaType, MsgType};
use tokio::sync::broadcast::error::RecvError;

pub async fn run(config: ClientConfig) -> anyhow::Result<()> {
    let store = ManaStore::from_config(&config);
    let pings = PingMonitor::new();

    let mut registry = Registry::new();
    store.attach(&mut registry);
    pings.attach(&mut registry);
    let mut dispatcher = Dispatcher::new(registry);

    let reporter = tokio::spawn(report(store.clone()));

    let close = dispatcher.close_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupted, closing");
            close.close();
        }
    });

    let envelopes = connect(&config.url).await?;
    let reason = dispatcher.run(envelopes).await;
    reporter.abort();

    let stats = dispatcher.stats();
    tracing::info!(
        "Session over: {} delivered, {} unroutable, {} rejected, {} malformed, {} pings",
        stats.delivered,
        stats.unroutable,
        stats.rejected,
        stats.malformed,
        pings.count()
    );

    match reason {
        CloseReason::Transport(e) => Err(e.into()),
        CloseReason::EndOfStream | CloseReason::Requested => Ok(()),
    }
}

async fn report(store: ManaStore) {
    let mut changes = store.subscribe();
    loop {
        let kind = match changes.recv().await {
            Ok(kind) => kind,
            Err(RecvError::Lagged(n)) => {
                tracing::debug!("Reporter skipped {} updates", n);
                continue;
            }
            Err(RecvError::Closed) => break,
        };

        match kind {
            MsgType::Mana => {
                let series = store.series();
                if let Some(point) = series.last() {
                    tracing::info!(
                        "mana @ {}: access {:.2}, consensus {:.2} ({} points)",
                        point.time,
                        point.access,
                        point.consensus,
                        series.len()
                    );
                }
            }
            MsgType::ManaMapOverall | MsgType::ManaMapOnline => {
                let scope = if kind == MsgType::ManaMapOverall {
                    NetworkScope::Overall
                } else {
                    NetworkScope::Online
                };
                for mana_type in [ManaType::Access, ManaType::Consensus] {
                    if let Some(list) = store.network(scope, mana_type) {
                        let top = list.nodes.first().map(|n| n.short_node_id.as_str());
                        tracing::info!(
                            "{:?} {:?} mana: total {:.2} over {} nodes, top {}",
                            scope,
                            mana_type,
                            list.total_mana,
                            list.nodes.len(),
                            top.unwrap_or("-")
                        );
                    }
                }
            }
            MsgType::ManaPledge | MsgType::ManaRevoke => {
                if let Some(event) = store.events().last() {
                    tracing::info!(
                        "{} {:?} mana for {} at {}",
                        kind,
                        event.mana_type(),
                        event.node_id().short(),
                        event.time()
                    );
                }
            }
            MsgType::ManaDashboardAddress => {
                if let Some(address) = store.dashboard_address() {
                    tracing::info!("Node mana dashboard at {}", address);
                }
            }
            _ => tracing::debug!("{} updated", kind),
        }
    }
}
