//! Live mana monitor.
//!
//! Connects to a node's dashboard feed and logs the mana chart, network
//! lists and pledge log as they change.
//!
//!   cargo run -p tanglefeed-example-mana-monitor -- --url ws://127.0.0.1:8081/ws
//!   TANGLEFEED_CONFIG=monitor.toml cargo run -p tanglefeed-example-mana-monitor

mod monitor;

use clap::Parser;
use std::path::PathBuf;
use tanglefeed_client::ClientConfig;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "mana-monitor", about = "Follow a node's mana over its dashboard feed")]
struct Args {
    /// TOML config file.
    #[arg(long, env = "TANGLEFEED_CONFIG")]
    config: Option<PathBuf>,

    /// Feed URL, overrides the config file.
    #[arg(long, env = "TANGLEFEED_URL")]
    url: Option<String>,

    /// Points kept in the mana chart, overrides the config file.
    #[arg(long)]
    capacity: Option<usize>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("mana_monitor=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => ClientConfig::load(path)?,
        None => ClientConfig::default(),
    };
    if let Some(url) = args.url {
        config.url = url;
    }
    if let Some(capacity) = args.capacity {
        config.series_capacity = capacity;
    }
    config.validate()?;

    tracing::info!("Following {}", config.url);
    monitor::run(config).await
}
