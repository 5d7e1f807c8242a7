#![forbid(unsafe_code)]
//! Picochain node entrypoint: one ledger, one API server.

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};

use picochain::api::run_api_server;
use picochain::config::load_config;
use picochain::node::Node;

#[derive(Parser)]
#[command(name = "picochain-node", about = "Run a picochain ledger node")]
struct Args {
    /// Port to serve the API on; overrides config.toml
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = load_config()?;
    let port = args.port.unwrap_or(config.network.api_port);

    let node = Arc::new(Node::new(Duration::from_secs(
        config.network.fetch_timeout_secs,
    )));
    info!("starting picochain node {} on port {}", node.node_id, port);

    for peer in &config.network.bootstrap_peers {
        match node.register_peer(peer).await {
            Ok(addr) => info!("registered bootstrap peer {}", addr),
            Err(e) => warn!("skipping bootstrap peer '{}': {}", peer, e),
        }
    }

    run_api_server(node, port).await
}
