use anyhow::Result;
use clap::Parser;
use log::{error, info};
use std::sync::Arc;

use pump_gateway::api::LiveUpstream;
use pump_gateway::cli::Cli;
use pump_gateway::config::Config;
use pump_gateway::services::Gateway;
use pump_gateway::web::WebServer;
use pump_gateway::{logging, metrics};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    // Load configuration
    let mut config = match Config::load_or_default(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Failed to load configuration from {:?}: {}", cli.config, e);
            return Err(anyhow::anyhow!("Configuration loading failed: {}", e));
        }
    };
    config.apply_env()?;
    if let Some(host) = cli.host.clone() {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.validate()?;

    logging::init(&config.logging, cli.debug)?;
    metrics::init().map_err(pump_gateway::Error::from)?;
    info!("Starting pump.fun gateway...");

    let upstream = Arc::new(LiveUpstream::new(&config)?);
    let gateway = Arc::new(Gateway::new(upstream, config.gateway.clone()));
    info!("Upstream clients initialized ({}, {}).", config.upstream.base_url, config.solana.rpc_url);

    let addr = config.socket_addr()?;
    let shutdown = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => {
                error!("Failed to listen for shutdown signal: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    WebServer::new(gateway).start(addr, shutdown).await?;
    info!("Gateway stopped.");
    Ok(())
}
