use anyhow::Result;
use colored::*;
use std::net::{IpAddr, SocketAddr};
use tandem::server::{RelayConfig, bind_and_serve};
use tracing::{info, warn};

pub async fn run(
    host: IpAddr,
    port: u16,
    allowed_origins: Vec<String>,
    notify_on_leave: bool,
) -> Result<()> {
    let config = RelayConfig {
        bind_addr: SocketAddr::new(host, port),
        allowed_origins,
        notify_on_leave,
        ..RelayConfig::default()
    };

    println!(
        "{} {}",
        "Starting tandem relay on".green().bold(),
        config.bind_addr.to_string().cyan()
    );

    bind_and_serve(config, shutdown_signal()).await?;

    println!("{}", "Relay stopped".yellow());
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Ctrl-C received, shutting down"),
        Err(e) => warn!("Failed to listen for Ctrl-C: {}", e),
    }
}
