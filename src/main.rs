//! Chat Relay Server - Entry Point
//!
//! A line-oriented TCP chat relay: each client claims a unique display name
//! through a handshake, then every line it sends is broadcast to all
//! connected clients, itself included.

use env_logger;
use log::{error, info};

use chat_relay_server::{RelayConfig, Server};

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG environment variable)
    env_logger::init();

    let config = match RelayConfig::load() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!("Launching chat relay on {}", config.socket_addr());

    match Server::new(config).await {
        Ok(server) => server.start().await,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    }
}
