use log::{error, info};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::config::RelayConfig;
use crate::error::RelayError;
use crate::registry::{Registry, SharedRegistry};
use crate::session::handle_session;

pub struct Server {
    registry: SharedRegistry,
    listener: TcpListener,
    config: Arc<RelayConfig>,
    local_addr: SocketAddr,
}

impl Server {
    /// Binds the listening socket. A bind failure is the one startup fault
    /// that is fatal to the whole process.
    pub async fn new(config: RelayConfig) -> Result<Self, RelayError> {
        let socket = config.socket_addr();

        let listener = TcpListener::bind(&socket)
            .await
            .map_err(|e| RelayError::Bind {
                addr: socket,
                source: e,
            })?;
        let local_addr = listener.local_addr()?;
        info!("Chat relay bound to {}", local_addr);

        Ok(Self {
            registry: Arc::new(Mutex::new(Registry::new())),
            listener,
            config: Arc::new(config),
            local_addr,
        })
    }

    /// Address the listener actually bound, useful when the configured
    /// port is 0.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Accept loop. Runs until the process is terminated; accept errors
    /// are logged and never stop the loop.
    pub async fn start(&self) {
        info!("Chat relay accepting connections on {}", self.local_addr);

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    info!("New connection from {}", addr);
                    let registry = Arc::clone(&self.registry);
                    let config = Arc::clone(&self.config);

                    // Spawn a task per client so the accept loop is never
                    // blocked by any session's behavior
                    tokio::spawn(async move {
                        handle_session(stream, addr, registry, config).await;
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}
