//! Module `session::state`
//!
//! Tracks what one connection has registered with the roster, so teardown
//! can undo exactly that and nothing else. A client that disconnects
//! mid-handshake has claimed nothing and leaves no trace.

use log::info;
use std::net::SocketAddr;

use crate::registry::SharedRegistry;

/// Per-connection registration state
pub struct Session {
    addr: SocketAddr,
    name: Option<String>,
    registered: bool,
}

impl Session {
    pub fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            name: None,
            registered: false,
        }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Records the display name claimed during the handshake
    pub fn set_name(&mut self, name: String) {
        self.name = Some(name);
    }

    /// Records that the outbound channel entered the broadcast set
    pub fn mark_registered(&mut self) {
        self.registered = true;
    }

    /// Undoes this connection's roster entries: releases the name if one
    /// was claimed and unregisters the channel if it was registered.
    /// Idempotent, so a second call observes nothing left to undo.
    pub async fn teardown(&mut self, registry: &SharedRegistry) {
        let name = self.name.take();
        let was_registered = std::mem::take(&mut self.registered);
        if name.is_none() && !was_registered {
            return;
        }

        let mut roster = registry.lock().await;
        if was_registered {
            roster.unregister_channel(&self.addr);
        }
        if let Some(name) = name {
            roster.release_name(&name);
            info!(
                "Client {} ({:?}) left, {} remaining",
                self.addr,
                name,
                roster.len()
            );
        }
    }
}
