//! Module `registry`
//!
//! Central roster of connected chat clients: the set of claimed display
//! names plus the outbound channel of every client that has completed the
//! handshake. All membership changes and broadcast fan-out go through this
//! one structure, shared between session tasks behind a single lock so the
//! name-uniqueness and channel-membership invariants hold under any
//! interleaving of handshakes, relays, and disconnects.

use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};

/// Sending side of one client's bounded outbound queue, drained by that
/// client's writer task.
pub type OutboundChannel = mpsc::Sender<String>;

/// Registry handle shared across session tasks
pub type SharedRegistry = Arc<Mutex<Registry>>;

/// Roster of claimed names and registered outbound channels
#[derive(Default)]
pub struct Registry {
    names: HashSet<String>,
    channels: HashMap<SocketAddr, OutboundChannel>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `name` for a client. Returns `false` and leaves the roster
    /// unchanged when the name is already taken. Comparison is exact and
    /// case-sensitive.
    pub fn try_claim(&mut self, name: &str) -> bool {
        if self.names.contains(name) {
            return false;
        }
        self.names.insert(name.to_string());
        true
    }

    /// Removes `name` if present; no-op when absent
    pub fn release_name(&mut self, name: &str) {
        self.names.remove(name);
    }

    /// Adds a client's outbound channel to the broadcast set, replacing any
    /// previous channel registered under the same address.
    pub fn register_channel(&mut self, addr: SocketAddr, channel: OutboundChannel) {
        self.channels.insert(addr, channel);
    }

    /// Removes a client's outbound channel; no-op when absent
    pub fn unregister_channel(&mut self, addr: &SocketAddr) {
        self.channels.remove(addr);
    }

    /// Number of clients currently in the broadcast set
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Queues `line` on every registered channel, the sender's included.
    /// Delivery is best-effort per recipient: a full or closed queue is
    /// skipped without failing the broadcast, and a stale channel stays in
    /// the set until its own handler tears it down.
    pub fn broadcast(&self, line: &str) {
        for (addr, channel) in &self.channels {
            match channel.try_send(line.to_string()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!("Outbound queue full for {}, dropping line", addr);
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!("Outbound queue for {} already closed", addr);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(port: u16) -> SocketAddr {
        format!("127.0.0.1:{}", port).parse().unwrap()
    }

    #[test]
    fn claim_is_exclusive() {
        let mut registry = Registry::new();
        assert!(registry.try_claim("alice"));
        assert!(!registry.try_claim("alice"));
    }

    #[test]
    fn claim_is_case_sensitive() {
        let mut registry = Registry::new();
        assert!(registry.try_claim("alice"));
        assert!(registry.try_claim("Alice"));
        assert!(registry.try_claim(" alice"));
    }

    #[test]
    fn released_name_is_immediately_claimable() {
        let mut registry = Registry::new();
        assert!(registry.try_claim("alice"));
        registry.release_name("alice");
        assert!(registry.try_claim("alice"));
    }

    #[test]
    fn release_of_unknown_name_is_a_noop() {
        let mut registry = Registry::new();
        registry.release_name("ghost");
        assert!(registry.try_claim("ghost"));
    }

    #[test]
    fn broadcast_reaches_every_channel_including_the_sender() {
        let mut registry = Registry::new();
        let (tx_a, mut rx_a) = mpsc::channel(8);
        let (tx_b, mut rx_b) = mpsc::channel(8);
        registry.register_channel(addr(1000), tx_a);
        registry.register_channel(addr(1001), tx_b);

        registry.broadcast("MESSAGE alice: hello");

        assert_eq!(rx_a.try_recv().unwrap(), "MESSAGE alice: hello");
        assert_eq!(rx_b.try_recv().unwrap(), "MESSAGE alice: hello");
    }

    #[test]
    fn unregistered_channel_receives_nothing() {
        let mut registry = Registry::new();
        let (tx_a, mut rx_a) = mpsc::channel(8);
        let (tx_b, mut rx_b) = mpsc::channel(8);
        registry.register_channel(addr(1000), tx_a);
        registry.register_channel(addr(1001), tx_b);
        registry.unregister_channel(&addr(1000));

        registry.broadcast("MESSAGE bob: ping");

        assert!(rx_a.try_recv().is_err());
        assert_eq!(rx_b.try_recv().unwrap(), "MESSAGE bob: ping");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unregister_is_idempotent() {
        let mut registry = Registry::new();
        let (tx, _rx) = mpsc::channel(8);
        registry.register_channel(addr(1000), tx);
        registry.unregister_channel(&addr(1000));
        registry.unregister_channel(&addr(1000));
        assert!(registry.is_empty());
    }

    #[test]
    fn full_queue_does_not_block_other_recipients() {
        let mut registry = Registry::new();
        let (tx_slow, mut rx_slow) = mpsc::channel(1);
        let (tx_live, mut rx_live) = mpsc::channel(8);
        registry.register_channel(addr(1000), tx_slow);
        registry.register_channel(addr(1001), tx_live);

        registry.broadcast("first");
        registry.broadcast("second");

        // The slow recipient lost the overflowing line, the live one got both
        assert_eq!(rx_slow.try_recv().unwrap(), "first");
        assert!(rx_slow.try_recv().is_err());
        assert_eq!(rx_live.try_recv().unwrap(), "first");
        assert_eq!(rx_live.try_recv().unwrap(), "second");
    }

    #[test]
    fn closed_queue_does_not_abort_the_broadcast() {
        let mut registry = Registry::new();
        let (tx_dead, rx_dead) = mpsc::channel(8);
        let (tx_live, mut rx_live) = mpsc::channel(8);
        registry.register_channel(addr(1000), tx_dead);
        registry.register_channel(addr(1001), tx_live);
        drop(rx_dead);

        registry.broadcast("MESSAGE alice: still here");

        assert_eq!(rx_live.try_recv().unwrap(), "MESSAGE alice: still here");
    }
}
