//! Module `session::handler`
//!
//! Drives one client connection through the handshake and relay loop using
//! the Tokio async runtime.
//!
//! - Uses BufReader to read lines from the client's read half.
//! - A dedicated writer task owns the write half and drains this client's
//!   bounded outbound queue, so a slow or dead peer can only stall its own
//!   session, never a broadcaster or another recipient.
//! - All exit paths funnel into one teardown call, so name release and
//!   channel removal run exactly once.

use log::{debug, info, warn};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::mpsc;
use tokio::time::timeout;

use crate::config::RelayConfig;
use crate::protocol;
use crate::registry::SharedRegistry;
use crate::session::state::Session;

/// Runs one client connection from accept to teardown.
pub async fn handle_session(
    stream: TcpStream,
    addr: SocketAddr,
    registry: SharedRegistry,
    config: Arc<RelayConfig>,
) {
    let (read_half, write_half) = stream.into_split();
    let (outbound, outbound_rx) = mpsc::channel(config.outbound_queue_depth);
    let writer = tokio::spawn(drain_outbound(outbound_rx, write_half, addr));

    let mut session = Session::new(addr);
    match run_session(read_half, &outbound, &mut session, &registry, &config).await {
        Ok(()) => info!("Connection closed by {}", addr),
        Err(e) => warn!("I/O fault on {}: {}", addr, e),
    }

    session.teardown(&registry).await;

    // With the roster entry gone this is the last queue sender; dropping it
    // ends the writer task, which closes the socket.
    drop(outbound);
    let _ = writer.await;
}

/// Handshake then relay loop. Returns on end-of-stream, idle expiry, or an
/// I/O error; the caller owns teardown.
async fn run_session(
    read_half: OwnedReadHalf,
    outbound: &mpsc::Sender<String>,
    session: &mut Session,
    registry: &SharedRegistry,
    config: &RelayConfig,
) -> io::Result<()> {
    let mut reader = BufReader::new(read_half);
    let mut line = String::new();

    // Name negotiation: prompt, read a candidate, claim it atomically.
    // Unbounded attempts, first free name wins.
    let name = loop {
        send_line(outbound, protocol::NAME_REQUEST).await?;

        match read_chat_line(&mut reader, &mut line, config.idle_timeout()).await? {
            // Peer left before naming itself; nothing was claimed
            None => return Ok(()),
            Some(candidate) => {
                if registry.lock().await.try_claim(candidate) {
                    break candidate.to_string();
                }
                debug!(
                    "Name {:?} already claimed, re-prompting {}",
                    candidate,
                    session.addr()
                );
            }
        }
    };
    session.set_name(name.clone());

    // Queue the acknowledgment and enter the broadcast set under one lock:
    // the client sees ACCEPTED ahead of any relayed line, and every
    // broadcast after the lock releases reaches this client. The queue is
    // all but empty here, so the non-blocking send only fails if the
    // writer is gone or the peer stopped reading its prompts.
    {
        let mut roster = registry.lock().await;
        outbound
            .try_send(protocol::ACCEPTED.to_string())
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "outbound writer is gone"))?;
        roster.register_channel(session.addr(), outbound.clone());
        session.mark_registered();
        info!(
            "Client {} joined as {:?} ({} connected)",
            session.addr(),
            name,
            roster.len()
        );
    }

    // Relay loop: every line fans out to all registered channels, the
    // sender's own included.
    loop {
        match read_chat_line(&mut reader, &mut line, config.idle_timeout()).await? {
            None => return Ok(()),
            Some(text) => {
                let message = protocol::chat_message(&name, text);
                registry.lock().await.broadcast(&message);
            }
        }
    }
}

/// Reads one line into `line`, returning it without its terminator, or
/// `None` on end-of-stream. An idle expiry ends the session the same way a
/// disconnect does. Only the terminator is stripped; names and message
/// bodies are never trimmed or normalized.
async fn read_chat_line<'a>(
    reader: &mut BufReader<OwnedReadHalf>,
    line: &'a mut String,
    idle_timeout: Option<Duration>,
) -> io::Result<Option<&'a str>> {
    line.clear();
    let n = match idle_timeout {
        Some(limit) => match timeout(limit, reader.read_line(line)).await {
            Ok(read) => read?,
            Err(_elapsed) => {
                debug!("Idle timeout expired, closing session");
                0
            }
        },
        None => reader.read_line(line).await?,
    };
    if n == 0 {
        return Ok(None);
    }

    let text = line.as_str();
    let text = text.strip_suffix('\n').unwrap_or(text);
    let text = text.strip_suffix('\r').unwrap_or(text);
    Ok(Some(text))
}

/// Queues one protocol line on this session's own outbound channel.
async fn send_line(outbound: &mpsc::Sender<String>, line: &str) -> io::Result<()> {
    outbound
        .send(line.to_string())
        .await
        .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "outbound writer is gone"))
}

/// Writer task for one client: drains the outbound queue onto the socket.
/// Exits when the queue closes or a write fails; the session's read loop
/// observes the broken socket on its next read and tears everything down.
async fn drain_outbound(
    mut outbound_rx: mpsc::Receiver<String>,
    mut write_half: OwnedWriteHalf,
    addr: SocketAddr,
) {
    while let Some(line) = outbound_rx.recv().await {
        let framed = format!("{}\n", line);
        if let Err(e) = write_half.write_all(framed.as_bytes()).await {
            debug!("Stopping writer for {}: {}", addr, e);
            break;
        }
    }
}
