//! TCP connection handler
//!
//! Runs one connection through its whole lifecycle:
//!
//! ```text
//! Connecting → Handshaking → Active → Closing → Closed
//! ```
//!
//! - Handshaking: the first line is the display name. If the stream fails
//!   first, the connection is dropped with no registry entry and no
//!   announcement.
//! - Active: the participant is registered, "joined" is announced to everyone
//!   else, and every line read is relayed as `[name]: text`.
//! - Closing: any read failure unregisters the participant and announces
//!   "left", once.
//! - Closed: the writer task is stopped, frames still queued are discarded,
//!   and both halves of the transport are closed.

use std::fmt;
use std::net::SocketAddr;

use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::broadcast::Broadcaster;
use crate::codec::{line_reader, read_line, LineCodec, LineReader};
use crate::config::ServerConfig;
use crate::error::{ConnectionError, FrameError};
use crate::message::ServerMessage;
use crate::participant::Participant;
use crate::types::ParticipantId;

/// Lifecycle states of a single connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Handshaking,
    Active,
    Closing,
    Closed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Handshaking => "handshaking",
            ConnectionState::Active => "active",
            ConnectionState::Closing => "closing",
            ConnectionState::Closed => "closed",
        };
        f.write_str(name)
    }
}

fn enter(id: ParticipantId, state: ConnectionState) {
    debug!(participant = %id, state = %state, "Connection state changed");
}

/// Handle an accepted TCP connection
///
/// Splits the stream and runs the lifecycle. Returns an error only when the
/// handshake fails; faults after that end the connection normally.
pub async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    broadcaster: Broadcaster,
    config: &ServerConfig,
) -> Result<(), ConnectionError> {
    let (reader, writer) = stream.into_split();
    serve(reader, writer, ParticipantId::new(peer_addr), broadcaster, config).await
}

/// Run the connection lifecycle over any split byte stream
pub async fn serve<R, W>(
    reader: R,
    writer: W,
    id: ParticipantId,
    broadcaster: Broadcaster,
    config: &ServerConfig,
) -> Result<(), ConnectionError>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    enter(id, ConnectionState::Connecting);
    let mut reader = line_reader(reader, LineCodec::with_limit(config.max_line_length));

    enter(id, ConnectionState::Handshaking);
    let display_name = read_line(&mut reader)
        .await
        .map_err(ConnectionError::Handshake)?;

    enter(id, ConnectionState::Active);
    let (participant, writer_task) = Participant::spawn(
        id,
        display_name.clone(),
        writer,
        config.outbound_queue_capacity,
    );

    let registry = broadcaster.registry();
    if let Some(stale) = registry.add(participant).await {
        warn!(participant = %id, name = %stale.display_name, "Replaced stale registry entry");
    }
    info!(participant = %id, name = %display_name, "Client connected");

    broadcaster
        .send_message(&ServerMessage::joined(&display_name), Some(&id))
        .await;

    let reason = relay_lines(&mut reader, id, &display_name, &broadcaster).await;

    enter(id, ConnectionState::Closing);
    if reason.is_closed() {
        info!(participant = %id, name = %display_name, "Client disconnected");
    } else {
        warn!(
            participant = %id,
            name = %display_name,
            error = %reason,
            "Error reading from client"
        );
    }

    let removed = registry.remove(&id).await.is_some();
    writer_task.close().await;
    if removed {
        broadcaster
            .send_message(&ServerMessage::left(&display_name), Some(&id))
            .await;
    }

    enter(id, ConnectionState::Closed);
    Ok(())
}

/// Relay every line from the client until the first read failure
async fn relay_lines<R>(
    reader: &mut LineReader<R>,
    id: ParticipantId,
    display_name: &str,
    broadcaster: &Broadcaster,
) -> FrameError
where
    R: AsyncRead + Unpin,
{
    loop {
        match read_line(reader).await {
            Ok(text) => {
                debug!(participant = %id, name = %display_name, text = %text, "Message received");
                broadcaster
                    .send_message(&ServerMessage::chat(display_name, text), Some(&id))
                    .await;
            }
            Err(e) => return e,
        }
    }
}
