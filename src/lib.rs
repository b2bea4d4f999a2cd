//! Line-Oriented TCP Chat Relay Library
//!
//! A small chat relay built on tokio: clients connect over TCP, send a
//! display name as their first line, and every line they send afterwards is
//! relayed to everyone else.
//!
//! # Wire Protocol
//! Newline-delimited UTF-8 text, no escaping:
//! - Client → Server, first frame: `<displayName>`
//! - Client → Server, later frames: `<message text>`
//! - Server → Client: `* <name> has joined the chat`, `* <name> has left the chat`
//! - Server → Client: `[<name>]: <message text>`
//!
//! # Architecture
//! - `Registry` is the only shared state: an `RwLock`ed map where broadcasts
//!   take the read lock and connect/disconnect take the write lock
//! - Each connection runs a `handler` task (handshake, relay loop, cleanup)
//! - Each participant has one writer task draining a bounded queue, so
//!   writes to a participant never interleave and stay in order
//! - `Broadcaster` pushes onto recipients' queues without waiting
//!
//! # Example
//! ```ignore
//! use chat_relay::{ChatServer, ServerConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let shutdown = CancellationToken::new();
//!     let server = ChatServer::bind(ServerConfig::new("127.0.0.1:1234"), shutdown).await?;
//!     server.run().await;
//!     Ok(())
//! }
//! ```

pub mod broadcast;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod handler;
pub mod message;
pub mod participant;
pub mod registry;
pub mod server;
pub mod types;

// Re-export main types for convenience
pub use broadcast::Broadcaster;
pub use client::ChatClient;
pub use codec::{read_line, write_line, LineCodec};
pub use config::{ClientConfig, ServerConfig};
pub use error::{ClientError, ConnectionError, DeliveryError, FrameError, ServerError};
pub use handler::{handle_connection, ConnectionState};
pub use message::ServerMessage;
pub use participant::{Participant, WriterTask};
pub use registry::Registry;
pub use server::ChatServer;
pub use types::ParticipantId;
