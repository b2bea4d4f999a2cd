//! Error types for the chat relay
//!
//! Defines framing errors, per-recipient delivery errors, connection
//! lifecycle errors, and server/client startup errors.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Errors raised while reading or writing a line frame
#[derive(Debug, Error)]
pub enum FrameError {
    /// Stream reached end-of-input before a full line arrived
    #[error("connection closed by peer")]
    ConnectionClosed,

    /// Any other transport failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame bytes were not valid UTF-8
    #[error("frame is not valid UTF-8")]
    InvalidUtf8,

    /// Frame exceeded the configured maximum length
    #[error("line exceeds maximum length of {max} bytes")]
    LineTooLong { max: usize },
}

impl FrameError {
    /// True when the peer simply went away (EOF), as opposed to a fault
    pub fn is_closed(&self) -> bool {
        matches!(self, FrameError::ConnectionClosed)
    }
}

/// Delivery errors for a single broadcast recipient
///
/// Never propagated to the sender; logged and dropped.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Recipient's outbound queue is at capacity
    #[error("outbound queue full")]
    QueueFull,

    /// Recipient's writer task has already stopped
    #[error("recipient disconnected")]
    Disconnected,

    /// Writing the frame to the socket failed
    #[error("write failed: {0}")]
    Write(#[from] FrameError),
}

/// Connection lifecycle errors
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// Stream failed before a display name line arrived
    #[error("handshake failed: {0}")]
    Handshake(#[source] FrameError),
}

/// Server startup errors
#[derive(Debug, Error)]
pub enum ServerError {
    /// Could not bind the listening socket
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Could not read the bound socket's address
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Interactive client errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Could not reach the server
    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Username missing or blank
    #[error("username is required")]
    UsernameRequired,

    /// Reading local input failed
    #[error("failed to read input: {0}")]
    Input(#[source] std::io::Error),

    /// Writing to local output failed
    #[error("failed to write output: {0}")]
    Output(#[source] std::io::Error),

    /// Framing error on the server connection
    #[error(transparent)]
    Frame(#[from] FrameError),
}
