//! Runtime configuration
//!
//! Plain structs with defaults; the binaries fill them in from CLI flags and
//! environment variables.

use crate::codec::DEFAULT_MAX_LINE_LENGTH;

/// Default TCP port, shared by server and client
pub const DEFAULT_PORT: u16 = 1234;

/// Default per-participant outbound queue capacity (frames)
pub const DEFAULT_QUEUE_CAPACITY: usize = 256;

/// Server settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address (`host:port`)
    pub listen_addr: String,
    /// Longest accepted inbound frame in bytes; None = unlimited
    pub max_line_length: Option<usize>,
    /// Frames buffered per participant before new ones are dropped
    pub outbound_queue_capacity: usize,
}

impl ServerConfig {
    pub fn new(listen_addr: impl Into<String>) -> Self {
        Self {
            listen_addr: listen_addr.into(),
            ..Self::default()
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: format!("0.0.0.0:{}", DEFAULT_PORT),
            max_line_length: Some(DEFAULT_MAX_LINE_LENGTH),
            outbound_queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

/// Client settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Server address (`host:port`)
    pub server_addr: String,
    /// Display name sent in the handshake
    pub username: String,
}

impl ClientConfig {
    pub fn new(server_addr: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            server_addr: server_addr.into(),
            username: username.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.listen_addr, "0.0.0.0:1234");
        assert_eq!(config.max_line_length, Some(DEFAULT_MAX_LINE_LENGTH));
        assert_eq!(config.outbound_queue_capacity, DEFAULT_QUEUE_CAPACITY);
    }

    #[test]
    fn test_server_new_keeps_other_defaults() {
        let config = ServerConfig::new("127.0.0.1:0");
        assert_eq!(config.listen_addr, "127.0.0.1:0");
        assert_eq!(config.outbound_queue_capacity, DEFAULT_QUEUE_CAPACITY);
    }
}
