//! Basic type definitions for the chat relay
//!
//! Provides newtype wrappers for type safety:
//! - `ParticipantId`: identity derived from the peer's socket address

use std::net::SocketAddr;

/// Unique participant identifier (newtype pattern)
///
/// Wraps the remote endpoint of the TCP connection. Two live connections
/// never share a remote endpoint, so this is unique per live participant.
/// Implements Hash and Eq for use as HashMap keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParticipantId(pub SocketAddr);

impl ParticipantId {
    /// Create an ID from a peer address
    pub fn new(addr: SocketAddr) -> Self {
        Self(addr)
    }
}

impl From<SocketAddr> for ParticipantId {
    fn from(addr: SocketAddr) -> Self {
        Self(addr)
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_id_display() {
        let id = ParticipantId::new("127.0.0.1:4000".parse().unwrap());
        assert_eq!(id.to_string(), "127.0.0.1:4000");
    }

    #[test]
    fn test_participant_id_distinct_ports() {
        let a = ParticipantId::from("127.0.0.1:4000".parse::<SocketAddr>().unwrap());
        let b = ParticipantId::from("127.0.0.1:4001".parse::<SocketAddr>().unwrap());
        assert_ne!(a, b);
        assert_eq!(a, ParticipantId::new(a.0));
    }
}
