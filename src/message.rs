//! Message protocol definitions
//!
//! Server → client frames and their exact wire text. Client → server frames
//! carry no structure (the first is a display name, the rest raw text), so
//! only the outbound side is typed.

use std::fmt;

/// Server → Client message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// A participant completed the handshake
    Joined { username: String },
    /// A participant disconnected
    Left { username: String },
    /// Relayed chat line
    Chat { from: String, content: String },
}

impl ServerMessage {
    pub fn joined(username: impl Into<String>) -> Self {
        Self::Joined {
            username: username.into(),
        }
    }

    pub fn left(username: impl Into<String>) -> Self {
        Self::Left {
            username: username.into(),
        }
    }

    pub fn chat(from: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Chat {
            from: from.into(),
            content: content.into(),
        }
    }
}

/// Renders the frame text without the trailing delimiter
impl fmt::Display for ServerMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerMessage::Joined { username } => write!(f, "* {} has joined the chat", username),
            ServerMessage::Left { username } => write!(f, "* {} has left the chat", username),
            ServerMessage::Chat { from, content } => write!(f, "[{}]: {}", from, content),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_announcement_text() {
        assert_eq!(
            ServerMessage::joined("alice").to_string(),
            "* alice has joined the chat"
        );
        assert_eq!(
            ServerMessage::left("alice").to_string(),
            "* alice has left the chat"
        );
    }

    #[test]
    fn test_chat_text_is_verbatim() {
        let msg = ServerMessage::chat("bob", "  spaced [out]: text ");
        assert_eq!(msg.to_string(), "[bob]:   spaced [out]: text ");
    }

    #[test]
    fn test_empty_name_still_formats() {
        assert_eq!(ServerMessage::chat("", "x").to_string(), "[]: x");
    }
}
