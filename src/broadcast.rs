//! Broadcast engine
//!
//! Fans one frame out to every registered participant except the sender.
//! Each recipient gets an independent, fire-and-forget delivery: the frame is
//! pushed onto that participant's outbound queue and its writer task does the
//! write. The caller never waits on a socket.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::error::DeliveryError;
use crate::message::ServerMessage;
use crate::registry::Registry;
use crate::types::ParticipantId;

/// Delivers frames to the participants in a shared registry
#[derive(Debug, Clone)]
pub struct Broadcaster {
    registry: Arc<Registry>,
}

impl Broadcaster {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Deliver `text` to everyone except `exclude`
    ///
    /// Per-recipient failures are logged and skipped; they never abort the
    /// fan-out or remove the recipient. Returns how many recipients accepted
    /// the frame.
    pub async fn broadcast(&self, text: &str, exclude: Option<&ParticipantId>) -> usize {
        let mut delivered = 0;

        self.registry
            .for_each(
                |participant| match participant.send(text) {
                    Ok(()) => delivered += 1,
                    Err(DeliveryError::Disconnected) => {
                        debug!(participant = %participant.id, "Skipping closed recipient");
                    }
                    Err(e) => {
                        warn!(
                            participant = %participant.id,
                            error = %e,
                            "Dropped frame for recipient"
                        );
                    }
                },
                exclude,
            )
            .await;

        trace!(recipients = delivered, "Broadcast dispatched");
        delivered
    }

    /// Render and deliver a server message
    pub async fn send_message(
        &self,
        msg: &ServerMessage,
        exclude: Option<&ParticipantId>,
    ) -> usize {
        self.broadcast(&msg.to_string(), exclude).await
    }
}
