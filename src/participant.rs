//! Participant struct definition
//!
//! Represents a handshaked connection: its identity, display name, and the
//! outbound path to its socket.

use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::codec::{line_writer, write_line};
use crate::error::DeliveryError;
use crate::types::ParticipantId;

/// Connected participant
///
/// The outbound side is a bounded queue drained by a single writer task,
/// which owns the socket's write half. Every frame for this participant goes
/// through that one queue, so writes are serialized and FIFO.
#[derive(Debug)]
pub struct Participant {
    /// Unique identifier for this participant
    pub id: ParticipantId,
    /// Name supplied in the handshake
    pub display_name: String,
    /// Server → Client frame queue
    sender: mpsc::Sender<String>,
}

/// Handle to a participant's writer task
#[derive(Debug)]
pub struct WriterTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl WriterTask {
    /// Stop the writer and wait for it to release the write half
    ///
    /// Frames still queued are discarded and a write blocked on a peer that
    /// is not reading is abandoned.
    pub async fn close(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            warn!(error = %e, "Writer task failed");
        }
    }
}

impl Participant {
    /// Create a participant around an existing outbound queue
    pub fn new(id: ParticipantId, display_name: String, sender: mpsc::Sender<String>) -> Self {
        Self {
            id,
            display_name,
            sender,
        }
    }

    /// Create a participant and spawn the writer task that owns `writer`
    ///
    /// The writer task ends when it is closed, when the participant is
    /// dropped and the queue is drained, or on the first write failure.
    pub fn spawn<W>(
        id: ParticipantId,
        display_name: String,
        writer: W,
        queue_capacity: usize,
    ) -> (Self, WriterTask)
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel(queue_capacity.max(1));
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_writer(id, receiver, writer, cancel.clone()));
        (Self::new(id, display_name, sender), WriterTask { cancel, handle })
    }

    /// Queue a frame for this participant without waiting
    ///
    /// Returns an error if the queue is full or the writer has stopped.
    pub fn send(&self, text: impl Into<String>) -> Result<(), DeliveryError> {
        self.sender.try_send(text.into()).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => DeliveryError::QueueFull,
            mpsc::error::TrySendError::Closed(_) => DeliveryError::Disconnected,
        })
    }
}

/// Drain the outbound queue into the socket, one flushed frame at a time
async fn run_writer<W>(
    id: ParticipantId,
    mut receiver: mpsc::Receiver<String>,
    writer: W,
    cancel: CancellationToken,
) where
    W: AsyncWrite + Unpin,
{
    let mut writer = line_writer(writer);

    loop {
        let text = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            next = receiver.recv() => match next {
                Some(text) => text,
                None => break,
            },
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = write_line(&mut writer, &text) => {
                if let Err(e) = result {
                    let err = DeliveryError::from(e);
                    warn!(participant = %id, error = %err, "Failed to deliver frame");
                    break;
                }
            }
        }
    }

    let _ = writer.get_mut().shutdown().await;
    debug!(participant = %id, "Writer task ended");
}
