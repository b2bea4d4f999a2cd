//! ChatServer implementation
//!
//! Owns the listening socket and the shared registry, accepts connections,
//! and spawns one handler task per client. Shutdown is driven by a
//! `CancellationToken`: once cancelled the accept loop stops and the listener
//! is closed. Connections that are already active keep running.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::{TcpListener, TcpStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::broadcast::Broadcaster;
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::handler::handle_connection;
use crate::registry::Registry;

/// The chat relay server
pub struct ChatServer {
    /// Bound listening socket
    listener: TcpListener,
    /// Fan-out over the shared registry
    broadcaster: Broadcaster,
    /// Settings shared with every connection task
    config: Arc<ServerConfig>,
    /// Process-wide shutdown signal
    shutdown: CancellationToken,
}

impl ChatServer {
    /// Bind the listening socket
    pub async fn bind(
        config: ServerConfig,
        shutdown: CancellationToken,
    ) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(&config.listen_addr)
            .await
            .map_err(|source| ServerError::Bind {
                addr: config.listen_addr.clone(),
                source,
            })?;

        let registry = Arc::new(Registry::new());

        Ok(Self {
            listener,
            broadcaster: Broadcaster::new(registry),
            config: Arc::new(config),
            shutdown,
        })
    }

    /// Address the listener is actually bound to
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Shared participant registry
    pub fn registry(&self) -> Arc<Registry> {
        Arc::clone(self.broadcaster.registry())
    }

    /// Run the accept loop until the shutdown token is cancelled
    ///
    /// Accept failures are logged and the loop keeps going; cancellation is
    /// the only way out and is treated as a clean stop.
    pub async fn run(self) {
        match self.listener.local_addr() {
            Ok(addr) => info!(addr = %addr, "Chat relay listening"),
            Err(e) => debug!(error = %e, "Could not read listener address"),
        }

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown.cancelled() => {
                    info!("Shutdown requested, closing listener");
                    break;
                }

                result = self.listener.accept() => {
                    match result {
                        Ok((stream, peer_addr)) => self.spawn_connection(stream, peer_addr),
                        Err(e) => {
                            error!(error = %e, "Failed to accept connection");
                        }
                    }
                }
            }
        }

        drop(self.listener);
        info!("Chat relay stopped accepting connections");
    }

    /// Spawn the handler task for an accepted connection
    fn spawn_connection(&self, stream: TcpStream, peer_addr: SocketAddr) {
        debug!(peer = %peer_addr, "New TCP connection");

        let broadcaster = self.broadcaster.clone();
        let config = Arc::clone(&self.config);

        tokio::spawn(async move {
            if let Err(e) = handle_connection(stream, peer_addr, broadcaster, &config).await {
                debug!(peer = %peer_addr, error = %e, "Connection discarded");
            }
        });
    }
}
