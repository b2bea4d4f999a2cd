//! Chat Relay Server - Entry Point
//!
//! Parses flags, starts the TCP listener, and runs the accept loop until
//! SIGINT or SIGTERM.

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use chat_relay::config::{DEFAULT_PORT, DEFAULT_QUEUE_CAPACITY};
use chat_relay::codec::DEFAULT_MAX_LINE_LENGTH;
use chat_relay::{ChatServer, ServerConfig};

/// Line-oriented TCP chat relay
#[derive(Parser, Debug)]
#[command(name = "chat-relay", version, about)]
struct Args {
    /// Interface to listen on
    #[arg(long, env = "CHAT_RELAY_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "CHAT_RELAY_PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Longest accepted line in bytes (0 = unlimited)
    #[arg(long, env = "CHAT_RELAY_MAX_LINE", default_value_t = DEFAULT_MAX_LINE_LENGTH)]
    max_line_length: usize,

    /// Frames buffered per client before new ones are dropped
    #[arg(long, env = "CHAT_RELAY_QUEUE", default_value_t = DEFAULT_QUEUE_CAPACITY)]
    queue_capacity: usize,
}

impl Args {
    fn into_config(self) -> ServerConfig {
        ServerConfig {
            listen_addr: format!("{}:{}", self.host, self.port),
            max_line_length: (self.max_line_length > 0).then_some(self.max_line_length),
            outbound_queue_capacity: self.queue_capacity,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Use RUST_LOG env var to control log level
    // e.g., RUST_LOG=debug or RUST_LOG=chat_relay=trace
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chat_relay=info")),
        )
        .init();

    let config = Args::parse().into_config();

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if let Err(e) = wait_for_shutdown_signal().await {
            error!(error = %e, "Error waiting for shutdown signal");
        }
        signal_token.cancel();
    });

    let server = ChatServer::bind(config, shutdown).await?;
    server.run().await;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for SIGTERM or SIGINT
async fn wait_for_shutdown_signal() -> Result<()> {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = signal(SignalKind::terminate())?;
        let mut sigint = signal(SignalKind::interrupt())?;

        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down"),
            _ = sigint.recv() => info!("Received SIGINT, shutting down"),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::signal::ctrl_c().await?;
        info!("Received Ctrl+C, shutting down");
    }

    Ok(())
}
