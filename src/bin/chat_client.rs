//! Chat Relay Client - Entry Point
//!
//! Connects to a chat relay, sends the username, and relays stdin lines
//! until Ctrl+D, Ctrl+C, or the server goes away.

use std::process;

use clap::Parser;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use chat_relay::config::DEFAULT_PORT;
use chat_relay::{ChatClient, ClientConfig};

/// Interactive client for the chat relay
#[derive(Parser, Debug)]
#[command(name = "chat-client", version, about)]
struct Args {
    /// Server host
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Server port
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Your display name
    #[arg(short, long)]
    username: String,
}

#[tokio::main]
async fn main() {
    // Quiet by default so log lines don't mix with the chat
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("chat_relay=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = ClientConfig::new(format!("{}:{}", args.host, args.port), args.username);

    println!("Connecting to {}...", config.server_addr);
    let client = match ChatClient::connect(&config).await {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    println!("Connected to chat server. Type your messages and press Enter to send.");
    println!("Press Ctrl+C to exit.");

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\nDisconnecting from server...");
            signal_token.cancel();
        }
    });

    let stdin = BufReader::new(tokio::io::stdin());
    let code = match client.run(stdin, tokio::io::stdout(), shutdown).await {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Client error: {}", e);
            1
        }
    };

    println!("Client disconnected");
    // Exit explicitly: the blocking stdin reader would otherwise hold the runtime open
    process::exit(code);
}
