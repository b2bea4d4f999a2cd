//! Interactive chat client
//!
//! Sends the display name as the first frame, then relays local input lines
//! to the server while printing every frame the server sends. Blank input
//! lines are dropped before they reach the wire.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::codec::{
    line_reader, line_writer, read_line, write_line, LineCodec, LineReader, LineWriter,
};
use crate::config::ClientConfig;
use crate::error::{ClientError, FrameError};

/// Printed when the server ends the session
pub const DISCONNECTED_NOTICE: &str = "Disconnected from server.";

/// A connected, handshaked chat client
pub struct ChatClient<R = OwnedReadHalf, W = OwnedWriteHalf> {
    username: String,
    reader: LineReader<R>,
    writer: LineWriter<W>,
}

impl ChatClient {
    /// Dial the server and send the display name
    pub async fn connect(config: &ClientConfig) -> Result<Self, ClientError> {
        if config.username.trim().is_empty() {
            return Err(ClientError::UsernameRequired);
        }

        let stream = TcpStream::connect(&config.server_addr)
            .await
            .map_err(|source| ClientError::Connect {
                addr: config.server_addr.clone(),
                source,
            })?;
        let (reader, writer) = stream.into_split();

        Self::handshake(reader, writer, &config.username).await
    }
}

impl<R, W> ChatClient<R, W>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    /// Send the display name over an already open stream
    pub async fn handshake(reader: R, writer: W, username: &str) -> Result<Self, ClientError> {
        if username.trim().is_empty() {
            return Err(ClientError::UsernameRequired);
        }

        let mut writer = line_writer(writer);
        write_line(&mut writer, username).await?;
        debug!(username = %username, "Handshake sent");

        Ok(Self {
            username: username.to_string(),
            reader: line_reader(reader, LineCodec::new()),
            writer,
        })
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Relay `input` to the server and server frames to `output`
    ///
    /// Returns when input hits EOF, the server closes the connection, or
    /// `shutdown` is cancelled.
    pub async fn run<I, O>(
        self,
        input: I,
        mut output: O,
        shutdown: CancellationToken,
    ) -> Result<(), ClientError>
    where
        I: AsyncBufRead + Unpin,
        O: AsyncWrite + Unpin,
    {
        let Self {
            mut reader,
            mut writer,
            ..
        } = self;
        let mut lines = input.lines();

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    debug!("Client shutdown requested");
                    return Ok(());
                }

                frame = read_line(&mut reader) => match frame {
                    Ok(text) => print_line(&mut output, &text).await?,
                    Err(e) => return report_disconnect(&mut output, e).await,
                },

                line = lines.next_line() => {
                    let Some(line) = line.map_err(ClientError::Input)? else {
                        debug!("Input closed");
                        return Ok(());
                    };

                    let message = line.trim();
                    if message.is_empty() {
                        continue;
                    }
                    write_line(&mut writer, message).await?;
                }
            }
        }
    }
}

async fn print_line<O>(output: &mut O, text: &str) -> Result<(), ClientError>
where
    O: AsyncWrite + Unpin,
{
    output
        .write_all(format!("{}\n", text).as_bytes())
        .await
        .map_err(ClientError::Output)?;
    output.flush().await.map_err(ClientError::Output)
}

async fn report_disconnect<O>(output: &mut O, reason: FrameError) -> Result<(), ClientError>
where
    O: AsyncWrite + Unpin,
{
    if !reason.is_closed() {
        print_line(output, &format!("Error reading from server: {}", reason)).await?;
    }
    print_line(output, DISCONNECTED_NOTICE).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tokio::io::{duplex, split, BufReader};
    use tokio::time::timeout;

    const WAIT: Duration = Duration::from_secs(2);

    #[tokio::test]
    async fn test_blank_username_rejected() {
        let (near, _far) = duplex(64);
        let (reader, writer) = split(near);
        let result = ChatClient::handshake(reader, writer, "   ").await;
        assert!(matches!(result, Err(ClientError::UsernameRequired)));
    }

    #[tokio::test]
    async fn test_connect_rejects_blank_username_before_dialing() {
        let config = ClientConfig::new("127.0.0.1:1", "");
        assert!(matches!(
            ChatClient::connect(&config).await,
            Err(ClientError::UsernameRequired)
        ));
    }

    #[tokio::test]
    async fn test_empty_lines_never_reach_the_wire() {
        let (near, far) = duplex(1024);
        let (reader, writer) = split(near);
        let client = ChatClient::handshake(reader, writer, "alice").await.unwrap();
        assert_eq!(client.username(), "alice");

        let input: &[u8] = b"hello\n\n   \n\t\n  world  \n";
        let mut output = Vec::new();
        timeout(WAIT, client.run(input, &mut output, CancellationToken::new()))
            .await
            .unwrap()
            .unwrap();

        let mut server = line_reader(far, LineCodec::new());
        assert_eq!(read_line(&mut server).await.unwrap(), "alice");
        assert_eq!(read_line(&mut server).await.unwrap(), "hello");
        assert_eq!(read_line(&mut server).await.unwrap(), "world");
        assert!(read_line(&mut server).await.unwrap_err().is_closed());
    }

    #[tokio::test]
    async fn test_prints_server_frames_until_disconnect() {
        let (near, far) = duplex(1024);
        let (reader, writer) = split(near);
        let client = ChatClient::handshake(reader, writer, "bob").await.unwrap();

        // Keep the input side open so only the server can end the session
        let (_input_tx, input_rx) = duplex(64);
        let mut output = Vec::new();

        let (server_read, server_write) = split(far);
        let mut server_writer = line_writer(server_write);
        write_line(&mut server_writer, "* alice has joined the chat").await.unwrap();
        write_line(&mut server_writer, "[alice]: hi bob").await.unwrap();
        drop(server_writer);
        drop(server_read);

        timeout(
            WAIT,
            client.run(BufReader::new(input_rx), &mut output, CancellationToken::new()),
        )
        .await
        .unwrap()
        .unwrap();

        let printed = String::from_utf8(output).unwrap();
        assert_eq!(
            printed,
            "* alice has joined the chat\n[alice]: hi bob\nDisconnected from server.\n"
        );
    }

    #[tokio::test]
    async fn test_run_stops_on_cancel() {
        let (near, _far) = duplex(1024);
        let (reader, writer) = split(near);
        let client = ChatClient::handshake(reader, writer, "carol").await.unwrap();

        let (_input_tx, input_rx) = duplex(64);
        let shutdown = CancellationToken::new();
        shutdown.cancel();

        let mut output = Vec::new();
        timeout(WAIT, client.run(BufReader::new(input_rx), &mut output, shutdown))
            .await
            .unwrap()
            .unwrap();
        assert!(output.is_empty());
    }
}
