//! Connection framer
//!
//! Newline-delimited text frames over a byte stream. A frame is everything up
//! to a single `\n`; the delimiter is stripped on read and appended on write.
//! Only `\n` is a delimiter, so a `\r` sent by the peer stays in the text.
//!
//! `LineCodec` plugs into tokio-util's `FramedRead`/`FramedWrite`; the
//! `read_line`/`write_line` helpers give the connection code a plain
//! request/response shape on top of the stream/sink.

use bytes::BytesMut;
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{Decoder, Encoder, FramedRead, FramedWrite};

use crate::error::FrameError;

/// Default upper bound on a single frame (64 KiB)
pub const DEFAULT_MAX_LINE_LENGTH: usize = 64 * 1024;

/// Read half of a framed connection
pub type LineReader<R> = FramedRead<R, LineCodec>;

/// Write half of a framed connection
pub type LineWriter<W> = FramedWrite<W, LineCodec>;

/// Newline-delimited UTF-8 codec
///
/// Unlike tokio-util's `LinesCodec`, a partial line left in the buffer at EOF
/// is discarded instead of being yielded as a final frame.
#[derive(Debug, Clone, Default)]
pub struct LineCodec {
    /// Maximum frame length in bytes (excluding the delimiter); None = unlimited
    max_length: Option<usize>,
    /// Buffer offset already scanned for a delimiter
    next_index: usize,
}

impl LineCodec {
    /// Create a codec with no length limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a codec that rejects frames longer than `max_length` bytes
    pub fn with_max_length(max_length: usize) -> Self {
        Self {
            max_length: Some(max_length),
            next_index: 0,
        }
    }

    /// Create a codec from an optional limit
    pub fn with_limit(max_length: Option<usize>) -> Self {
        Self {
            max_length,
            next_index: 0,
        }
    }

    fn check_length(&self, len: usize) -> Result<(), FrameError> {
        match self.max_length {
            Some(max) if len > max => Err(FrameError::LineTooLong { max }),
            _ => Ok(()),
        }
    }
}

impl Decoder for LineCodec {
    type Item = String;
    type Error = FrameError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<String>, FrameError> {
        let newline = buf[self.next_index..].iter().position(|b| *b == b'\n');

        let Some(offset) = newline else {
            self.check_length(buf.len())?;
            self.next_index = buf.len();
            return Ok(None);
        };

        let end = self.next_index + offset;
        self.next_index = 0;

        let mut frame = buf.split_to(end + 1);
        frame.truncate(end);
        self.check_length(frame.len())?;

        String::from_utf8(frame.to_vec())
            .map(Some)
            .map_err(|_| FrameError::InvalidUtf8)
    }

    fn decode_eof(&mut self, buf: &mut BytesMut) -> Result<Option<String>, FrameError> {
        if let Some(line) = self.decode(buf)? {
            return Ok(Some(line));
        }

        // Trailing bytes without a delimiter never form a frame
        buf.clear();
        self.next_index = 0;
        Ok(None)
    }
}

impl<T: AsRef<str>> Encoder<T> for LineCodec {
    type Error = FrameError;

    fn encode(&mut self, line: T, buf: &mut BytesMut) -> Result<(), FrameError> {
        let line = line.as_ref();
        buf.reserve(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.extend_from_slice(b"\n");
        Ok(())
    }
}

/// Wrap a read half in a line reader
pub fn line_reader<R: AsyncRead>(inner: R, codec: LineCodec) -> LineReader<R> {
    FramedRead::new(inner, codec)
}

/// Wrap a write half in a line writer
pub fn line_writer<W: AsyncWrite>(inner: W) -> LineWriter<W> {
    FramedWrite::new(inner, LineCodec::new())
}

/// Read the next frame
///
/// Returns `FrameError::ConnectionClosed` once the stream ends without
/// another complete line.
pub async fn read_line<R>(reader: &mut LineReader<R>) -> Result<String, FrameError>
where
    R: AsyncRead + Unpin,
{
    reader
        .next()
        .await
        .unwrap_or(Err(FrameError::ConnectionClosed))
}

/// Write one frame and flush it before returning
pub async fn write_line<W>(writer: &mut LineWriter<W>, text: &str) -> Result<(), FrameError>
where
    W: AsyncWrite + Unpin,
{
    writer.send(text).await
}
