//! Line-delimited JSON over a byte stream pair.
//!
//! Each JSON-RPC message is a single line terminated by `\n`. Reading and
//! writing are split into two halves so that responses produced by
//! concurrently running requests can be funnelled through one writer task
//! while the read loop keeps consuming input.

use log::trace;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

/// Errors from the stdio transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Failed to read from the input stream.
    #[error("read error: {0}")]
    Read(String),
    /// Failed to write to the output stream.
    #[error("write error: {0}")]
    Write(String),
    /// The writer task ended abnormally.
    #[error("writer task failed: {0}")]
    Writer(String),
}

/// One line of input.
#[derive(Debug, PartialEq)]
pub enum InputLine {
    /// A UTF-8 line, trimmed of surrounding whitespace.
    Text(String),
    /// A line whose bytes are not valid UTF-8. The stream stays usable.
    NotUtf8(std::string::FromUtf8Error),
}

/// Reading half: yields one line at a time.
pub struct LineReader<R> {
    reader: BufReader<R>,
}

impl<R: AsyncRead + Unpin> LineReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
        }
    }

    /// Reads the next line from the input stream.
    ///
    /// Returns `None` on EOF. Blank lines come back as empty text. A line
    /// that is not UTF-8 is consumed up to its `\n` and reported as
    /// [`InputLine::NotUtf8`].
    pub async fn read_line(&mut self) -> Result<Option<InputLine>, TransportError> {
        let mut bytes = Vec::new();
        let bytes_read = self
            .reader
            .read_until(b'\n', &mut bytes)
            .await
            .map_err(|e| TransportError::Read(e.to_string()))?;

        if bytes_read == 0 {
            return Ok(None);
        }

        trace!("read message ({} bytes)", bytes_read);
        let line = match String::from_utf8(bytes) {
            Ok(line) => InputLine::Text(line.trim().to_string()),
            Err(e) => InputLine::NotUtf8(e),
        };
        Ok(Some(line))
    }
}

/// Writing half: appends a newline and flushes after every message.
pub struct LineWriter<W> {
    writer: W,
}

impl<W: AsyncWrite + Unpin> LineWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes one message line to the output stream.
    pub async fn write_line(&mut self, message: &str) -> Result<(), TransportError> {
        trace!("writing message ({} bytes)", message.len());

        let write = |e: std::io::Error| TransportError::Write(e.to_string());
        self.writer.write_all(message.as_bytes()).await.map_err(write)?;
        self.writer.write_all(b"\n").await.map_err(write)?;
        self.writer.flush().await.map_err(write)
    }

    /// Write every line received on `outgoing` until all senders are gone.
    pub async fn drain(
        mut self,
        mut outgoing: mpsc::UnboundedReceiver<String>,
    ) -> Result<(), TransportError> {
        while let Some(line) = outgoing.recv().await {
            self.write_line(&line).await?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn text(line: &str) -> Option<InputLine> {
        Some(InputLine::Text(line.to_string()))
    }

    #[tokio::test]
    async fn test_read_multiple_lines() {
        let mut reader = LineReader::new(Cursor::new(b"line1\n\n  line3 \n".to_vec()));

        assert_eq!(reader.read_line().await.unwrap(), text("line1"));
        assert_eq!(reader.read_line().await.unwrap(), text(""));
        assert_eq!(reader.read_line().await.unwrap(), text("line3"));
        assert_eq!(reader.read_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_read_past_invalid_utf8() {
        let mut reader = LineReader::new(Cursor::new(b"{\"x\":\"\xff\"}\n{\"ok\":1}\n".to_vec()));

        match reader.read_line().await.unwrap() {
            Some(InputLine::NotUtf8(e)) => assert_eq!(e.as_bytes(), b"{\"x\":\"\xff\"}\n"),
            other => panic!("expected a non-UTF-8 line, got {:?}", other),
        }
        assert_eq!(reader.read_line().await.unwrap(), text("{\"ok\":1}"));
        assert_eq!(reader.read_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_read_last_line_without_newline() {
        let mut reader = LineReader::new(Cursor::new(b"tail".to_vec()));

        assert_eq!(reader.read_line().await.unwrap(), text("tail"));
        assert_eq!(reader.read_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_read_from_scripted_stream() {
        let stream = tokio_test::io::Builder::new()
            .read(b"{\"jsonrpc\":")
            .read(b"\"2.0\"}\n")
            .build();
        let mut reader = LineReader::new(stream);

        assert_eq!(
            reader.read_line().await.unwrap(),
            text("{\"jsonrpc\":\"2.0\"}")
        );
        assert_eq!(reader.read_line().await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_write_appends_newline() {
        let mut writer = LineWriter::new(Vec::new());
        writer.write_line("{\"ok\":true}").await.unwrap();

        assert_eq!(writer.into_inner(), b"{\"ok\":true}\n");
    }

    #[tokio::test]
    async fn test_drain_writes_in_send_order() {
        let stream = tokio_test::io::Builder::new()
            .write(b"first")
            .write(b"\n")
            .write(b"second")
            .write(b"\n")
            .build();
        let (tx, rx) = mpsc::unbounded_channel();
        tx.send("first".to_string()).unwrap();
        tx.send("second".to_string()).unwrap();
        drop(tx);

        LineWriter::new(stream).drain(rx).await.unwrap();
    }
}
