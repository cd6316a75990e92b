//! Stream transport
//!
//! Serves a single TCP connection.

use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::net::{Shutdown, TcpStream};
use std::time::Duration;

use crate::error::{KvError, Result};
use crate::protocol::{read_message, write_message};
use super::{FailurePolicy, Transport};

/// Transport over one accepted TCP connection
///
/// The peer is fixed for the lifetime of the transport.
pub struct StreamTransport {
    /// TCP stream reader (buffered for efficiency)
    reader: BufReader<TcpStream>,

    /// TCP stream writer (buffered for efficiency)
    writer: BufWriter<TcpStream>,

    /// Peer address for logging
    peer_addr: String,

    closed: bool,
}

impl StreamTransport {
    /// Create a new stream transport
    ///
    /// Sets up buffered I/O on cloned handles of the same socket
    pub fn new(stream: TcpStream) -> Result<Self> {
        // Get peer address for logging before we split the stream
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm; every message is a small request/response
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            reader: BufReader::new(read_stream),
            writer: BufWriter::new(write_stream),
            peer_addr,
            closed: false,
        })
    }

    /// Configure connection timeouts (0 leaves the call blocking)
    pub fn set_timeouts(&mut self, read_ms: u64, write_ms: u64) -> Result<()> {
        if read_ms > 0 {
            self.reader
                .get_ref()
                .set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            self.writer
                .get_ref()
                .set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }

        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(KvError::Transport(format!(
                "connection to {} is closed",
                self.peer_addr
            )));
        }
        Ok(())
    }
}

impl Transport for StreamTransport {
    fn receive(&mut self) -> Result<String> {
        self.ensure_open()?;

        match read_message(&mut self.reader) {
            Ok(text) => Ok(text.trim().to_string()),
            Err(KvError::Io(e)) => match e.kind() {
                ErrorKind::UnexpectedEof
                | ErrorKind::ConnectionReset
                | ErrorKind::ConnectionAborted => Err(KvError::Transport(format!(
                    "client {} disconnected",
                    self.peer_addr
                ))),
                _ => Err(KvError::from_read(e, "request")),
            },
            Err(e) => Err(e),
        }
    }

    fn send(&mut self, message: &str) -> Result<()> {
        self.ensure_open()?;
        write_message(&mut self.writer, message)
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if let Err(e) = self.writer.flush() {
            tracing::warn!("Error flushing connection to {}: {}", self.peer_addr, e);
        }
        if let Err(e) = self.reader.get_ref().shutdown(Shutdown::Both) {
            // The peer may already have torn the connection down
            if e.kind() != ErrorKind::NotConnected {
                tracing::warn!("Error closing connection to {}: {}", self.peer_addr, e);
            }
        }
        tracing::debug!("Closed connection to {}", self.peer_addr);
    }

    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::Fatal
    }

    fn peer(&self) -> String {
        self.peer_addr.clone()
    }
}
