//! Datagram transport
//!
//! Serves whoever sent the most recent packet on a UDP socket.

use std::net::{SocketAddr, UdpSocket};

use crate::error::{KvError, Result};
use crate::protocol::decode_datagram;
use super::{FailurePolicy, Transport};

/// Transport over a bound UDP socket
pub struct DatagramTransport {
    socket: Option<UdpSocket>,

    /// Source of the last received packet; replies go here
    last_peer: Option<SocketAddr>,

    /// Receive buffer size
    max_datagram_size: usize,
}

impl DatagramTransport {
    pub fn new(socket: UdpSocket, max_datagram_size: usize) -> Self {
        Self {
            socket: Some(socket),
            last_peer: None,
            max_datagram_size,
        }
    }

    pub fn last_peer(&self) -> Option<SocketAddr> {
        self.last_peer
    }

    pub fn is_closed(&self) -> bool {
        self.socket.is_none()
    }

    fn socket(&self) -> Result<&UdpSocket> {
        self.socket
            .as_ref()
            .ok_or_else(|| KvError::Transport("datagram socket is closed".to_string()))
    }
}

impl Transport for DatagramTransport {
    fn receive(&mut self) -> Result<String> {
        // One spare byte tells a full-size request apart from a truncated one
        let mut buf = vec![0u8; self.max_datagram_size + 1];
        let (len, from) = self
            .socket()?
            .recv_from(&mut buf)
            .map_err(|e| KvError::from_read(e, "request"))?;

        self.last_peer = Some(from);
        if len > self.max_datagram_size {
            return Err(KvError::RequestTooLarge {
                limit: self.max_datagram_size,
            });
        }
        Ok(decode_datagram(&buf[..len]))
    }

    fn send(&mut self, message: &str) -> Result<()> {
        let peer = self
            .last_peer
            .ok_or_else(|| KvError::Transport("no peer to reply to".to_string()))?;

        let sent = self.socket()?.send_to(message.as_bytes(), peer)?;
        if sent != message.len() {
            return Err(KvError::Transport(format!(
                "short datagram to {}: sent {} of {} bytes",
                peer,
                sent,
                message.len()
            )));
        }
        Ok(())
    }

    fn close(&mut self) {
        if self.socket.take().is_some() {
            tracing::debug!("Closed datagram socket");
        }
    }

    fn failure_policy(&self) -> FailurePolicy {
        FailurePolicy::Recoverable
    }

    fn peer(&self) -> String {
        self.last_peer
            .map(|a| a.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}
