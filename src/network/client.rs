//! Client
//!
//! Sends one request line and waits a bounded time for the response.

use std::io::{BufReader, BufWriter, ErrorKind};
use std::net::{Ipv4Addr, Ipv6Addr, Shutdown, SocketAddr, TcpStream, ToSocketAddrs, UdpSocket};
use std::time::Duration;

use crate::config::{Config, TransportKind};
use crate::error::{KvError, Result};
use crate::protocol::{decode_datagram, read_message, write_message};

/// Largest UDP payload we will accept back from the server
const MAX_RESPONSE_DATAGRAM: usize = 64 * 1024;

enum Channel {
    Stream {
        reader: BufReader<TcpStream>,
        writer: BufWriter<TcpStream>,
    },
    Datagram {
        socket: UdpSocket,
    },
}

/// Client for a kvline server
pub struct Client {
    channel: Channel,
    server: SocketAddr,
    timeout: Option<Duration>,

    /// Set when a stream response was abandoned mid-flight; the next request
    /// reconnects instead of reading a stale reply
    desynced: bool,
}

impl Client {
    /// Connect to `config.listen_addr` over `config.transport`
    ///
    /// Responses are awaited for at most `config.client_timeout_ms`.
    pub fn connect(config: &Config) -> Result<Self> {
        let server = resolve(&config.listen_addr)?;
        let timeout = match config.client_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };

        let channel = match config.transport {
            TransportKind::Stream => open_stream(server, timeout)?,
            TransportKind::Datagram => {
                let local: SocketAddr = if server.is_ipv4() {
                    (Ipv4Addr::UNSPECIFIED, 0).into()
                } else {
                    (Ipv6Addr::UNSPECIFIED, 0).into()
                };
                let socket = UdpSocket::bind(local)?;
                socket.connect(server)?;
                socket.set_read_timeout(timeout)?;
                Channel::Datagram { socket }
            }
        };

        Ok(Self {
            channel,
            server,
            timeout,
            desynced: false,
        })
    }

    pub fn server_addr(&self) -> SocketAddr {
        self.server
    }

    /// Send one request line and return the server's response
    ///
    /// # Errors
    /// `KvError::Timeout` if no response arrives in time. The request is not
    /// retried. A stream connection whose response was abandoned is replaced
    /// by a fresh one on the next call, so responses stay paired with their
    /// requests.
    pub fn request(&mut self, line: &str) -> Result<String> {
        if self.desynced {
            self.reconnect()?;
        }

        match &mut self.channel {
            Channel::Stream { reader, writer } => {
                write_message(writer, line)?;
                let response = read_message(reader).map_err(|e| match e {
                    KvError::Io(io) if io.kind() == ErrorKind::UnexpectedEof => {
                        KvError::Transport("server closed the connection".to_string())
                    }
                    KvError::Io(io) => KvError::from_read(io, "response"),
                    other => other,
                });
                if response.is_err() {
                    self.desynced = true;
                }
                response
            }
            Channel::Datagram { socket } => {
                discard_stale_datagrams(socket)?;
                socket.send(line.as_bytes())?;
                let mut buf = vec![0u8; MAX_RESPONSE_DATAGRAM];
                let len = socket
                    .recv(&mut buf)
                    .map_err(|e| KvError::from_read(e, "response"))?;
                Ok(decode_datagram(&buf[..len]))
            }
        }
    }

    fn reconnect(&mut self) -> Result<()> {
        if let Channel::Stream { reader, .. } = &self.channel {
            // The server only sees the next connection once this one is gone
            if let Err(e) = reader.get_ref().shutdown(Shutdown::Both) {
                tracing::debug!("Error closing stale connection to {}: {}", self.server, e);
            }
        }
        tracing::debug!("Reconnecting to {} after an abandoned response", self.server);
        self.channel = open_stream(self.server, self.timeout)?;
        self.desynced = false;
        Ok(())
    }
}

fn open_stream(server: SocketAddr, timeout: Option<Duration>) -> Result<Channel> {
    let stream = TcpStream::connect(server)?;
    stream.set_nodelay(true)?;
    stream.set_read_timeout(timeout)?;
    tracing::debug!("Connection established with {}", server);
    Ok(Channel::Stream {
        reader: BufReader::new(stream.try_clone()?),
        writer: BufWriter::new(stream),
    })
}

/// Drop late replies to earlier requests still queued on the socket
fn discard_stale_datagrams(socket: &UdpSocket) -> Result<()> {
    socket.set_nonblocking(true)?;
    let mut buf = vec![0u8; MAX_RESPONSE_DATAGRAM];
    let drained = loop {
        match socket.recv(&mut buf) {
            Ok(_) => tracing::debug!("Discarded a late response"),
            Err(e) if e.kind() == ErrorKind::WouldBlock => break Ok(()),
            // A refused earlier send surfaces here on some platforms
            Err(e) if e.kind() == ErrorKind::ConnectionRefused => continue,
            Err(e) => break Err(e),
        }
    };
    socket.set_nonblocking(false)?;
    drained?;
    Ok(())
}

fn resolve(addr: &str) -> Result<SocketAddr> {
    addr.to_socket_addrs()?
        .next()
        .ok_or_else(|| KvError::Config(format!("could not resolve {}", addr)))
}
