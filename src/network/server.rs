//! Server
//!
//! Binds the configured listener and runs sessions until STOP.

use std::net::{SocketAddr, TcpListener, UdpSocket};
use std::sync::Arc;

use crate::config::{Config, TransportKind};
use crate::engine::Engine;
use crate::error::Result;
use super::{DatagramTransport, Session, SessionEnd, StreamTransport, Transport};

enum Listener {
    Stream(TcpListener),
    Datagram(UdpSocket),
}

/// Key-value server over TCP or UDP
pub struct Server {
    config: Config,
    engine: Arc<Engine>,
    listener: Listener,
}

impl Server {
    /// Bind the listener selected by `config.transport`
    pub fn bind(config: Config, engine: Arc<Engine>) -> Result<Self> {
        let listener = match config.transport {
            TransportKind::Stream => Listener::Stream(TcpListener::bind(&config.listen_addr)?),
            TransportKind::Datagram => Listener::Datagram(UdpSocket::bind(&config.listen_addr)?),
        };

        Ok(Self {
            config,
            engine,
            listener,
        })
    }

    /// The address actually bound (useful when the configured port is 0)
    pub fn local_addr(&self) -> Result<SocketAddr> {
        let addr = match &self.listener {
            Listener::Stream(listener) => listener.local_addr()?,
            Listener::Datagram(socket) => socket.local_addr()?,
        };
        Ok(addr)
    }

    /// Serve until a STOP request is handled (blocking)
    pub fn run(self) -> Result<()> {
        let addr = self.local_addr()?;
        match self.listener {
            Listener::Stream(listener) => {
                tracing::info!("Listening for TCP connections on {}", addr);
                Self::run_stream(&listener, &self.config, &self.engine)
            }
            Listener::Datagram(socket) => {
                tracing::info!("Server running on UDP {}", addr);
                let transport = DatagramTransport::new(socket, self.config.max_datagram_size);
                let mut session = Session::new(transport, self.engine);
                session.run();
                Ok(())
            }
        }
    }

    /// Accept one connection at a time; a lost connection frees the server
    /// for the next client, STOP ends it
    fn run_stream(listener: &TcpListener, config: &Config, engine: &Arc<Engine>) -> Result<()> {
        loop {
            let (stream, peer) = match listener.accept() {
                Ok(accepted) => accepted,
                Err(e) => {
                    tracing::warn!("Connection failed: {}", e);
                    continue;
                }
            };
            tracing::debug!("Connection established from {}", peer);

            let mut transport = match StreamTransport::new(stream) {
                Ok(transport) => transport,
                Err(e) => {
                    tracing::warn!("Failed to set up connection from {}: {}", peer, e);
                    continue;
                }
            };
            if let Err(e) = transport.set_timeouts(config.read_timeout_ms, config.write_timeout_ms) {
                tracing::warn!("Failed to set timeouts for {}: {}", peer, e);
                transport.close();
                continue;
            }

            let mut session = Session::new(transport, Arc::clone(engine));
            match session.run() {
                SessionEnd::Stopped => return Ok(()),
                SessionEnd::TransportFailed => {
                    tracing::info!("Waiting for the next connection");
                }
            }
        }
    }
}
