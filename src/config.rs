//! Configuration for kvline
//!
//! Centralized configuration with sensible defaults.

use std::path::PathBuf;

use crate::error::{KvError, Result};
use crate::protocol::Separator;

/// Main configuration for a kvline server or client
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// JSON file the store is loaded from at startup and saved to on STOP
    pub data_file: PathBuf,

    // -------------------------------------------------------------------------
    // Protocol Configuration
    // -------------------------------------------------------------------------
    /// How request lines are split into tokens
    pub separator: Separator,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// Listen address (server) or target address (client)
    pub listen_addr: String,

    /// Stream (TCP) or datagram (UDP) transport
    pub transport: TransportKind,

    /// Server read timeout in stream mode (milliseconds, 0 = wait forever)
    pub read_timeout_ms: u64,

    /// Server write timeout in stream mode (milliseconds, 0 = wait forever)
    pub write_timeout_ms: u64,

    /// How long a client waits for a response (milliseconds)
    pub client_timeout_ms: u64,

    /// Receive buffer size for one datagram
    pub max_datagram_size: usize,
}

/// Which transport carries requests and responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    /// Connection-oriented byte stream (TCP)
    Stream,

    /// Connectionless datagrams (UDP)
    Datagram,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("./contents.json"),
            separator: Separator::Whitespace,
            listen_addr: "127.0.0.1:4000".to_string(),
            transport: TransportKind::Stream,
            read_timeout_ms: 0,
            write_timeout_ms: 0,
            client_timeout_ms: 1000,
            max_datagram_size: 1024,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data file path
    pub fn data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_file = path.into();
        self
    }

    /// Set the request token separator
    pub fn separator(mut self, separator: Separator) -> Self {
        self.config.separator = separator;
        self
    }

    /// Set the listen (or target) address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the transport
    pub fn transport(mut self, transport: TransportKind) -> Self {
        self.config.transport = transport;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    /// Set the client response timeout (in milliseconds)
    pub fn client_timeout_ms(mut self, ms: u64) -> Self {
        self.config.client_timeout_ms = ms;
        self
    }

    /// Set the datagram receive buffer size
    pub fn max_datagram_size(mut self, size: usize) -> Self {
        self.config.max_datagram_size = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

/// Parse and range-check a port number given on the command line
///
/// Accepts anything that parses as an integer so that out-of-range values
/// get the range message rather than a generic parse error.
pub fn parse_port(raw: &str) -> Result<u16> {
    let port: i64 = raw
        .trim()
        .parse()
        .map_err(|_| KvError::Config(format!("Invalid port number: {raw}")))?;

    u16::try_from(port).map_err(|_| {
        KvError::Config("Invalid port number. Must be in range 0-65535.".to_string())
    })
}
