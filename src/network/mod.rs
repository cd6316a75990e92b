//! Network Module
//!
//! Transports, the serving loop, and the client.
//!
//! ## Architecture
//! - One listener, chosen by `Config::transport`
//! - One session at a time; each session drives a `Transport`
//! - Requests routed through `Engine`

mod transport;
mod session;
mod connection;
mod datagram;
mod server;
mod client;

pub use transport::{FailurePolicy, Transport};
pub use session::{Session, SessionEnd, SessionState};
pub use connection::StreamTransport;
pub use datagram::DatagramTransport;
pub use server::Server;
pub use client::Client;
