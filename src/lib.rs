//! # kvline
//!
//! A minimal networked key-value store with:
//! - A one-line text protocol: GET, PUT, DELETE and STOP
//! - Interchangeable TCP (stream) and UDP (datagram) transports
//! - In-memory state saved to a JSON file on STOP, reloaded on startup
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                 Server (TCP or UDP listener)                │
//! │                  (one session at a time)                    │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ Transport::receive / send / close
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                         Session                             │
//! │   AwaitingRequest → Processing → Responding → …             │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ raw request line
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                          Engine                             │
//! │          Request::parse → validate → execute                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │   KvStore   │─snapshot▶│  JsonFile   │
//!   │  (RwLock)   │          │  (on STOP)  │
//!   └─────────────┘          └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod store;
pub mod protocol;
pub mod engine;
pub mod network;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{KvError, Result};
pub use config::{Config, TransportKind};
pub use engine::Engine;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of kvline
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
