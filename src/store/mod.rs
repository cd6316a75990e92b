//! Store Module
//!
//! The in-memory key-value map and the gateway that persists it.
//!
//! ## Responsibilities
//! - Hold the live mapping for the lifetime of the server process
//! - Produce sorted snapshots for deterministic serialization
//! - Load the mapping at startup, save it in full on STOP
//!
//! ## File Format
//! ```text
//! {"data":[{"key":"k1","value":"v1"},{"key":"k2","value":"v2"}]}
//! ```

mod table;
mod persistence;

pub use table::KvStore;
pub use persistence::{JsonFile, Persistence};
