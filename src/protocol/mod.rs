//! Protocol Module
//!
//! Defines the text protocol between client and server.
//!
//! ## Request Format
//! One line of text, fields separated by runs of whitespace (or tabs only,
//! see [`Separator`]). The command name is case-insensitive.
//!
//! ```text
//! GET    <key>
//! PUT    <key> <value>
//! DELETE <key>
//! STOP
//! ```
//!
//! ## Response Format
//! One human-readable line. Whether the request succeeded is not part of the
//! wire format; it only steers server-side logging.
//!
//! ## Framing
//! ```text
//! Stream:   ┌──────────┬─────────────────────────────┐
//!           │ Len (2)  │         UTF-8 text          │
//!           └──────────┴─────────────────────────────┘
//! Datagram: one message per datagram, no header
//! ```

mod command;
mod response;
pub mod codec;

pub use command::{validate, Command, CommandType, Request, Separator, Validation};
pub use response::{
    Reply, Response, SessionAction, DELETE_MISSING, DELETE_OK, GET_MISSING, INVALID_TYPE,
    PARAMETER_COUNT, PUT_OK,
};
pub use codec::{decode_datagram, read_message, write_message, MAX_MESSAGE_SIZE};
