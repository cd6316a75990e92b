//! Protocol codec
//!
//! Framing for the two transports.
//!
//! ## Stream Format
//! ```text
//! ┌──────────┬─────────────────────────────┐
//! │ Len (2)  │         UTF-8 text          │
//! └──────────┴─────────────────────────────┘
//! ```
//! `Len` is big-endian. A message is at most `MAX_MESSAGE_SIZE` bytes.
//!
//! ## Datagram Format
//! The whole datagram is the message. Receivers trim trailing padding.

use std::io::{Read, Write};

use crate::error::{KvError, Result};

/// Header size: 2 byte length
pub const HEADER_SIZE: usize = 2;

/// Maximum payload size of one stream message
pub const MAX_MESSAGE_SIZE: usize = u16::MAX as usize;

/// Encode a message as header + payload
pub fn encode_message(text: &str) -> Result<Vec<u8>> {
    let payload = text.as_bytes();
    let len = u16::try_from(payload.len()).map_err(|_| {
        KvError::Protocol(format!(
            "Message too large: {} bytes (max {})",
            payload.len(),
            MAX_MESSAGE_SIZE
        ))
    })?;

    let mut message = Vec::with_capacity(HEADER_SIZE + payload.len());
    message.extend_from_slice(&len.to_be_bytes());
    message.extend_from_slice(payload);
    Ok(message)
}

/// Write one framed message to a stream
///
/// Header and payload go out in a single `write_all` so a message is never
/// interleaved with another write.
pub fn write_message<W: Write>(writer: &mut W, text: &str) -> Result<()> {
    let bytes = encode_message(text)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Read one framed message from a stream
///
/// Blocks until a complete message is received or an error occurs
pub fn read_message<R: Read>(reader: &mut R) -> Result<String> {
    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header)?;

    let len = u16::from_be_bytes(header) as usize;
    let mut payload = vec![0u8; len];
    if len > 0 {
        reader.read_exact(&mut payload)?;
    }

    String::from_utf8(payload)
        .map_err(|e| KvError::Protocol(format!("Message is not valid UTF-8: {}", e)))
}

/// Decode a received datagram into trimmed text
///
/// Invalid UTF-8 is replaced rather than rejected; NUL padding and other
/// control characters at either end are stripped.
pub fn decode_datagram(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .trim_matches(|c: char| c.is_whitespace() || c.is_control())
        .to_string()
}
