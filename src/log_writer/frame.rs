//! Length-prefixed framing.
//!
//! Every message on the wire is a 4-byte big-endian length followed by exactly
//! that many payload bytes.

/// Size of the length prefix in bytes.
pub const PREFIX_LEN: usize = 4;

const HANDSHAKE_PREFIX: &str = "!!cutelog!!format=";

/// Frame the payload with a big-endian length prefix.
///
/// Returns `None` when the payload is larger than `max_size` or cannot be
/// described by a `u32`.
pub fn frame_payload(payload: &[u8], max_size: usize) -> Option<Vec<u8>> {
    if payload.len() > max_size {
        return None;
    }
    let len = u32::try_from(payload.len()).ok()?;
    let capacity = payload.len().checked_add(PREFIX_LEN)?;
    let mut framed = Vec::with_capacity(capacity);
    framed.extend(len.to_be_bytes());
    framed.extend_from_slice(payload);
    Some(framed)
}

/// Build the handshake announcing `format` to cutelog.
pub fn handshake_payload(format: &str) -> Vec<u8> {
    format!("{HANDSHAKE_PREFIX}{format}").into_bytes()
}
