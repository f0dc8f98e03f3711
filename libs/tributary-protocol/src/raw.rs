//! Raw protocol: payloads joined with `\n`.
//!
//! Framing: `p0 \n p1 \n ... \n pn`, no trailing separator, no escaping.
//! A payload containing `\n` is indistinguishable from two events; the
//! consumer has to live with that.

use bytes::{BufMut, Bytes, BytesMut};
use tributary_models::PipelineEvent;

use crate::error::ConvertError;

pub const EVENT_SEPARATOR: u8 = b'\n';

/// Append the whole batch to `buf`, all or nothing.
///
/// Returns `Ok(None)` for an empty batch. Every event is checked before
/// anything is reserved or written, so a rejected batch leaves `buf`
/// exactly as it was found, capacity included.
pub fn write_raw_stream(
    events: &[PipelineEvent],
    buf: &mut BytesMut,
) -> Result<Option<Bytes>, ConvertError> {
    if events.is_empty() {
        return Ok(None);
    }

    let len = stream_len(events)?;
    let start = buf.len();
    buf.reserve(len);

    for (idx, event) in events.iter().enumerate() {
        if let PipelineEvent::ByteArray(payload) = event {
            if idx != 0 {
                buf.put_u8(EVENT_SEPARATOR);
            }
            buf.extend_from_slice(payload);
        }
    }

    // Copy out: `buf` goes back to the pool, the stream outlives it.
    Ok(Some(Bytes::copy_from_slice(&buf[start..])))
}

/// Exact output size of the batch, or the first event that cannot be written.
fn stream_len(events: &[PipelineEvent]) -> Result<usize, ConvertError> {
    let mut len = events.len().saturating_sub(1);
    for event in events {
        match event {
            PipelineEvent::ByteArray(payload) => len += payload.len(),
            other => return Err(ConvertError::UnsupportedEventType(other.event_type())),
        }
    }
    Ok(len)
}
