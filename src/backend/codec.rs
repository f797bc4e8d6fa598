//! Binary framing for records staged in the dispatcher's async circular
//! buffer. Keeps the buffer a literal byte FIFO while preserving each
//! sink's own `Sink::write` contract — the drain path decodes back to
//! `(Level, message, metadata)` and calls `write` exactly as the
//! synchronous path does, so sync and async delivery share one code
//! path per sink.

use crate::levels::Level;
use crate::types::LogMetadata;

fn push_u32(out: &mut Vec<u8>, v: u32) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn push_str(out: &mut Vec<u8>, s: &str) {
    push_u32(out, s.len() as u32);
    out.extend_from_slice(s.as_bytes());
}

fn level_to_byte(level: Level) -> u8 {
    match level {
        Level::Trace => 0,
        Level::Debug => 1,
        Level::Info => 2,
        Level::Warn => 3,
        Level::Err => 4,
        Level::Critical => 5,
    }
}

fn byte_to_level(b: u8) -> Option<Level> {
    match b {
        0 => Some(Level::Trace),
        1 => Some(Level::Debug),
        2 => Some(Level::Info),
        3 => Some(Level::Warn),
        4 => Some(Level::Err),
        5 => Some(Level::Critical),
        _ => None,
    }
}

/// Encodes one record as `[total_len:u32][level:u8][message][has_meta:u8][metadata?]`.
pub fn encode(level: Level, message: &str, metadata: Option<&LogMetadata>) -> Vec<u8> {
    let mut body = Vec::with_capacity(message.len() + 16);
    body.push(level_to_byte(level));
    push_str(&mut body, message);
    match metadata {
        None => body.push(0),
        Some(m) => {
            body.push(1);
            body.extend_from_slice(&m.timestamp.to_le_bytes());
            body.extend_from_slice(&m.thread_id.to_le_bytes());
            push_str(&mut body, &m.file);
            push_u32(&mut body, m.line);
            push_str(&mut body, &m.function);
        }
    }

    let mut out = Vec::with_capacity(body.len() + 4);
    push_u32(&mut out, body.len() as u32);
    out.extend_from_slice(&body);
    out
}

/// Decodes one record from the front of `bytes`, returning the record and
/// the number of bytes consumed. Returns `None` if `bytes` doesn't yet
/// contain a complete frame.
pub fn decode(bytes: &[u8]) -> Option<(Level, String, Option<LogMetadata>, usize)> {
    if bytes.len() < 4 {
        return None;
    }
    let total_len = u32::from_le_bytes(bytes[0..4].try_into().ok()?) as usize;
    if bytes.len() < 4 + total_len {
        return None;
    }
    let mut pos = 4;
    let body_end = 4 + total_len;

    let level = byte_to_level(*bytes.get(pos)?)?;
    pos += 1;

    let msg_len = u32::from_le_bytes(bytes.get(pos..pos + 4)?.try_into().ok()?) as usize;
    pos += 4;
    let message = String::from_utf8(bytes.get(pos..pos + msg_len)?.to_vec()).ok()?;
    pos += msg_len;

    let has_meta = *bytes.get(pos)?;
    pos += 1;

    let metadata = if has_meta == 1 {
        let timestamp = i64::from_le_bytes(bytes.get(pos..pos + 8)?.try_into().ok()?);
        pos += 8;
        let thread_id = u64::from_le_bytes(bytes.get(pos..pos + 8)?.try_into().ok()?);
        pos += 8;
        let file_len = u32::from_le_bytes(bytes.get(pos..pos + 4)?.try_into().ok()?) as usize;
        pos += 4;
        let file = String::from_utf8(bytes.get(pos..pos + file_len)?.to_vec()).ok()?;
        pos += file_len;
        let line = u32::from_le_bytes(bytes.get(pos..pos + 4)?.try_into().ok()?);
        pos += 4;
        let func_len = u32::from_le_bytes(bytes.get(pos..pos + 4)?.try_into().ok()?) as usize;
        pos += 4;
        let function = String::from_utf8(bytes.get(pos..pos + func_len)?.to_vec()).ok()?;
        pos += func_len;
        Some(LogMetadata {
            timestamp,
            thread_id,
            file,
            line,
            function,
        })
    } else {
        None
    };

    debug_assert_eq!(pos, body_end);
    Some((level, message, metadata, body_end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_without_metadata() {
        let bytes = encode(Level::Warn, "hello", None);
        let (level, message, metadata, consumed) = decode(&bytes).unwrap();
        assert_eq!(level, Level::Warn);
        assert_eq!(message, "hello");
        assert!(metadata.is_none());
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn round_trips_with_metadata() {
        let meta = LogMetadata {
            timestamp: 123,
            thread_id: 7,
            file: "main.rs".into(),
            line: 42,
            function: "run".into(),
        };
        let bytes = encode(Level::Critical, "boom", Some(&meta));
        let (level, message, decoded_meta, consumed) = decode(&bytes).unwrap();
        assert_eq!(level, Level::Critical);
        assert_eq!(message, "boom");
        assert_eq!(decoded_meta, Some(meta));
        assert_eq!(consumed, bytes.len());
    }

    #[test]
    fn decode_of_incomplete_frame_is_none() {
        let bytes = encode(Level::Info, "partial", None);
        assert!(decode(&bytes[..bytes.len() - 1]).is_none());
    }

    #[test]
    fn multiple_records_decode_in_sequence() {
        let mut buf = encode(Level::Info, "one", None);
        buf.extend(encode(Level::Debug, "two", None));
        let (l1, m1, _, c1) = decode(&buf).unwrap();
        assert_eq!((l1, m1.as_str()), (Level::Info, "one"));
        let (l2, m2, _, _) = decode(&buf[c1..]).unwrap();
        assert_eq!((l2, m2.as_str()), (Level::Debug, "two"));
    }
}
