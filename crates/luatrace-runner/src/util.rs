//! Byte-stream helpers for the merged output pipes.

/// Partial lines are buffered between chunks; a stuck process without a
/// newline must not grow the buffer without bound.
pub const MAX_PENDING_BYTES: usize = 16384;

/// Split complete lines off a chunk buffer, returning the unterminated
/// remainder. Trailing `\r` is trimmed so CRLF output normalizes to the
/// same stream the offsets are computed over.
pub fn split_lines(buffer: &[u8]) -> (Vec<String>, Vec<u8>) {
    if buffer.is_empty() {
        return (Vec::new(), Vec::new());
    }
    let mut lines = Vec::new();
    let mut start = 0usize;
    for (idx, &b) in buffer.iter().enumerate() {
        if b == b'\n' {
            let part = &buffer[start..idx];
            let line = String::from_utf8_lossy(part)
                .trim_end_matches('\r')
                .to_string();
            lines.push(line);
            start = idx + 1;
        }
    }
    if start < buffer.len() {
        return (lines, buffer[start..].to_vec());
    }
    (lines, Vec::new())
}

pub fn cap_pending_bytes(mut pending: Vec<u8>) -> Vec<u8> {
    if pending.len() <= MAX_PENDING_BYTES {
        return pending;
    }
    let drain = pending.len() - MAX_PENDING_BYTES;
    pending.drain(0..drain);
    pending
}

pub fn truncate_text(value: &str, max: usize) -> (String, bool) {
    if max == 0 || value.len() <= max {
        return (value.to_string(), false);
    }
    (value[..max].to_string(), true)
}
