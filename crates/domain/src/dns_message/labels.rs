//! Label-sequence helpers.
//!
//! Two readers share one walk over the bytes:
//!
//! * [`label_sequence_to_dotted_string`] is lenient. It stops at the first
//!   label that would run past the buffer and returns what it has so far.
//!   It is meant for diagnostics, where some name is better than none.
//! * [`dotted_name`] is strict and is what query handling uses. Any label
//!   running past the buffer, a missing root label, an oversized label
//!   (which also covers compression pointers) or an oversized name is
//!   `MalformedName`. So is a label that is not UTF-8 or that carries a
//!   `.` byte: the dotted form must split back into the same labels.

use crate::DomainError;

pub const MAX_LABEL_LEN: usize = 63;
pub const MAX_NAME_LEN: usize = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Termination {
    Root,
    Truncated,
    Exhausted,
}

struct LabelWalk<'a> {
    labels: Vec<&'a [u8]>,
    termination: Termination,
    consumed: usize,
}

fn walk(buf: &[u8]) -> LabelWalk<'_> {
    let mut labels = Vec::new();
    let mut pos = 0;

    while pos < buf.len() {
        let len = buf[pos] as usize;
        if len == 0 {
            return LabelWalk {
                labels,
                termination: Termination::Root,
                consumed: pos + 1,
            };
        }
        pos += 1;
        if pos + len > buf.len() {
            return LabelWalk {
                labels,
                termination: Termination::Truncated,
                consumed: pos - 1,
            };
        }
        labels.push(&buf[pos..pos + len]);
        pos += len;
    }

    LabelWalk {
        labels,
        termination: Termination::Exhausted,
        consumed: pos,
    }
}

fn join(labels: &[&[u8]]) -> String {
    labels
        .iter()
        .map(|label| String::from_utf8_lossy(label))
        .collect::<Vec<_>>()
        .join(".")
}

/// Converts `\x03dns\x06google\x03com\x00` into `dns.google.com`.
pub fn label_sequence_to_dotted_string(buf: &[u8]) -> String {
    join(&walk(buf).labels)
}

pub fn dotted_name(buf: &[u8]) -> Result<String, DomainError> {
    let walk = walk(buf);

    if walk.termination != Termination::Root || walk.consumed > MAX_NAME_LEN {
        return Err(DomainError::MalformedName);
    }

    let labels = walk
        .labels
        .iter()
        .map(|label| {
            if label.len() > MAX_LABEL_LEN || label.contains(&b'.') {
                return Err(DomainError::MalformedName);
            }
            std::str::from_utf8(label).map_err(|_| DomainError::MalformedName)
        })
        .collect::<Result<Vec<&str>, _>>()?;

    Ok(labels.join("."))
}

/// Encodes `example.com` (trailing dot optional) as a label sequence.
pub fn encode_dotted_name(name: &str) -> Result<Vec<u8>, DomainError> {
    let trimmed = name.trim_end_matches('.');
    let mut buf = Vec::with_capacity(trimmed.len() + 2);

    if !trimmed.is_empty() {
        for label in trimmed.split('.') {
            if label.is_empty() || label.len() > MAX_LABEL_LEN {
                return Err(DomainError::InvalidDomainName(name.to_string()));
            }
            buf.push(label.len() as u8);
            buf.extend_from_slice(label.as_bytes());
        }
    }
    buf.push(0);

    if buf.len() > MAX_NAME_LEN {
        return Err(DomainError::InvalidDomainName(name.to_string()));
    }

    Ok(buf)
}
