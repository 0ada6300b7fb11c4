use crate::DomainError;

pub const HEADER_SIZE: usize = 12;

/// Fixed DNS message header. `flags` is kept as the raw 16-bit word
/// (QR, OPCODE, AA, TC, RD, RA, Z, RCODE) and never decomposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DnsHeader {
    pub id: u16,
    pub flags: u16,
    pub question_count: u16,
    pub answer_count: u16,
    pub authority_count: u16,
    pub additional_count: u16,
}

impl DnsHeader {
    pub fn serialize(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..2].copy_from_slice(&self.id.to_be_bytes());
        buf[2..4].copy_from_slice(&self.flags.to_be_bytes());
        buf[4..6].copy_from_slice(&self.question_count.to_be_bytes());
        buf[6..8].copy_from_slice(&self.answer_count.to_be_bytes());
        buf[8..10].copy_from_slice(&self.authority_count.to_be_bytes());
        buf[10..12].copy_from_slice(&self.additional_count.to_be_bytes());
        buf
    }

    /// Decodes the first 12 bytes of `buf`. Trailing bytes are ignored.
    pub fn deserialize(buf: &[u8]) -> Result<Self, DomainError> {
        if buf.len() < HEADER_SIZE {
            return Err(DomainError::TruncatedHeader { len: buf.len() });
        }

        let word = |at: usize| u16::from_be_bytes([buf[at], buf[at + 1]]);

        Ok(Self {
            id: word(0),
            flags: word(2),
            question_count: word(4),
            answer_count: word(6),
            authority_count: word(8),
            additional_count: word(10),
        })
    }

    /// Header for a single-answer reply to this request.
    ///
    /// Id and flags are echoed verbatim; the counts describe what the reply
    /// actually carries: one question, one answer, nothing else.
    pub fn reply_header(&self) -> Self {
        Self {
            id: self.id,
            flags: self.flags,
            question_count: 1,
            answer_count: 1,
            authority_count: 0,
            additional_count: 0,
        }
    }
}
