//! DNS wire format codec.
//!
//! Covers the subset a single-question forwarder needs: the fixed 12-byte
//! header, one question, and synthesized address records. Names are kept as
//! raw label-sequence bytes; compression pointers are never produced.

pub mod header;
pub mod labels;
pub mod question;
pub mod record;

pub use header::{DnsHeader, HEADER_SIZE};
pub use labels::{dotted_name, encode_dotted_name, label_sequence_to_dotted_string};
pub use question::DnsQuestion;
pub use record::ResourceRecord;

use crate::DomainError;

/// A complete reply: header, echoed question, one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsReply {
    pub header: DnsHeader,
    pub question: DnsQuestion,
    pub answer: ResourceRecord,
}

impl DnsReply {
    /// Builds the reply for `request`, echoing its id, flags and question.
    pub fn new(request: &DnsHeader, question: DnsQuestion, answer: ResourceRecord) -> Self {
        Self {
            header: request.reply_header(),
            question,
            answer,
        }
    }

    pub fn serialize(&self) -> Result<Vec<u8>, DomainError> {
        let question = self.question.serialize();
        let answer = self.answer.serialize()?;

        let mut buf = Vec::with_capacity(HEADER_SIZE + question.len() + answer.len());
        buf.extend_from_slice(&self.header.serialize());
        buf.extend_from_slice(&question);
        buf.extend_from_slice(&answer);
        Ok(buf)
    }
}
