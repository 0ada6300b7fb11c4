use super::labels;
use crate::{DomainError, RecordType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DnsQuestion {
    /// Raw label sequence, including the terminating zero byte.
    pub qname: Vec<u8>,
    pub qtype: u16,
    pub qclass: u16,
}

impl DnsQuestion {
    pub fn new(qname: impl Into<Vec<u8>>, qtype: u16, qclass: u16) -> Self {
        Self {
            qname: qname.into(),
            qtype,
            qclass,
        }
    }

    pub fn encoded_len(&self) -> usize {
        self.qname.len() + 4
    }

    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        buf.extend_from_slice(&self.qname);
        buf.extend_from_slice(&self.qtype.to_be_bytes());
        buf.extend_from_slice(&self.qclass.to_be_bytes());
        buf
    }

    /// Decodes a question starting at offset 0 of `buf`.
    ///
    /// The name ends at the first zero byte. Returns the question together
    /// with the number of bytes it occupied.
    pub fn deserialize(buf: &[u8]) -> Result<(Self, usize), DomainError> {
        let null_index = buf
            .iter()
            .position(|&b| b == 0)
            .ok_or(DomainError::MalformedName)?;

        let name_end = null_index + 1;
        let question_size = name_end + 4;
        if buf.len() < question_size {
            return Err(DomainError::TruncatedQuestion {
                needed: question_size,
                available: buf.len(),
            });
        }

        let question = Self {
            qname: buf[..name_end].to_vec(),
            qtype: u16::from_be_bytes([buf[name_end], buf[name_end + 1]]),
            qclass: u16::from_be_bytes([buf[name_end + 2], buf[name_end + 3]]),
        };

        Ok((question, question_size))
    }

    pub fn record_type(&self) -> RecordType {
        RecordType::from_u16(self.qtype)
    }

    /// Dotted form of `qname`, rejecting names whose labels do not line up.
    pub fn domain(&self) -> Result<String, DomainError> {
        labels::dotted_name(&self.qname)
    }
}
