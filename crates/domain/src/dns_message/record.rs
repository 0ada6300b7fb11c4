use crate::DomainError;
use std::net::IpAddr;

/// A resource record as written to the answer section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    /// Raw label sequence, including the terminating zero byte.
    pub name: Vec<u8>,
    pub rtype: u16,
    pub class: u16,
    pub ttl: u32,
    /// Informational only. [`ResourceRecord::serialize`] always writes `rdata.len()`.
    pub rdlength: u16,
    pub rdata: Vec<u8>,
}

impl ResourceRecord {
    /// TYPE, CLASS, TTL and RDLENGTH.
    pub const FIXED_FIELDS_LEN: usize = 10;

    pub fn encoded_len(&self) -> usize {
        self.name.len() + Self::FIXED_FIELDS_LEN + self.rdata.len()
    }

    /// Fails with `RdataTooLong` when `rdata` does not fit RDLENGTH.
    pub fn serialize(&self) -> Result<Vec<u8>, DomainError> {
        let len = self.rdata.len();
        let rdlength = u16::try_from(len).map_err(|_| DomainError::RdataTooLong { len })?;

        let mut buf = Vec::with_capacity(self.encoded_len());
        buf.extend_from_slice(&self.name);
        buf.extend_from_slice(&self.rtype.to_be_bytes());
        buf.extend_from_slice(&self.class.to_be_bytes());
        buf.extend_from_slice(&self.ttl.to_be_bytes());
        buf.extend_from_slice(&rdlength.to_be_bytes());
        buf.extend_from_slice(&self.rdata);
        Ok(buf)
    }

    /// Builds an address record from the first entry of `resolved`.
    ///
    /// Only IPv4 can be carried; an IPv6 first address is rejected rather
    /// than skipped so the caller sees what upstream actually returned.
    pub fn build_answer(
        name: Vec<u8>,
        rtype: u16,
        class: u16,
        ttl: u32,
        resolved: &[IpAddr],
    ) -> Result<Self, DomainError> {
        let first = resolved.first().ok_or_else(|| {
            DomainError::NoAddressAvailable("resolver returned no addresses".to_string())
        })?;

        let rdata = match first {
            IpAddr::V4(v4) => v4.octets().to_vec(),
            IpAddr::V6(_) => return Err(DomainError::UnsupportedAddressFamily(*first)),
        };

        Ok(Self {
            name,
            rtype,
            class,
            ttl,
            rdlength: rdata.len() as u16,
            rdata,
        })
    }
}
