use std::net::IpAddr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("DNS header truncated: got {len} bytes, need 12")]
    TruncatedHeader { len: usize },

    #[error("Malformed domain name in question section")]
    MalformedName,

    #[error("Question section truncated: need {needed} bytes, got {available}")]
    TruncatedQuestion { needed: usize, available: usize },

    #[error("No address available: {0}")]
    NoAddressAvailable(String),

    #[error("Unsupported address family for A record: {0}")]
    UnsupportedAddressFamily(IpAddr),

    #[error("RDATA of {len} bytes exceeds the 65535-byte RDLENGTH limit")]
    RdataTooLong { len: usize },

    #[error("Failed to send reply: {0}")]
    SendFailure(String),

    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("Query timeout")]
    QueryTimeout,

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("I/O error: {0}")]
    IoError(String),
}

impl DomainError {
    /// True for errors caused by the client's datagram rather than the relay or upstream.
    pub fn is_malformed_query(&self) -> bool {
        matches!(
            self,
            DomainError::TruncatedHeader { .. }
                | DomainError::MalformedName
                | DomainError::TruncatedQuestion { .. }
        )
    }
}
