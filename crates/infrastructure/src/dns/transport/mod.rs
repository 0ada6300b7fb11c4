pub mod udp;

use async_trait::async_trait;
use dns_relay_domain::DomainError;
use std::net::SocketAddr;

pub use udp::UdpTransport;

/// One request/response exchange with an upstream server.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    /// Returns the first reply whose id matches `query`'s; others are skipped.
    async fn exchange(&self, query: &[u8]) -> Result<Vec<u8>, DomainError>;

    fn upstream(&self) -> SocketAddr;
}
