use async_trait::async_trait;
use dns_relay_domain::DomainError;
use std::net::IpAddr;

/// Maps a dotted domain name to zero or more addresses.
///
/// Implementations should return addresses in the order upstream gave them;
/// callers pick the first one.
#[async_trait]
pub trait DnsResolver: Send + Sync {
    async fn resolve(&self, domain: &str) -> Result<Vec<IpAddr>, DomainError>;
}
