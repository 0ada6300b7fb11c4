use crate::dns::forwarding::{MessageBuilder, ResponseParser};
use crate::dns::transport::{DnsTransport, UdpTransport};
use async_trait::async_trait;
use dns_relay_application::ports::DnsResolver;
use dns_relay_domain::{DomainError, ForwarderSettings, RecordType};
use hickory_proto::op::ResponseCode;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;
use tracing::debug;

/// Resolves names by asking one upstream recursive resolver over UDP.
pub struct UpstreamResolver {
    transport: UdpTransport,
}

impl UpstreamResolver {
    pub fn new(upstream: SocketAddr, timeout: Duration) -> Self {
        Self {
            transport: UdpTransport::new(upstream, timeout),
        }
    }

    pub fn from_settings(settings: &ForwarderSettings) -> Self {
        Self::new(settings.upstream, settings.timeout)
    }

    pub fn upstream(&self) -> SocketAddr {
        self.transport.upstream()
    }
}

#[async_trait]
impl DnsResolver for UpstreamResolver {
    async fn resolve(&self, domain: &str) -> Result<Vec<IpAddr>, DomainError> {
        let (query_id, request) = MessageBuilder::build_query_with_id(domain, RecordType::A)?;

        let response = self.transport.exchange(&request).await?;
        let parsed = ResponseParser::parse(&response)?;

        if parsed.is_nxdomain() {
            return Err(DomainError::InvalidDnsResponse(format!(
                "{} does not exist (NXDOMAIN from {})",
                domain,
                self.upstream()
            )));
        }
        if parsed.is_server_error() {
            return Err(DomainError::InvalidDnsResponse(format!(
                "upstream {} failed for {}: {}",
                self.upstream(),
                domain,
                ResponseParser::rcode_to_status(parsed.rcode)
            )));
        }
        if parsed.rcode != ResponseCode::NoError {
            return Err(DomainError::InvalidDnsResponse(format!(
                "upstream {} answered {} for {}",
                self.upstream(),
                ResponseParser::rcode_to_status(parsed.rcode),
                domain
            )));
        }
        if parsed.is_nodata() {
            debug!(domain = %domain, upstream = %self.upstream(), "Upstream has no A records");
        }

        debug!(
            domain = %domain,
            upstream = %self.upstream(),
            query_id,
            addresses = parsed.addresses.len(),
            truncated = parsed.truncated,
            min_ttl = ?parsed.min_ttl,
            "Upstream resolution complete"
        );

        Ok(parsed.addresses)
    }
}
