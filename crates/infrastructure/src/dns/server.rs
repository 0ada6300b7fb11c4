use dns_relay_application::use_cases::ForwardQueryUseCase;
use dns_relay_domain::DomainError;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{debug, warn};

/// Glue between the UDP listener and the forwarding use case.
#[derive(Clone)]
pub struct DnsServerHandler {
    use_case: Arc<ForwardQueryUseCase>,
}

impl DnsServerHandler {
    pub fn new(use_case: Arc<ForwardQueryUseCase>) -> Self {
        Self { use_case }
    }

    /// Returns the reply to send, or `None` when the datagram is dropped.
    pub async fn handle_datagram(&self, datagram: &[u8], client: SocketAddr) -> Option<Vec<u8>> {
        match self.use_case.execute(datagram).await {
            Ok(reply) => {
                debug!(client = %client, reply_bytes = reply.len(), "Reply ready");
                Some(reply)
            }
            Err(e) if e.is_malformed_query() => {
                debug!(client = %client, bytes = datagram.len(), error = %e, "Malformed query dropped");
                None
            }
            Err(e @ DomainError::UnsupportedAddressFamily(_)) => {
                warn!(client = %client, error = %e, "Upstream returned no IPv4 address");
                None
            }
            Err(e) => {
                warn!(client = %client, error = %e, "Query dropped");
                None
            }
        }
    }
}
