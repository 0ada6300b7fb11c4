//! Plain DNS over UDP (RFC 1035 §4.2.1).
//!
//! One ephemeral socket per exchange. A reply counts only when it comes
//! from the upstream's exact address and carries the query's id; anything
//! else is skipped until the deadline. Replies are read into a 512-byte
//! buffer, so anything longer arrives cut; there is no TCP fallback.

use super::DnsTransport;
use async_trait::async_trait;
use dns_relay_domain::DomainError;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::time::Instant;
use tracing::{debug, warn};

const UPSTREAM_REPLY_LIMIT: usize = 512;

pub struct UdpTransport {
    server_addr: SocketAddr,
    timeout: Duration,
}

impl UdpTransport {
    pub fn new(server_addr: SocketAddr, timeout: Duration) -> Self {
        Self {
            server_addr,
            timeout,
        }
    }

    fn local_bind_addr(&self) -> SocketAddr {
        match self.server_addr {
            SocketAddr::V4(_) => (Ipv4Addr::UNSPECIFIED, 0).into(),
            SocketAddr::V6(_) => (Ipv6Addr::UNSPECIFIED, 0).into(),
        }
    }

    async fn recv_matching(&self, socket: &UdpSocket, query_id: &[u8]) -> io::Result<Vec<u8>> {
        let mut buf = vec![0u8; UPSTREAM_REPLY_LIMIT];
        loop {
            let (len, source) = socket.recv_from(&mut buf).await?;
            if source != self.server_addr {
                warn!(upstream = %self.server_addr, source = %source, "Ignoring stray datagram");
                continue;
            }
            if len < query_id.len() || buf[..query_id.len()] != *query_id {
                warn!(upstream = %self.server_addr, bytes = len, "Ignoring reply with foreign id");
                continue;
            }
            buf.truncate(len);
            return Ok(buf);
        }
    }
}

#[async_trait]
impl DnsTransport for UdpTransport {
    async fn exchange(&self, query: &[u8]) -> Result<Vec<u8>, DomainError> {
        let deadline = Instant::now() + self.timeout;

        let socket = UdpSocket::bind(self.local_bind_addr())
            .await
            .map_err(|e| DomainError::IoError(format!("bind for upstream query: {}", e)))?;

        tokio::time::timeout_at(deadline, socket.send_to(query, self.server_addr))
            .await
            .map_err(|_| DomainError::TransportTimeout {
                server: self.server_addr.to_string(),
            })?
            .map_err(|e| DomainError::IoError(format!("send to {}: {}", self.server_addr, e)))?;

        let query_id = query.get(..2).unwrap_or(query);
        let reply = tokio::time::timeout_at(deadline, self.recv_matching(&socket, query_id))
            .await
            .map_err(|_| DomainError::QueryTimeout)?
            .map_err(|e| DomainError::IoError(format!("recv from {}: {}", self.server_addr, e)))?;

        debug!(
            upstream = %self.server_addr,
            sent = query.len(),
            received = reply.len(),
            "Upstream exchange complete"
        );

        Ok(reply)
    }

    fn upstream(&self) -> SocketAddr {
        self.server_addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_family_follows_upstream() {
        let v4 = UdpTransport::new("8.8.8.8:53".parse().unwrap(), Duration::from_secs(1));
        assert!(v4.local_bind_addr().is_ipv4());

        let v6 = UdpTransport::new(
            "[2001:4860:4860::8888]:53".parse().unwrap(),
            Duration::from_secs(1),
        );
        assert!(v6.local_bind_addr().is_ipv6());
        assert_eq!(v6.upstream().port(), 53);
    }

    #[tokio::test]
    async fn test_silent_upstream_times_out() {
        let silent = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let transport = UdpTransport::new(silent.local_addr().unwrap(), Duration::from_millis(50));

        let result = transport.exchange(&[0u8; 12]).await;

        assert!(matches!(result, Err(DomainError::QueryTimeout)));
    }

    #[tokio::test]
    async fn test_datagram_from_other_port_is_skipped() {
        let upstream = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let impostor = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let transport = UdpTransport::new(upstream.local_addr().unwrap(), Duration::from_secs(2));

        tokio::spawn(async move {
            let mut buf = [0u8; 64];
            let (len, from) = upstream.recv_from(&mut buf).await.unwrap();
            impostor.send_to(&buf[..len], from).await.unwrap();
            tokio::time::sleep(Duration::from_millis(20)).await;
            upstream.send_to(&[0x12, 0x34, 0xEE], from).await.unwrap();
        });

        let reply = transport.exchange(&[0x12, 0x34, 0x01]).await.unwrap();
        assert_eq!(reply, vec![0x12, 0x34, 0xEE]);
    }

    #[tokio::test]
    async fn test_reply_with_foreign_id_is_skipped() {
        let upstream = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let transport = UdpTransport::new(upstream.local_addr().unwrap(), Duration::from_secs(2));

        tokio::spawn(async move {
            let mut buf = [0u8; 64];
            let (_, from) = upstream.recv_from(&mut buf).await.unwrap();
            upstream.send_to(&[0xDE, 0xAD, 0x00], from).await.unwrap();
            upstream.send_to(&[0x12], from).await.unwrap();
            upstream.send_to(&[0x12, 0x34, 0x7F], from).await.unwrap();
        });

        let reply = transport.exchange(&[0x12, 0x34, 0x01]).await.unwrap();
        assert_eq!(reply, vec![0x12, 0x34, 0x7F]);
    }

    #[tokio::test]
    async fn test_only_foreign_ids_time_out() {
        let upstream = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let transport =
            UdpTransport::new(upstream.local_addr().unwrap(), Duration::from_millis(100));

        tokio::spawn(async move {
            let mut buf = [0u8; 64];
            let (_, from) = upstream.recv_from(&mut buf).await.unwrap();
            upstream.send_to(&[0xDE, 0xAD, 0x00], from).await.unwrap();
        });

        let result = transport.exchange(&[0x12, 0x34, 0x01]).await;
        assert!(matches!(result, Err(DomainError::QueryTimeout)));
    }

    #[tokio::test]
    async fn test_reply_is_returned_verbatim() {
        let upstream = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let transport = UdpTransport::new(upstream.local_addr().unwrap(), Duration::from_secs(2));

        tokio::spawn(async move {
            let mut buf = [0u8; 64];
            let (len, from) = upstream.recv_from(&mut buf).await.unwrap();
            let mut reply = buf[..len].to_vec();
            reply.push(0xAB);
            upstream.send_to(&reply, from).await.unwrap();
        });

        let reply = transport.exchange(&[1, 2, 3]).await.unwrap();
        assert_eq!(reply, vec![1, 2, 3, 0xAB]);
    }
}
