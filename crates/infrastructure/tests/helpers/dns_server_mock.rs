#![allow(dead_code)]
use std::net::{Ipv4Addr, SocketAddr};
use tokio::net::UdpSocket;
use tokio::sync::oneshot;

/// How the mock upstream answers each query.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// NOERROR with one A record per address.
    Answer(Vec<Ipv4Addr>),
    /// NOERROR with an empty answer section.
    NoData,
    /// NXDOMAIN.
    NxDomain,
    /// SERVFAIL.
    ServFail,
    /// Correct answer, but with the query id flipped.
    WrongId(Ipv4Addr),
    /// A flipped-id answer with the first address, then the real answer
    /// with the second.
    WrongIdThenAnswer(Ipv4Addr, Ipv4Addr),
    /// Never replies.
    Silent,
}

pub struct MockDnsServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
}

impl MockDnsServer {
    /// Binds an ephemeral port on loopback and serves until shut down or dropped.
    pub async fn start(behavior: MockBehavior) -> Result<Self, std::io::Error> {
        let socket = UdpSocket::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = socket.local_addr()?;

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            let mut buf = vec![0u8; 512];

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        break;
                    }
                    result = socket.recv_from(&mut buf) => {
                        if let Ok((len, peer)) = result {
                            let query = &buf[..len];
                            if let MockBehavior::WrongIdThenAnswer(decoy, real) = &behavior {
                                for step in [MockBehavior::WrongId(*decoy), MockBehavior::Answer(vec![*real])] {
                                    if let Some(response) = Self::build_mock_response(query, &step) {
                                        let _ = socket.send_to(&response, peer).await;
                                    }
                                }
                            } else if let Some(response) = Self::build_mock_response(query, &behavior) {
                                let _ = socket.send_to(&response, peer).await;
                            }
                        }
                    }
                }
            }
        });

        Ok(Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn build_mock_response(query: &[u8], behavior: &MockBehavior) -> Option<Vec<u8>> {
        if query.len() < 12 {
            return None;
        }

        let (id, rcode, addresses): (u16, u8, Vec<Ipv4Addr>) = {
            let id = u16::from_be_bytes([query[0], query[1]]);
            match behavior {
                MockBehavior::Answer(addrs) => (id, 0, addrs.clone()),
                MockBehavior::NoData => (id, 0, vec![]),
                MockBehavior::NxDomain => (id, 3, vec![]),
                MockBehavior::ServFail => (id, 2, vec![]),
                MockBehavior::WrongId(addr) => (!id, 0, vec![*addr]),
                MockBehavior::Silent | MockBehavior::WrongIdThenAnswer(..) => return None,
            }
        };

        let mut response = Vec::with_capacity(512);

        response.extend_from_slice(&id.to_be_bytes());

        response.push(0x81);
        response.push(0x80 | rcode);

        response.extend_from_slice(&query[4..6]);

        response.extend_from_slice(&(addresses.len() as u16).to_be_bytes());

        response.extend_from_slice(&[0x00, 0x00]);

        response.extend_from_slice(&[0x00, 0x00]);

        response.extend_from_slice(&query[12..]);

        for addr in addresses {
            response.extend_from_slice(&[
                0xc0, 0x0c,
                0x00, 0x01,
                0x00, 0x01,
                0x00, 0x00, 0x00, 0x3c,
                0x00, 0x04,
            ]);
            response.extend_from_slice(&addr.octets());
        }

        Some(response)
    }

    pub fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockDnsServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
