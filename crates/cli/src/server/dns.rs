use dns_relay_domain::DomainError;
use dns_relay_infrastructure::dns::DnsServerHandler;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::UdpSocket;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

/// Classic DNS-over-UDP payload limit; longer datagrams are cut by the read.
const RECV_BUFFER_SIZE: usize = 512;

const RECV_ERROR_BACKOFF: Duration = Duration::from_millis(50);

pub async fn start_dns_server(
    bind_addr: String,
    handler: DnsServerHandler,
    max_concurrent: usize,
) -> anyhow::Result<()> {
    let socket_addr: SocketAddr = bind_addr.parse()?;
    let socket = Arc::new(create_udp_socket(socket_addr)?);

    info!(bind_address = %socket_addr, max_concurrent, "DNS server ready");

    tokio::select! {
        _ = run_udp_loop(socket, handler, max_concurrent) => {}
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    Ok(())
}

/// Receives until the semaphore closes. Each datagram is answered on its own
/// task; at most `max_concurrent` are in flight and the loop waits for a
/// permit before reading the next one.
pub(crate) async fn run_udp_loop(
    socket: Arc<UdpSocket>,
    handler: DnsServerHandler,
    max_concurrent: usize,
) {
    let handler = Arc::new(handler);
    let permits = Arc::new(Semaphore::new(max_concurrent));
    let mut recv_buf = [0u8; RECV_BUFFER_SIZE];

    loop {
        let permit = match permits.clone().acquire_owned().await {
            Ok(p) => p,
            Err(_) => break,
        };

        let (n, from) = match socket.recv_from(&mut recv_buf).await {
            Ok(r) => r,
            Err(e) => {
                match recv_error_backoff(&e) {
                    None => debug!(error = %e, "Transient UDP recv error"),
                    Some(pause) => {
                        warn!(error = %e, pause_ms = pause.as_millis() as u64, "UDP recv error");
                        tokio::time::sleep(pause).await;
                    }
                }
                continue;
            }
        };

        let datagram: Arc<[u8]> = Arc::from(&recv_buf[..n]);
        let handler = handler.clone();
        let socket = socket.clone();

        tokio::spawn(async move {
            let _permit = permit;
            answer_datagram(&handler, &socket, &datagram, from).await;
        });
    }
}

/// Returns true when a reply went out. Failures stay with this datagram.
async fn answer_datagram(
    handler: &DnsServerHandler,
    socket: &UdpSocket,
    datagram: &[u8],
    client: SocketAddr,
) -> bool {
    let Some(reply) = handler.handle_datagram(datagram, client).await else {
        return false;
    };

    match socket.send_to(&reply, client).await {
        Ok(_) => {
            debug!(client = %client, bytes = reply.len(), "Reply sent");
            true
        }
        Err(e) => {
            let failure = DomainError::SendFailure(e.to_string());
            error!(client = %client, error = %failure, "Reply not sent");
            false
        }
    }
}

/// `None` for errors tied to a single datagram (signals, ICMP unreachable
/// surfaced as a reset); anything else pauses the loop before retrying.
fn recv_error_backoff(e: &io::Error) -> Option<Duration> {
    match e.kind() {
        io::ErrorKind::Interrupted
        | io::ErrorKind::WouldBlock
        | io::ErrorKind::ConnectionReset
        | io::ErrorKind::ConnectionRefused => None,
        _ => Some(RECV_ERROR_BACKOFF),
    }
}

fn create_udp_socket(socket_addr: SocketAddr) -> anyhow::Result<UdpSocket> {
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.set_recv_buffer_size(512 * 1024)?;
    socket.set_send_buffer_size(512 * 1024)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;
    let std_socket: std::net::UdpSocket = socket.into();
    Ok(UdpSocket::from_std(std_socket)?)
}
