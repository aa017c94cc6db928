use shard_dns_application::ports::{RequestContext, RequestProtocol};
use shard_dns_infrastructure::dns::transport::tcp::{read_framed, write_framed};
use shard_dns_infrastructure::dns::DnsServerHandler;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::unix::AsyncFd;
use tokio::io::Interest;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

pub async fn start_dns_server(
    socket_addr: SocketAddr,
    handler: DnsServerHandler,
    num_workers: usize,
    tcp_idle_timeout: Duration,
) -> anyhow::Result<()> {
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };

    info!(bind_address = %socket_addr, num_workers, "Starting DNS server with SO_REUSEPORT");

    let handler = Arc::new(handler);
    let mut join_set: JoinSet<()> = JoinSet::new();

    for i in 0..num_workers {
        let udp_socket = Arc::new(create_udp_socket(domain, socket_addr)?);
        let handler_udp = handler.clone();
        join_set.spawn(async move {
            run_udp_worker(udp_socket, handler_udp, i).await;
        });

        let tcp_listener = create_tcp_listener(domain, socket_addr)?;
        let handler_tcp = handler.clone();
        join_set.spawn(async move {
            run_tcp_worker(tcp_listener, handler_tcp, tcp_idle_timeout, i).await;
        });
    }

    info!("DNS server ready - {} workers on {}", num_workers, socket_addr);

    while join_set.join_next().await.is_some() {}
    Ok(())
}

async fn run_udp_worker(
    socket: Arc<AsyncFd<std::net::UdpSocket>>,
    handler: Arc<DnsServerHandler>,
    worker_id: usize,
) {
    let mut recv_buf = [0u8; 4096];

    loop {
        let mut guard = match socket.readable().await {
            Ok(g) => g,
            Err(_) => break,
        };

        loop {
            match socket.get_ref().recv_from(&mut recv_buf) {
                Ok((n, from)) => {
                    let handler = handler.clone();
                    let socket = socket.clone();
                    let owned_buf: Arc<[u8]> = Arc::from(&recv_buf[..n]);
                    tokio::spawn(async move {
                        let ctx = RequestContext::new(from, RequestProtocol::Udp);
                        if let Some(response) = handler.handle_raw(&owned_buf, ctx).await {
                            send_udp(&socket, &response, from).await;
                        }
                    });
                }
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    guard.clear_ready();
                    break;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    error!(worker = worker_id, error = %e, "UDP recv error");
                    guard.clear_ready();
                    break;
                }
            }
        }
    }
}

async fn send_udp(socket: &AsyncFd<std::net::UdpSocket>, response: &[u8], to: SocketAddr) {
    let result = socket
        .async_io(Interest::WRITABLE, |inner| inner.send_to(response, to))
        .await;
    if let Err(e) = result {
        warn!(client = %to, error = %e, "UDP send failed");
    }
}

async fn run_tcp_worker(
    listener: TcpListener,
    handler: Arc<DnsServerHandler>,
    idle_timeout: Duration,
    worker_id: usize,
) {
    loop {
        match listener.accept().await {
            Ok((stream, peer)) => {
                let handler = handler.clone();
                tokio::spawn(async move {
                    serve_tcp_connection(stream, peer, handler, idle_timeout).await;
                });
            }
            Err(e) => {
                error!(worker = worker_id, error = %e, "TCP accept error");
            }
        }
    }
}

/// Answers framed queries on one connection until the client closes it or
/// stays idle past `idle_timeout`.
async fn serve_tcp_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    handler: Arc<DnsServerHandler>,
    idle_timeout: Duration,
) {
    let ctx = RequestContext::new(peer, RequestProtocol::Tcp);

    loop {
        let query = match tokio::time::timeout(idle_timeout, read_framed(&mut stream)).await {
            Ok(Ok(query)) => query,
            Ok(Err(e)) if e.kind() == io::ErrorKind::UnexpectedEof => break,
            Ok(Err(e)) => {
                debug!(client = %peer, error = %e, "TCP read failed");
                break;
            }
            Err(_) => {
                debug!(client = %peer, "TCP connection idle, closing");
                break;
            }
        };

        let Some(response) = handler.handle_raw(&query, ctx).await else {
            continue;
        };

        if let Err(e) = write_framed(&mut stream, &response).await {
            debug!(client = %peer, error = %e, "TCP write failed");
            break;
        }
    }
}

fn create_udp_socket(
    domain: Domain,
    socket_addr: SocketAddr,
) -> anyhow::Result<AsyncFd<std::net::UdpSocket>> {
    let socket = Socket::new(domain, Type::DGRAM, Some(Protocol::UDP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.set_recv_buffer_size(512 * 1024)?;
    socket.set_send_buffer_size(512 * 1024)?;
    socket.bind(&socket_addr.into())?;
    socket.set_nonblocking(true)?;
    let std_socket: std::net::UdpSocket = socket.into();
    Ok(AsyncFd::with_interest(
        std_socket,
        Interest::READABLE | Interest::WRITABLE,
    )?)
}

fn create_tcp_listener(domain: Domain, socket_addr: SocketAddr) -> anyhow::Result<TcpListener> {
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    #[cfg(unix)]
    socket.set_reuse_port(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;
    socket.set_nonblocking(true)?;
    let std_listener: std::net::TcpListener = socket.into();
    Ok(TcpListener::from_std(std_listener)?)
}
