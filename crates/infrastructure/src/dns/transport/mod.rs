pub mod tcp;
pub mod udp;

use async_trait::async_trait;
use shard_dns_domain::{DnsProtocol, DomainError};
use std::time::Duration;

#[derive(Debug)]
pub struct TransportResponse {
    pub bytes: Vec<u8>,

    pub protocol_used: &'static str,
}

#[async_trait]
pub trait DnsTransport: Send + Sync {
    async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError>;

    fn protocol_name(&self) -> &'static str;
}

pub enum Transport {
    Udp(udp::UdpTransport),
    Tcp(tcp::TcpTransport),
}

impl Transport {
    pub async fn send(
        &self,
        message_bytes: &[u8],
        timeout: Duration,
    ) -> Result<TransportResponse, DomainError> {
        match self {
            Self::Udp(t) => DnsTransport::send(t, message_bytes, timeout).await,
            Self::Tcp(t) => DnsTransport::send(t, message_bytes, timeout).await,
        }
    }

    pub fn protocol_name(&self) -> &'static str {
        match self {
            Self::Udp(_) => "UDP",
            Self::Tcp(_) => "TCP",
        }
    }
}

pub fn create_transport(protocol: &DnsProtocol) -> Transport {
    match protocol {
        DnsProtocol::Udp { addr } => Transport::Udp(udp::UdpTransport::new(*addr)),
        DnsProtocol::Tcp { addr } => Transport::Tcp(tcp::TcpTransport::new(*addr)),
    }
}

pub(crate) fn timeout_error(server: impl ToString) -> DomainError {
    DomainError::TransportTimeout {
        server: server.to_string(),
    }
}

pub(crate) fn io_error(server: impl ToString, error: std::io::Error) -> DomainError {
    let server = server.to_string();
    match error.kind() {
        std::io::ErrorKind::ConnectionRefused => DomainError::TransportConnectionRefused { server },
        std::io::ErrorKind::ConnectionReset | std::io::ErrorKind::ConnectionAborted => {
            DomainError::TransportConnectionReset { server }
        }
        _ => DomainError::IoError(format!("{}: {}", server, error)),
    }
}
