use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

/// Upstream endpoint the forwarding handler talks to.
///
/// Accepted forms: `udp://IP:PORT`, `tcp://IP:PORT`, or a bare `IP:PORT`
/// (UDP).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DnsProtocol {
    Udp { addr: SocketAddr },
    Tcp { addr: SocketAddr },
}

impl DnsProtocol {
    pub fn socket_addr(&self) -> SocketAddr {
        match self {
            DnsProtocol::Udp { addr } | DnsProtocol::Tcp { addr } => *addr,
        }
    }

    pub fn protocol_name(&self) -> &'static str {
        match self {
            DnsProtocol::Udp { .. } => "UDP",
            DnsProtocol::Tcp { .. } => "TCP",
        }
    }
}

fn parse_socket_addr(kind: &str, addr_str: &str) -> Result<SocketAddr, String> {
    addr_str
        .parse::<SocketAddr>()
        .map_err(|_| format!("Invalid {} address '{}'", kind, addr_str))
}

impl FromStr for DnsProtocol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(addr_str) = s.strip_prefix("udp://") {
            let addr = parse_socket_addr("UDP", addr_str)?;
            return Ok(DnsProtocol::Udp { addr });
        }
        if let Some(addr_str) = s.strip_prefix("tcp://") {
            let addr = parse_socket_addr("TCP", addr_str)?;
            return Ok(DnsProtocol::Tcp { addr });
        }
        if s.contains("://") {
            return Err(format!(
                "Unsupported upstream scheme in '{}'. Expected 'udp://' or 'tcp://'",
                s
            ));
        }
        let addr = parse_socket_addr("UDP", s)?;
        Ok(DnsProtocol::Udp { addr })
    }
}

impl fmt::Display for DnsProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DnsProtocol::Udp { addr } => write!(f, "udp://{}", addr),
            DnsProtocol::Tcp { addr } => write!(f, "tcp://{}", addr),
        }
    }
}
