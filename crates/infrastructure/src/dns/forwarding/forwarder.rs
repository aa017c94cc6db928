//! Terminal handler of every chain: sends the request to the configured
//! upstreams and writes back whatever the first one to answer says.

use crate::dns::transport::{create_transport, tcp::TcpTransport, DnsTransport};
use async_trait::async_trait;
use hickory_proto::op::{Message, ResponseCode};
use shard_dns_application::ports::{DnsHandler, RequestContext, ResponseSink};
use shard_dns_domain::config::{ConfigError, UpstreamConfig};
use shard_dns_domain::{DnsProtocol, DomainError};
use std::time::Duration;
use tracing::{debug, warn};

pub const FORWARD_HANDLER: &str = "forward";

pub struct ForwardHandler {
    upstreams: Vec<DnsProtocol>,
    timeout: Duration,
}

impl ForwardHandler {
    pub fn new(upstreams: Vec<DnsProtocol>, timeout: Duration) -> Self {
        Self { upstreams, timeout }
    }

    pub fn from_config(config: &UpstreamConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            config.protocols()?,
            Duration::from_millis(config.timeout_ms),
        ))
    }

    pub fn upstreams(&self) -> &[DnsProtocol] {
        &self.upstreams
    }

    async fn exchange(
        &self,
        upstream: &DnsProtocol,
        request_bytes: &[u8],
        request_id: u16,
    ) -> Result<Message, DomainError> {
        let transport = create_transport(upstream);
        let reply = transport.send(request_bytes, self.timeout).await?;
        let mut response = parse_response(&reply.bytes)?;

        if response.truncated() && matches!(upstream, DnsProtocol::Udp { .. }) {
            debug!(upstream = %upstream, "Truncated UDP response, retrying over TCP");
            let tcp = TcpTransport::new(upstream.socket_addr());
            let reply = tcp.send(request_bytes, self.timeout).await?;
            response = parse_response(&reply.bytes)?;
        }

        if response.id() != request_id {
            return Err(DomainError::InvalidDnsResponse(format!(
                "Response id {} does not match query id {} from {}",
                response.id(),
                request_id,
                upstream
            )));
        }

        Ok(response)
    }
}

fn parse_response(bytes: &[u8]) -> Result<Message, DomainError> {
    Message::from_vec(bytes).map_err(|e| {
        DomainError::InvalidDnsResponse(format!("Failed to parse DNS response: {}", e))
    })
}

#[async_trait]
impl DnsHandler for ForwardHandler {
    fn name(&self) -> &'static str {
        FORWARD_HANDLER
    }

    async fn serve(
        &self,
        ctx: &RequestContext,
        sink: &mut dyn ResponseSink,
        request: &Message,
    ) -> Result<ResponseCode, DomainError> {
        let request_bytes = request
            .to_vec()
            .map_err(|e| DomainError::InvalidDnsMessage(e.to_string()))?;

        for upstream in &self.upstreams {
            match self.exchange(upstream, &request_bytes, request.id()).await {
                Ok(response) => {
                    let code = response.response_code();
                    debug!(
                        upstream = %upstream,
                        client = %ctx.client,
                        answers = response.answers().len(),
                        rcode = ?code,
                        "Upstream answered"
                    );
                    sink.write_message(response).await?;
                    return Ok(code);
                }
                Err(e) => {
                    warn!(upstream = %upstream, error = %e, "Upstream exchange failed");
                }
            }
        }

        Err(DomainError::TransportAllServersUnreachable)
    }
}
