use super::ResponseSink;
use async_trait::async_trait;
use hickory_proto::op::{Message, ResponseCode};
use shard_dns_domain::DomainError;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestProtocol {
    Udp,
    Tcp,
}

impl fmt::Display for RequestProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Udp => f.write_str("udp"),
            Self::Tcp => f.write_str("tcp"),
        }
    }
}

/// Per-request facts handlers may log; never mutated down the chain.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext {
    pub client: SocketAddr,
    pub protocol: RequestProtocol,
}

impl RequestContext {
    pub fn new(client: SocketAddr, protocol: RequestProtocol) -> Self {
        Self { client, protocol }
    }
}

#[async_trait]
pub trait DnsHandler: Send + Sync {
    fn name(&self) -> &'static str;

    /// Serve `request`, writing at most one response to `sink`.
    ///
    /// The returned code tells the server what to answer when nothing was
    /// written.
    async fn serve(
        &self,
        ctx: &RequestContext,
        sink: &mut dyn ResponseSink,
        request: &Message,
    ) -> Result<ResponseCode, DomainError>;
}

/// Hand the request to `next`, or fail when `name` is the end of the chain.
pub async fn next_or_failure(
    name: &'static str,
    next: Option<&Arc<dyn DnsHandler>>,
    ctx: &RequestContext,
    sink: &mut dyn ResponseSink,
    request: &Message,
) -> Result<ResponseCode, DomainError> {
    match next {
        Some(next) => next.serve(ctx, sink, request).await,
        None => Err(DomainError::NoNextHandler(name)),
    }
}
