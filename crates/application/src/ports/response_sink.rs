use async_trait::async_trait;
use hickory_proto::op::Message;
use shard_dns_domain::DomainError;

/// Where a handler writes its answer.
///
/// Handlers in the chain may wrap the sink they receive to rewrite what
/// the handlers after them produce.
#[async_trait]
pub trait ResponseSink: Send {
    async fn write_message(&mut self, response: Message) -> Result<(), DomainError>;

    /// Raw wire bytes, for handlers that already hold an encoded reply.
    async fn write_raw(&mut self, bytes: &[u8]) -> Result<usize, DomainError>;
}
