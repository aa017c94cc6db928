use super::{AnswerSelector, ResponseRewriter};
use crate::ports::ResponseSink;
use async_trait::async_trait;
use hickory_proto::op::Message;
use shard_dns_domain::{DomainError, ShardSpec};
use tracing::debug;

/// Wraps the client's sink while the base-name query runs down the chain.
///
/// Messages are narrowed to the shard and renamed before being forwarded;
/// raw writes go through untouched.
pub struct ShardingSink<'a, S: ?Sized> {
    inner: &'a mut S,
    spec: &'a ShardSpec,
}

impl<'a, S: ResponseSink + ?Sized> ShardingSink<'a, S> {
    pub fn new(inner: &'a mut S, spec: &'a ShardSpec) -> Self {
        Self { inner, spec }
    }
}

#[async_trait]
impl<S: ResponseSink + ?Sized> ResponseSink for ShardingSink<'_, S> {
    async fn write_message(&mut self, response: Message) -> Result<(), DomainError> {
        let selected = AnswerSelector::select(response.answers(), self.spec);

        debug!(
            requested = %self.spec.requested_fqdn(),
            upstream_answers = response.answers().len(),
            selected = selected.len(),
            "Sharded upstream answer"
        );

        let rewritten = ResponseRewriter::rewrite(&response, self.spec, selected);
        self.inner.write_message(rewritten).await
    }

    async fn write_raw(&mut self, bytes: &[u8]) -> Result<usize, DomainError> {
        self.inner.write_raw(bytes).await
    }
}
