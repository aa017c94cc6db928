use super::{ShardingSink, UpstreamQueryBuilder};
use crate::ports::{next_or_failure, DnsHandler, RequestContext, ResponseSink};
use async_trait::async_trait;
use hickory_proto::op::{Message, ResponseCode};
use hickory_proto::rr::{DNSClass, RecordType};
use shard_dns_domain::config::plugins::SHARD_PLUGIN;
use shard_dns_domain::{DomainError, ShardNameCodec, ShardSpec};
use std::sync::Arc;
use tracing::{debug, info};

/// Handler that answers sharded A queries and forwards everything else
/// unchanged.
pub struct ShardFilter {
    codec: ShardNameCodec,
    next: Option<Arc<dyn DnsHandler>>,
}

impl ShardFilter {
    pub fn new(next: Option<Arc<dyn DnsHandler>>) -> Result<Self, DomainError> {
        Ok(Self::with_codec(ShardNameCodec::with_default_bound()?, next))
    }

    pub fn with_codec(codec: ShardNameCodec, next: Option<Arc<dyn DnsHandler>>) -> Self {
        Self { codec, next }
    }

    /// Only `IN A` questions are considered.
    fn sharded(&self, request: &Message) -> Option<ShardSpec> {
        let query = request.queries().first()?;
        if query.query_class() != DNSClass::IN || query.query_type() != RecordType::A {
            return None;
        }

        let requested_fqdn = query.name().to_lowercase().to_ascii();
        self.codec.parse(&requested_fqdn)
    }
}

#[async_trait]
impl DnsHandler for ShardFilter {
    fn name(&self) -> &'static str {
        SHARD_PLUGIN
    }

    async fn serve(
        &self,
        ctx: &RequestContext,
        sink: &mut dyn ResponseSink,
        request: &Message,
    ) -> Result<ResponseCode, DomainError> {
        let Some(spec) = self.sharded(request) else {
            debug!(id = request.id(), client = %ctx.client, "Not a sharded query, passing through");
            return next_or_failure(self.name(), self.next.as_ref(), ctx, sink, request).await;
        };

        info!(
            requested = %spec.requested_fqdn(),
            base = %spec.base_fqdn(),
            shard = spec.shard(),
            num_shards = spec.num_shards(),
            client = %ctx.client,
            "Shard A record"
        );

        let upstream_query = UpstreamQueryBuilder::build(request, &spec);
        let mut sharding_sink = ShardingSink::new(sink, &spec);

        next_or_failure(
            self.name(),
            self.next.as_ref(),
            ctx,
            &mut sharding_sink,
            &upstream_query,
        )
        .await
    }
}
