use super::derive_message;
use hickory_proto::op::Message;
use shard_dns_domain::ShardSpec;

/// Builds the query for the unsharded name that goes down the chain.
pub struct UpstreamQueryBuilder;

impl UpstreamQueryBuilder {
    /// Same header as `original` (authority cleared), one `IN A` question
    /// for the base name, no records.
    pub fn build(original: &Message, spec: &ShardSpec) -> Message {
        derive_message(original, spec.base_name())
    }
}
