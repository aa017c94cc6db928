use super::derive_message;
use hickory_proto::op::Message;
use hickory_proto::rr::Record;
use shard_dns_domain::ShardSpec;

/// Builds the client-facing reply from the upstream one.
pub struct ResponseRewriter;

impl ResponseRewriter {
    /// Upstream header (authority cleared), the requested name as the only
    /// question and `selected` as the whole answer section. Authority and
    /// additional sections are left empty.
    pub fn rewrite(upstream: &Message, spec: &ShardSpec, selected: Vec<Record>) -> Message {
        let mut response = derive_message(upstream, spec.requested_name());
        response.add_answers(selected);
        response
    }
}
