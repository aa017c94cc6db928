//! Serves `<shard>.<num_shards>.<base>` A queries from a slice of the
//! `<base>` answer set.
//!
//! ```text
//! request ──▶ ShardNameCodec ── no match ──▶ next handler (unchanged)
//!                  │ match
//!                  ▼
//!          UpstreamQueryBuilder ──▶ next handler ──▶ ShardingSink
//!                                                      │
//!                             AnswerSelector + ResponseRewriter
//!                                                      ▼
//!                                                 client sink
//! ```

mod answer_selector;
mod filter;
mod response_rewriter;
mod sharding_sink;
mod upstream_query;

pub use answer_selector::AnswerSelector;
pub use filter::ShardFilter;
pub use response_rewriter::ResponseRewriter;
pub use sharding_sink::ShardingSink;
pub use upstream_query::UpstreamQueryBuilder;

use hickory_proto::op::{Message, Query};
use hickory_proto::rr::{DNSClass, Name, RecordType};

/// New message carrying `source`'s header and a single `IN A` question for
/// `name`. Never claims authority; all record sections start empty.
fn derive_message(source: &Message, name: &Name) -> Message {
    let mut message = Message::new(source.id(), source.message_type(), source.op_code());
    message
        .set_authoritative(false)
        .set_truncated(source.truncated())
        .set_recursion_desired(source.recursion_desired())
        .set_recursion_available(source.recursion_available())
        .set_authentic_data(source.authentic_data())
        .set_checking_disabled(source.checking_disabled())
        .set_response_code(source.response_code());

    let mut question = Query::query(name.clone(), RecordType::A);
    question.set_query_class(DNSClass::IN);
    message.add_query(question);

    message
}
