pub mod shard;

pub use shard::{
    AnswerSelector, ResponseRewriter, ShardFilter, ShardingSink, UpstreamQueryBuilder,
};
