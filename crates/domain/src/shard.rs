pub mod codec;
pub mod spec;

pub use codec::ShardNameCodec;
pub use spec::{ShardSpec, MAX_SHARDS};
