//! Shard DNS Domain Layer
pub mod config;
pub mod dns_protocol;
pub mod errors;
pub mod shard;

pub use config::{CliOverrides, Config, ConfigError};
pub use dns_protocol::DnsProtocol;
pub use errors::DomainError;
pub use shard::{ShardNameCodec, ShardSpec, MAX_SHARDS};
