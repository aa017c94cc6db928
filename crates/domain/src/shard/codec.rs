//! Recognizes `<shard>.<num_shards>.<base>` request names.
//!
//! Anything that does not decode into a valid [`ShardSpec`] is reported as
//! `None`: the request is simply not for us and goes down the chain as-is.

use super::spec::{ShardSpec, MAX_SHARDS};
use crate::errors::DomainError;
use fancy_regex::Regex;
use hickory_proto::rr::Name;

const SHARD_NAME_PATTERN: &str = r"^([1-9][0-9]*)\.([1-9][0-9]*)\.(.+)$";

pub struct ShardNameCodec {
    pattern: Regex,
    max_shards: u32,
}

impl ShardNameCodec {
    pub fn new(max_shards: u32) -> Result<Self, DomainError> {
        let pattern = Regex::new(SHARD_NAME_PATTERN)
            .map_err(|e| DomainError::InvalidShardPattern(e.to_string()))?;
        Ok(Self {
            pattern,
            max_shards,
        })
    }

    pub fn with_default_bound() -> Result<Self, DomainError> {
        Self::new(MAX_SHARDS)
    }

    pub fn max_shards(&self) -> u32 {
        self.max_shards
    }

    pub fn parse(&self, requested_fqdn: &str) -> Option<ShardSpec> {
        let captures = self.pattern.captures(requested_fqdn).ok().flatten()?;

        let shard: u32 = captures.get(1)?.as_str().parse().ok()?;
        let num_shards: u32 = captures.get(2)?.as_str().parse().ok()?;

        if shard < 1 || num_shards > self.max_shards || shard > num_shards {
            return None;
        }

        let base_fqdn = captures.get(3)?.as_str();
        let base_name = parse_fqdn(base_fqdn)?;
        let requested_name = parse_fqdn(requested_fqdn)?;

        Some(ShardSpec::new(
            requested_fqdn,
            requested_name,
            base_fqdn,
            base_name,
            shard,
            num_shards,
        ))
    }
}

/// Parses `name` only when it is a syntactically valid, fully-qualified
/// domain name.
fn parse_fqdn(name: &str) -> Option<Name> {
    if !name.ends_with('.') {
        return None;
    }
    if name != "." && name[..name.len() - 1].split('.').any(str::is_empty) {
        return None;
    }

    let parsed = Name::from_ascii(name).ok()?;
    parsed.is_fqdn().then_some(parsed)
}
