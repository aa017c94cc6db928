use hickory_proto::rr::Name;
use std::sync::Arc;

/// Upper bound on `num_shards` accepted by the default codec.
pub const MAX_SHARDS: u32 = 256;

/// A parsed `<shard>.<num_shards>.<base>` request name.
///
/// Only [`ShardNameCodec`](super::ShardNameCodec) builds these, so every
/// value satisfies `1 <= shard <= num_shards <= max_shards` and carries a
/// fully-qualified base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShardSpec {
    requested_fqdn: Arc<str>,
    base_fqdn: Arc<str>,
    requested_name: Name,
    base_name: Name,
    shard: u32,
    num_shards: u32,
}

impl ShardSpec {
    pub(crate) fn new(
        requested_fqdn: &str,
        requested_name: Name,
        base_fqdn: &str,
        base_name: Name,
        shard: u32,
        num_shards: u32,
    ) -> Self {
        Self {
            requested_fqdn: requested_fqdn.into(),
            base_fqdn: base_fqdn.into(),
            requested_name,
            base_name,
            shard,
            num_shards,
        }
    }

    pub fn requested_fqdn(&self) -> &str {
        &self.requested_fqdn
    }

    pub fn base_fqdn(&self) -> &str {
        &self.base_fqdn
    }

    /// Owner name the client asked for; answers are rewritten to it.
    pub fn requested_name(&self) -> &Name {
        &self.requested_name
    }

    /// Unsharded name sent down the handler chain.
    pub fn base_name(&self) -> &Name {
        &self.base_name
    }

    pub fn shard(&self) -> u32 {
        self.shard
    }

    pub fn num_shards(&self) -> u32 {
        self.num_shards
    }

    /// Whether the record at 1-based `rank` belongs to this shard.
    ///
    /// Ranks are split into `num_shards` residue classes, so for a fixed
    /// `num_shards` each rank is owned by exactly one shard.
    pub fn contains(&self, rank: usize) -> bool {
        let num_shards = self.num_shards as usize;
        rank % num_shards == self.shard as usize % num_shards
    }
}

impl std::fmt::Display for ShardSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} (shard {}/{} of {})",
            self.requested_fqdn, self.shard, self.num_shards, self.base_fqdn
        )
    }
}
