use hickory_proto::rr::{RData, Record};
use shard_dns_domain::ShardSpec;
use std::net::Ipv4Addr;

/// Picks the A records owned by one shard.
pub struct AnswerSelector;

impl AnswerSelector {
    /// Returns copies of this shard's A records for the base name, renamed
    /// to the requested name.
    ///
    /// Candidates are ranked by address bytes before partitioning, so the
    /// result does not depend on the order upstream returned them in. Every
    /// other record (other owners, CNAMEs, AAAA, ...) is dropped.
    pub fn select(answers: &[Record], spec: &ShardSpec) -> Vec<Record> {
        let mut candidates: Vec<(Ipv4Addr, &Record)> = answers
            .iter()
            .filter(|record| record.name() == spec.base_name())
            .filter_map(|record| match record.data() {
                RData::A(a) => Some((a.0, record)),
                _ => None,
            })
            .collect();

        candidates.sort_by_key(|(address, _)| address.octets());

        candidates
            .into_iter()
            .enumerate()
            .filter(|(index, _)| spec.contains(index + 1))
            .map(|(_, (_, record))| {
                let mut sharded = record.clone();
                sharded.set_name(spec.requested_name().clone());
                sharded
            })
            .collect()
    }
}
