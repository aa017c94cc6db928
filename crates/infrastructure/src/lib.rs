//! Shard DNS Infrastructure Layer
pub mod dns;
