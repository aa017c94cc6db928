//! Shard DNS Application Layer
//!
//! The handler-chain ports and the shard filter that plugs into them.
pub mod ports;
pub mod use_cases;
