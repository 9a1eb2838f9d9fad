//! Oracle Registry
//!
//! Registers external reporters and assigns each a fixed triple of shard
//! indexes from a deliberately small index space, so that any request can be
//! answered only by the subset of oracles holding its index.

pub mod entropy;
pub mod registry;

pub use entropy::{EntropySource, FixedEntropy, KeccakEntropy};
pub use registry::{Oracle, OracleRegistry};
