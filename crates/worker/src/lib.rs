//! ShardChat Worker
//!
//! Fan-out target the external launcher starts on every node in the host
//! list. Holds the coordination contract — group identity, pre-generation
//! barrier, rank-0 reporting — while token generation itself is the
//! external engine's job.

pub mod args;
pub mod group;
pub mod report;
pub mod runtime;

pub use group::DistributedGroup;
pub use report::Reporter;
pub use runtime::{CliEngine, Generation, GenerationEngine};
