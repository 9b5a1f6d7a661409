//! Worker command-line contract
//!
//! The launcher invokes this binary on every node with the same arguments;
//! the orchestrator constructs them positionally, so the names here are
//! wire-frozen.

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "shardchat-worker", about = "ShardChat distributed generation worker")]
pub struct Args {
    /// Model identifier to serve
    #[arg(long)]
    pub model: String,

    /// Assembled prompt text
    #[arg(long)]
    pub prompt: String,

    /// Maximum number of tokens to generate (the engine's own default)
    #[arg(long, default_value_t = 32)]
    pub max_tokens: u32,
}
