//! ShardChat Worker - Main Entry Point
//!
//! Started identically on every node by the external launcher. Joins the
//! distributed group, meets the pre-generation barrier, drives the external
//! engine, and reports from rank 0 only.

use anyhow::Result;
use clap::Parser;
use shardchat_worker::args::Args;
use shardchat_worker::runtime::GenerationEngine;
use shardchat_worker::{CliEngine, DistributedGroup, Reporter};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Diagnostics go to stderr: stdout is reserved for rank-0 output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shardchat_worker=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let group = DistributedGroup::from_env()?;
    debug!(rank = group.rank(), size = group.size(), "joined distributed group");

    let reporter = Reporter::new(group.is_coordinator());
    reporter.info(&format!(
        "Distributed group initialized: {} nodes",
        group.size()
    ));
    reporter.info("Loading model across nodes...");

    let mut engine = CliEngine::from_env();
    engine.load(&args.model)?;

    // no rank starts generating while another is still loading
    group.barrier()?;

    reporter.info("Generating response...");
    let generation = engine.generate(&args.prompt, args.max_tokens)?;

    reporter.output(&generation);
    Ok(())
}
