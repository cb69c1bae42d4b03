//! TTLKV Stress Binary
//!
//! Hammers one in-process store from many threads and verifies the final
//! state only holds values that were actually written.

use clap::Parser;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use ttlkv::StressConfig;

/// TTLKV Stress - Concurrent Store Consistency Check
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Worker threads (0 = auto-detect based on CPU cores)
    #[arg(short, long, default_value_t = 0)]
    threads: usize,

    /// Operations per worker thread
    #[arg(short, long, default_value_t = 100_000)]
    iterations: u32,

    /// Number of distinct keys shared by all workers
    #[arg(short, long, default_value_t = 16)]
    keys: usize,

    /// TTL in milliseconds for expiring sets
    #[arg(long, default_value_t = 5)]
    ttl_ms: u64,
}

fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("ttlkv=info".parse()?))
        .init();

    let args = Args::parse();

    let config = StressConfig::default()
        .with_threads(args.threads)
        .with_iterations(args.iterations)
        .with_key_space(args.keys)
        .with_ttl(Duration::from_millis(args.ttl_ms));

    info!(
        "Running TTLKV stress with {} threads x {} ops over {} keys",
        config.effective_threads(),
        args.iterations,
        args.keys
    );

    let report = ttlkv::stress::run(&config)?;
    println!("{}", report.report());
    println!("{}", report.metrics_summary);

    if !report.is_consistent() {
        anyhow::bail!("store ended in an inconsistent state ({} problems)", report.inconsistencies);
    }

    Ok(())
}
