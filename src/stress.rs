//! Stress Harness
//!
//! Drives one shared store from many threads over a small key space, then
//! checks that every surviving value is one that was actually written for
//! that key.

use anyhow::{anyhow, ensure, Result};
use hashbrown::HashSet;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::metrics::{Metrics, Op};
use crate::storage::{Store, StoreConfig};
use crate::StoreError;

/// Stress run configuration
#[derive(Debug, Clone)]
pub struct StressConfig {
    /// Worker threads (0 = one per CPU)
    pub threads: usize,

    /// Operations per worker
    pub iterations: u32,

    /// Number of distinct keys shared by all workers
    pub key_space: usize,

    /// TTL used by expiring sets
    pub ttl: Duration,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            threads: 0,
            iterations: 10_000,
            key_space: 16,
            ttl: Duration::from_millis(5),
        }
    }
}

impl StressConfig {
    /// Set worker thread count (0 = auto-detect)
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Set operations per worker
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set number of shared keys
    pub fn with_key_space(mut self, key_space: usize) -> Self {
        self.key_space = key_space;
        self
    }

    /// Set TTL for expiring sets
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Worker count after auto-detection
    pub fn effective_threads(&self) -> usize {
        if self.threads == 0 {
            num_cpus::get()
        } else {
            self.threads
        }
    }
}

/// Outcome of a stress run
#[derive(Debug, Clone)]
pub struct StressReport {
    pub threads: usize,
    pub total_ops: u64,
    pub expired_hits: u64,
    pub duration: Duration,
    /// Reads or final values that were never written for their key
    pub inconsistencies: u64,
    pub metrics_summary: String,
}

impl StressReport {
    pub fn ops_per_sec(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.total_ops as f64 / secs
    }

    pub fn is_consistent(&self) -> bool {
        self.inconsistencies == 0
    }

    pub fn report(&self) -> String {
        format!(
            "Threads: {}, Ops: {}, RPS: {:.0}, Expired hits: {}, Inconsistencies: {}",
            self.threads,
            self.total_ops,
            self.ops_per_sec(),
            self.expired_hits,
            self.inconsistencies
        )
    }
}

struct WorkerOutcome {
    /// Values written, indexed by key slot
    written: Vec<HashSet<u64>>,
    mismatches: u64,
}

/// Packs writer thread, key slot and iteration so a read can be traced back
fn encode(thread: usize, slot: usize, iteration: u32) -> u64 {
    ((thread as u64) << 48) | ((slot as u64) << 32) | u64::from(iteration)
}

fn slot_of(value: u64) -> usize {
    ((value >> 32) & 0xFFFF) as usize
}

fn key_for(slot: usize) -> String {
    format!("stress:{}", slot)
}

fn worker(id: usize, config: &StressConfig, store: &Store<u64>, metrics: &Metrics) -> WorkerOutcome {
    let mut rng = StdRng::seed_from_u64(id as u64);
    let mut written = vec![HashSet::new(); config.key_space];
    let mut mismatches = 0;

    for iteration in 0..config.iterations {
        let slot = rng.gen_range(0..config.key_space);
        let key = key_for(slot);
        let roll: u8 = rng.gen_range(0..100);

        let start = Instant::now();
        let op = match roll {
            0..=24 => {
                let value = encode(id, slot, iteration);
                store.set(key, value, Duration::ZERO);
                written[slot].insert(value);
                Op::Set
            }
            25..=49 => {
                let value = encode(id, slot, iteration);
                store.set(key, value, config.ttl);
                written[slot].insert(value);
                Op::Set
            }
            50..=84 => {
                match store.get(&key) {
                    Ok(Some(value)) if slot_of(value) != slot => {
                        warn!(key = %key, value, "Read a value written for another key");
                        mismatches += 1;
                    }
                    Ok(_) => {}
                    Err(StoreError::NotFound { .. }) => metrics.record_expired_hit(),
                }
                Op::Get
            }
            _ => {
                store.delete(&key);
                Op::Delete
            }
        };
        metrics.record(op, start.elapsed());
    }

    WorkerOutcome { written, mismatches }
}

/// Run the stress workload against a fresh store
pub fn run(config: &StressConfig) -> Result<StressReport> {
    let threads = config.effective_threads();
    ensure!(config.key_space > 0, "key space must not be empty");
    ensure!(config.key_space <= 0xFFFF, "key space is limited to 65535 keys");
    ensure!(threads <= 0xFFFF, "thread count is limited to 65535");

    info!(
        threads,
        iterations = config.iterations,
        key_space = config.key_space,
        ttl = ?config.ttl,
        "Starting stress run"
    );

    let store = Store::with_config(StoreConfig::new().with_initial_capacity(config.key_space));
    let metrics = Metrics::new();
    let start = Instant::now();

    let joined = crossbeam::thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|id| {
                let store = &store;
                let metrics = &metrics;
                s.spawn(move |_| worker(id, config, store, metrics))
            })
            .collect();
        handles.into_iter().map(|h| h.join()).collect::<Vec<_>>()
    })
    .map_err(|_| anyhow!("stress scope panicked"))?;

    let duration = start.elapsed();

    let mut written = vec![HashSet::new(); config.key_space];
    let mut inconsistencies = 0;
    for (id, outcome) in joined.into_iter().enumerate() {
        let outcome = outcome.map_err(|_| anyhow!("stress worker {} panicked", id))?;
        inconsistencies += outcome.mismatches;
        for (slot, values) in outcome.written.into_iter().enumerate() {
            written[slot].extend(values);
        }
    }

    for (slot, values) in written.iter().enumerate() {
        let key = key_for(slot);
        if let Ok(Some(value)) = store.get(&key) {
            if !values.contains(&value) {
                warn!(key = %key, value, "Final value was never written for this key");
                inconsistencies += 1;
            }
        }
    }

    let report = StressReport {
        threads,
        total_ops: metrics.total_ops(),
        expired_hits: metrics.expired_hits(),
        duration,
        inconsistencies,
        metrics_summary: metrics.summary(),
    };
    info!("Stress run finished: {}", report.report());
    Ok(report)
}
