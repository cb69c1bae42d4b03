//! Operation Metrics
//!
//! Per-operation counters and latency tracking for store workloads.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Store operation kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Set,
    Get,
    Delete,
}

impl Op {
    pub const ALL: [Op; 3] = [Op::Set, Op::Get, Op::Delete];

    fn index(self) -> usize {
        match self {
            Op::Set => 0,
            Op::Get => 1,
            Op::Delete => 2,
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Op::Set => write!(f, "SET"),
            Op::Get => write!(f, "GET"),
            Op::Delete => write!(f, "DEL"),
        }
    }
}

/// Metrics collector, safe to share between threads
#[derive(Debug)]
pub struct Metrics {
    ops: [AtomicU64; 3],

    /// Gets that hit the expiration error
    expired_hits: AtomicU64,

    latency_sum_us: AtomicU64,
    latency_min_us: AtomicU64,
    latency_max_us: AtomicU64,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> Self {
        Self {
            ops: [AtomicU64::new(0), AtomicU64::new(0), AtomicU64::new(0)],
            expired_hits: AtomicU64::new(0),
            latency_sum_us: AtomicU64::new(0),
            latency_min_us: AtomicU64::new(u64::MAX),
            latency_max_us: AtomicU64::new(0),
        }
    }

    /// Record one completed operation
    pub fn record(&self, op: Op, latency: Duration) {
        self.ops[op.index()].fetch_add(1, Ordering::Relaxed);

        let latency_us = u64::try_from(latency.as_micros()).unwrap_or(u64::MAX);
        self.latency_sum_us.fetch_add(latency_us, Ordering::Relaxed);
        self.latency_min_us.fetch_min(latency_us, Ordering::Relaxed);
        self.latency_max_us.fetch_max(latency_us, Ordering::Relaxed);
    }

    /// Record a get that returned the expiration error
    pub fn record_expired_hit(&self) {
        self.expired_hits.fetch_add(1, Ordering::Relaxed);
    }

    /// Operations recorded for one kind
    pub fn ops(&self, op: Op) -> u64 {
        self.ops[op.index()].load(Ordering::Relaxed)
    }

    /// Total operations count
    pub fn total_ops(&self) -> u64 {
        Op::ALL.iter().map(|op| self.ops(*op)).sum()
    }

    /// Get count of gets that hit the expiration error
    pub fn expired_hits(&self) -> u64 {
        self.expired_hits.load(Ordering::Relaxed)
    }

    /// Average latency in microseconds
    pub fn avg_latency_us(&self) -> f64 {
        let count = self.total_ops();
        if count == 0 {
            return 0.0;
        }
        let sum = self.latency_sum_us.load(Ordering::Relaxed);
        sum as f64 / count as f64
    }

    /// Min latency in microseconds
    pub fn min_latency_us(&self) -> u64 {
        let min = self.latency_min_us.load(Ordering::Relaxed);
        if min == u64::MAX {
            0
        } else {
            min
        }
    }

    /// Max latency in microseconds
    pub fn max_latency_us(&self) -> u64 {
        self.latency_max_us.load(Ordering::Relaxed)
    }

    /// One-line summary
    pub fn summary(&self) -> String {
        format!(
            "Operations: {} (SET={} GET={} DEL={}, expired={}) | Latency (µs): avg={:.1}, min={}, max={}",
            self.total_ops(),
            self.ops(Op::Set),
            self.ops(Op::Get),
            self.ops(Op::Delete),
            self.expired_hits(),
            self.avg_latency_us(),
            self.min_latency_us(),
            self.max_latency_us()
        )
    }
}
