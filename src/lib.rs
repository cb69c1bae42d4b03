//! TTLKV - Thread-Safe In-Process Key-Value Store
//!
//! A store of arbitrary values addressed by string keys, with optional
//! per-entry time-to-live and lazy expiration behind a single lock.

pub mod error;
pub mod metrics;
pub mod storage;
pub mod stress;

pub use error::{Result, StoreError};
pub use metrics::{Metrics, Op};
pub use storage::{AnyStore, AnyValue, Store, StoreConfig};
pub use stress::{StressConfig, StressReport};
