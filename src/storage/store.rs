//! In-Memory Key-Value Store
//!
//! One mutex guards the value map and the deadline map together.
//! Expiration is lazy: an entry whose deadline has passed stays in memory
//! until the next `get` or `delete` on that key, or an explicit
//! [`Store::purge_expired`].

use hashbrown::{HashMap, HashSet};
use parking_lot::Mutex;
use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

use super::StoreConfig;
use crate::error::{Result, StoreError};

/// Type-erased value for stores holding heterogeneous data
pub type AnyValue = Arc<dyn Any + Send + Sync>;

/// Store that accepts any `Send + Sync` value behind an `Arc`
pub type AnyStore = Store<AnyValue>;

#[derive(Debug)]
struct Inner<V> {
    values: HashMap<String, V>,
    /// Deadlines for keys with a finite TTL only
    expirations: HashMap<String, Instant>,
    /// Keys removed because their deadline passed, until the next set, delete or purge
    expired: HashSet<String>,
}

impl<V> Inner<V> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            values: HashMap::with_capacity(capacity),
            expirations: HashMap::with_capacity(capacity),
            expired: HashSet::new(),
        }
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
        self.expirations.remove(key);
    }

    fn expire(&mut self, key: &str) {
        self.remove(key);
        self.expired.insert(key.to_owned());
    }
}

/// Thread-safe in-memory key-value store with per-entry TTL
///
/// All operations take the same exclusive lock for their whole critical
/// section, so operations on one store are linearizable. The store is not
/// `Clone`; share it with `Arc<Store<V>>`.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
/// use ttlkv::{Store, StoreError};
///
/// let store = Store::new();
/// store.set("a", 1, Duration::from_millis(50));
/// assert_eq!(store.get("a"), Ok(Some(1)));
///
/// std::thread::sleep(Duration::from_millis(60));
/// assert!(matches!(store.get("a"), Err(StoreError::NotFound { .. })));
///
/// // Never inserted: a successful miss, not an error
/// assert_eq!(store.get("b"), Ok(None));
/// ```
#[derive(Debug)]
pub struct Store<V> {
    inner: Mutex<Inner<V>>,
}

impl<V> Default for Store<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Store<V> {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// Create a store from a configuration
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            inner: Mutex::new(Inner::with_capacity(config.initial_capacity)),
        }
    }

    /// Insert or overwrite `key`
    ///
    /// A positive `ttl` sets the deadline to now + `ttl`, replacing any earlier
    /// one. `Duration::ZERO` makes the entry permanent and cancels any earlier
    /// deadline. A deadline too far out to represent is treated as permanent.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let key = key.into();
        let mut inner = self.inner.lock();
        let deadline = if ttl.is_zero() {
            None
        } else {
            Instant::now().checked_add(ttl)
        };

        inner.expired.remove(&key);
        match deadline {
            Some(at) => {
                inner.expirations.insert(key.clone(), at);
            }
            None => {
                inner.expirations.remove(&key);
            }
        }
        inner.values.insert(key, value);
    }

    /// Remove `key` and its deadline, if present
    pub fn delete(&self, key: &str) {
        let mut inner = self.inner.lock();
        inner.remove(key);
        inner.expired.remove(key);
    }

    /// Number of entries held in memory, including expired ones not yet
    /// observed by `get`, `delete` or `purge_expired`
    pub fn len(&self) -> usize {
        self.inner.lock().values.len()
    }

    /// Check if the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove every entry whose deadline has passed, returns count removed
    ///
    /// Never called by the store itself. Purging also forgets which keys
    /// expired earlier, so a purged key, or one `get` already reported as
    /// expired, reads back as `Ok(None)` afterwards.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut inner = self.inner.lock();
        let due: Vec<String> = inner
            .expirations
            .iter()
            .filter(|(_, at)| now > **at)
            .map(|(key, _)| key.clone())
            .collect();

        for key in &due {
            inner.remove(key);
        }
        inner.expired.clear();
        if !due.is_empty() {
            debug!(removed = due.len(), "Purged expired keys");
        }
        due.len()
    }
}

impl<V: Clone> Store<V> {
    /// Look up `key`
    ///
    /// Returns `Err(StoreError::NotFound)` when the key's deadline has
    /// passed; the entry is dropped on the way out and later calls keep
    /// returning `NotFound` until the key is set, deleted or purged. A key that
    /// was never inserted, or was deleted, yields `Ok(None)`.
    pub fn get(&self, key: &str) -> Result<Option<V>> {
        let mut inner = self.inner.lock();

        let due = inner
            .expirations
            .get(key)
            .is_some_and(|at| Instant::now() > *at);
        if due {
            inner.expire(key);
            debug!(key, "Lazily removed expired key");
        }
        if inner.expired.contains(key) {
            return Err(StoreError::NotFound {
                key: key.to_owned(),
            });
        }

        Ok(inner.values.get(key).cloned())
    }
}
