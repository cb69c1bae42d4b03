//! Storage Engine
//!
//! In-memory key-value store with lazy TTL expiration.

mod config;
mod store;

pub use config::StoreConfig;
pub use store::{AnyStore, AnyValue, Store};
