//! Store Errors

use thiserror::Error;

/// Result alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors returned by [`Store`](crate::Store) operations
///
/// There is exactly one failure kind. A key that was never inserted, or that
/// was deleted, is *not* an error: `get` returns `Ok(None)` for it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The key had a recorded deadline and it has passed
    #[error("no such value: key '{key}' has expired")]
    NotFound { key: String },
}

impl StoreError {
    /// Key that triggered the error
    pub fn key(&self) -> &str {
        match self {
            StoreError::NotFound { key } => key,
        }
    }
}
