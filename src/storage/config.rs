//! Store Configuration

/// Store configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreConfig {
    /// Number of entries both internal maps are pre-sized for (0 = grow on demand)
    pub initial_capacity: usize,
}

impl StoreConfig {
    /// Create a config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size the store for `capacity` entries
    ///
    /// This is an allocation hint only. The store never rejects or evicts
    /// entries once the capacity is reached.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}
