//! Configuration for running independent replications of a line
//!
//! Every replication owns its own stations, routing table and random
//! generator, so replications can run on a thread pool without sharing state.

/// Enumeration of supported concurrency modes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConcurrencyMode {
    /// Replications run one after another on the calling thread
    #[default]
    Sequential,
    /// Replications are spread over a Rayon thread pool
    Rayon,
}

/// Configuration for a batch of replications
#[derive(Debug, Clone, PartialEq)]
pub struct ReplicationConfig {
    /// Simulated time every replication runs for
    pub horizon: f64,
    /// One replication per seed, reported in this order
    pub seeds: Vec<u64>,
    /// The concurrency mode to use for execution
    pub concurrency_mode: ConcurrencyMode,
    /// The size of the thread pool for parallel execution
    /// Only relevant when concurrency_mode is Rayon
    pub thread_pool_size: Option<usize>,
}

impl ReplicationConfig {
    /// `count` sequential replications seeded `0..count`
    pub fn new(horizon: f64, count: u64) -> Self {
        Self {
            horizon,
            seeds: (0..count).collect(),
            concurrency_mode: ConcurrencyMode::default(),
            thread_pool_size: None,
        }
    }

    /// Replace the seed list
    pub fn with_seeds(mut self, seeds: Vec<u64>) -> Self {
        self.seeds = seeds;
        self
    }

    /// Set the concurrency mode for the replications
    pub fn with_concurrency(mut self, mode: ConcurrencyMode) -> Self {
        self.concurrency_mode = mode;
        self
    }

    /// Set the thread pool size for parallel execution
    ///
    /// # Note
    /// This setting only affects execution when concurrency_mode is Rayon
    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = Some(size);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ReplicationConfig::new(100.0, 3);
        assert_eq!(config.concurrency_mode, ConcurrencyMode::Sequential);
        assert_eq!(config.thread_pool_size, None);
        assert_eq!(config.seeds, vec![0, 1, 2]);
    }

    #[test]
    fn test_config_builder() {
        let config = ReplicationConfig::new(10.0, 0)
            .with_seeds(vec![7, 8])
            .with_concurrency(ConcurrencyMode::Rayon)
            .with_thread_pool_size(4);

        assert_eq!(config.concurrency_mode, ConcurrencyMode::Rayon);
        assert_eq!(config.thread_pool_size, Some(4));
        assert_eq!(config.seeds, vec![7, 8]);
    }

    #[test]
    fn test_concurrency_mode_default() {
        assert_eq!(ConcurrencyMode::default(), ConcurrencyMode::Sequential);
    }
}
