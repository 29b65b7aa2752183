//! Probabilistic size bound for the extractor cache.
//!
//! Counting cache rows on every write is expensive, so each write instead
//! runs an independent Bernoulli trial with probability
//! `10 / max_entries`. On success the cache is trimmed back to the newest
//! `max_entries` rows, so on average a trim happens once every
//! `max_entries / 10` writes. Trials share no state, so any number of
//! writers can run them without coordination.

use crate::types::config::ExtractorConfig;

/// Decides when a cache write should trim old rows.
#[derive(Debug, Clone, PartialEq)]
pub struct EvictionPolicy {
    max_entries: usize,
    probability: f64,
}

impl EvictionPolicy {
    /// Standard policy: trim with probability `10 / max_entries`.
    pub fn new(max_entries: usize) -> Self {
        let probability = if max_entries == 0 {
            1.0
        } else {
            (10.0 / max_entries as f64).min(1.0)
        };
        Self {
            max_entries,
            probability,
        }
    }

    pub fn from_config(config: &ExtractorConfig) -> Self {
        Self::new(config.max_cache_entries)
    }

    /// Trim on every write.
    pub fn always(max_entries: usize) -> Self {
        Self {
            max_entries,
            probability: 1.0,
        }
    }

    /// Never trim.
    pub fn never(max_entries: usize) -> Self {
        Self {
            max_entries,
            probability: 0.0,
        }
    }

    /// Rows kept by a trim.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Chance that a single write trims the cache.
    pub fn probability(&self) -> f64 {
        self.probability
    }

    /// Run one trial.
    pub fn should_sweep(&self) -> bool {
        self.probability > 0.0 && fastrand::f64() < self.probability
    }
}

impl Default for EvictionPolicy {
    fn default() -> Self {
        Self::from_config(&ExtractorConfig::default())
    }
}
