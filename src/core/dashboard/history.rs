use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::RwLock;

use super::metrics::ThroughputSample;

pub const DEFAULT_HISTORY_SIZE: usize = 50;

/// Circular buffer of recent throughput samples (for the network chart).
///
/// Oldest samples are evicted first; eviction is the only removal path.
#[derive(Debug, Clone)]
pub struct ThroughputHistory {
    capacity: usize,
    samples: VecDeque<ThroughputSample>,
}

impl ThroughputHistory {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            samples: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, sample: ThroughputSample) {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(sample);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Samples in arrival order, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &ThroughputSample> {
        self.samples.iter()
    }

    pub fn to_vec(&self) -> Vec<ThroughputSample> {
        self.samples.iter().copied().collect()
    }

    /// Largest download or upload value, never below 1.0 (chart scale).
    pub fn peak_kbps(&self) -> f64 {
        self.samples
            .iter()
            .flat_map(|s| [s.download_kbps, s.upload_kbps])
            .fold(1.0, f64::max)
    }
}

impl Default for ThroughputHistory {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle to the history shared between the network sampler (the only
/// writer) and the render loop (reader).
pub type SharedHistory = Arc<RwLock<ThroughputHistory>>;

pub fn shared_history(capacity: usize) -> SharedHistory {
    Arc::new(RwLock::new(ThroughputHistory::with_capacity(capacity)))
}
